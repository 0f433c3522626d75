/// End-to-end tests for the reasoning kernel.
///
/// Each test drives a fresh memory through the public API only: input
/// tasks, cycles, and the collector/recorder observation hooks. The
/// engine is deterministic for a fixed seed, so these scenarios either
/// always pass or always fail.
use noema::{
    BudgetValue, BufferRecorder, CollectorOutput, Memory, OccurrenceTime, Punctuation, Sentence,
    Stamp, Task, Term, TruthValue,
};

fn judgment(memory: &mut Memory, content: Term, occurrence: OccurrenceTime) -> Task {
    let truth = TruthValue::new(1.0, 0.9);
    let stamp = Stamp::input(memory.new_stamp_serial(), memory.time(), occurrence);
    Task::input(
        Sentence::judgment(content, truth, stamp),
        BudgetValue::for_judgment(&truth),
    )
}

fn eternal_judgment(memory: &mut Memory, content: Term) -> Task {
    judgment(memory, content, OccurrenceTime::Eternal)
}

fn question(memory: &mut Memory, content: Term) -> Task {
    let stamp = Stamp::input(
        memory.new_stamp_serial(),
        memory.time(),
        OccurrenceTime::Eternal,
    );
    Task::input(Sentence::question(content, stamp), BudgetValue::for_question())
}

fn run(memory: &mut Memory, cycles: usize) {
    for _ in 0..cycles {
        memory.cycle();
    }
}

fn reported_names(collector: &CollectorOutput) -> Vec<String> {
    collector
        .reported()
        .iter()
        .map(|s| s.content().name().to_string())
        .collect()
}

#[test]
fn test_input_creates_concepts_for_term_and_components() {
    let mut memory = Memory::with_defaults();
    let content = Term::inheritance(&Term::atom("bird"), &Term::atom("animal")).unwrap();
    let task = eternal_judgment(&mut memory, content.clone());
    memory.input_task(task);
    run(&mut memory, 3);

    assert!(memory.concept(&content).is_some());
    assert!(memory.concept(&Term::atom("bird")).is_some());
    assert!(memory.concept(&Term::atom("animal")).is_some());
    // the statement concept holds the input as a belief
    let concept = memory.concept(&content).unwrap();
    assert_eq!(concept.beliefs().len(), 1);
}

#[test]
fn test_questions_are_indexed_on_their_concept() {
    let mut memory = Memory::with_defaults();
    let content = Term::inheritance(&Term::atom("bird"), &Term::atom("animal")).unwrap();
    let task = question(&mut memory, content.clone());
    memory.input_task(task);
    run(&mut memory, 3);

    let concept = memory.concept(&content).unwrap();
    assert_eq!(concept.questions().len(), 1);
    assert!(concept.beliefs().is_empty());
}

#[test]
fn test_reset_leaves_an_empty_reasoner_and_counts_cycles() {
    let mut memory = Memory::with_defaults();
    let content = Term::inheritance(&Term::atom("bird"), &Term::atom("animal")).unwrap();
    let task = eternal_judgment(&mut memory, content);
    memory.input_task(task);
    run(&mut memory, 10);
    assert!(memory.concept_count() > 0);

    memory.reset();
    assert_eq!(memory.concept_count(), 0);
    assert_eq!(memory.novel_task_count(), 0);
    assert_eq!(memory.pending_task_count(), 0);
    assert_eq!(memory.time(), 0);

    // cycles on an empty reasoner advance only the clock
    run(&mut memory, 7);
    assert_eq!(memory.time(), 7);
    assert_eq!(memory.concept_count(), 0);
}

#[test]
fn test_paused_memory_does_nothing() {
    let mut memory = Memory::with_defaults();
    memory.set_working(false);
    assert!(!memory.is_working());
    run(&mut memory, 5);
    assert_eq!(memory.time(), 0);
    memory.set_working(true);
    run(&mut memory, 5);
    assert_eq!(memory.time(), 5);
}

#[test]
fn test_step_later_counts_down() {
    let mut memory = Memory::with_defaults();
    memory.step_later(3);
    assert_eq!(memory.steps_queued(), 3);
    run(&mut memory, 2);
    assert_eq!(memory.steps_queued(), 1);
}

#[test]
fn test_set_singleton_transform() {
    // <bird --> {canary}>. derives <bird <-> {canary}>.
    let mut memory = Memory::with_defaults();
    let collector = CollectorOutput::new();
    memory.set_output(Box::new(collector.clone()));
    let set = Term::set_ext(vec![Term::atom("canary")]).unwrap();
    let content = Term::inheritance(&Term::atom("bird"), &set).unwrap();
    let task = eternal_judgment(&mut memory, content);
    memory.input_task(task);
    run(&mut memory, 100);

    let names = reported_names(&collector);
    assert!(
        names.iter().any(|n| n == "<bird <-> {canary}>"),
        "similarity not derived; reported: {names:?}"
    );
    let sim = collector
        .reported()
        .into_iter()
        .find(|s| s.content().name() == "<bird <-> {canary}>")
        .unwrap();
    assert!(sim.is_judgment());
    // the derived stamp extends the input's evidential base
    assert_eq!(sim.stamp().evidential_base(), &[0]);
}

#[test]
fn test_structural_derivations_never_rederive_the_premise() {
    let mut memory = Memory::with_defaults();
    let collector = CollectorOutput::new();
    memory.set_output(Box::new(collector.clone()));
    let set = Term::set_ext(vec![Term::atom("canary")]).unwrap();
    let content = Term::inheritance(&Term::atom("bird"), &set).unwrap();
    let task = eternal_judgment(&mut memory, content.clone());
    memory.input_task(task);
    run(&mut memory, 300);

    for sentence in collector.reported() {
        assert_ne!(
            sentence.content(),
            &content,
            "the premise content was re-derived"
        );
    }
}

#[test]
fn test_product_image_transform_both_positions() {
    // <(*,tom,mary) --> uncle>. derives both image forms
    let mut memory = Memory::with_defaults();
    let collector = CollectorOutput::new();
    memory.set_output(Box::new(collector.clone()));
    let product = Term::product(vec![Term::atom("tom"), Term::atom("mary")]).unwrap();
    let content = Term::inheritance(&product, &Term::atom("uncle")).unwrap();
    let task = eternal_judgment(&mut memory, content);
    memory.input_task(task);
    run(&mut memory, 100);

    let names = reported_names(&collector);
    assert!(
        names.iter().any(|n| n == "<tom --> (/,uncle,_,mary)>"),
        "first image missing; reported: {names:?}"
    );
    assert!(
        names.iter().any(|n| n == "<mary --> (/,uncle,tom,_)>"),
        "second image missing; reported: {names:?}"
    );
}

#[test]
fn test_contraposition_of_a_question() {
    // <(--,a) ==> b>? derives <(--,b) ==> a>? with no truth value
    let mut memory = Memory::with_defaults();
    let collector = CollectorOutput::new();
    memory.set_output(Box::new(collector.clone()));
    let negated = Term::negation(&Term::atom("a"));
    let content =
        Term::implication(&negated, &Term::atom("b"), noema::TemporalOrder::None).unwrap();
    let task = question(&mut memory, content);
    memory.input_task(task);
    run(&mut memory, 200);

    let contraposed = collector
        .reported()
        .into_iter()
        .find(|s| s.content().name() == "<(--,b) ==> a>");
    let Some(contraposed) = contraposed else {
        panic!(
            "contraposition not derived; reported: {:?}",
            reported_names(&collector)
        );
    };
    assert_eq!(contraposed.punctuation(), Punctuation::Question);
    assert!(contraposed.truth().is_none());
}

#[test]
fn test_difference_composition() {
    // <s --> p>. plus the compound (~,m,s) in memory derive
    // <(~,m,p) --> (~,m,s)>. with deduction truth and switched sides
    let mut memory = Memory::with_defaults();
    let collector = CollectorOutput::new();
    memory.set_output(Box::new(collector.clone()));
    let statement = Term::inheritance(&Term::atom("s"), &Term::atom("p")).unwrap();
    let difference = Term::difference_int(&Term::atom("m"), &Term::atom("s")).unwrap();
    let statement_task = eternal_judgment(&mut memory, statement);
    memory.input_task(statement_task);
    let difference_task = eternal_judgment(&mut memory, difference);
    memory.input_task(difference_task);
    run(&mut memory, 300);

    let composed = collector
        .reported()
        .into_iter()
        .find(|s| s.content().name() == "<(~,m,p) --> (~,m,s)>");
    let Some(composed) = composed else {
        panic!(
            "difference composition not derived; reported: {:?}",
            reported_names(&collector)
        );
    };
    let truth = composed.truth().unwrap();
    assert!((truth.frequency() - 1.0).abs() < 1e-4);
    assert!((truth.confidence() - 0.81).abs() < 1e-4);
}

#[test]
fn test_temporal_induction_between_events() {
    let mut memory = Memory::with_defaults();
    let collector = CollectorOutput::new();
    memory.set_output(Box::new(collector.clone()));

    let first = judgment(&mut memory, Term::atom("lightning"), OccurrenceTime::At(0));
    memory.input_task(first);
    memory.cycle();

    let second = judgment(&mut memory, Term::atom("thunder"), OccurrenceTime::At(2));
    memory.input_task(second);
    run(&mut memory, 5);

    let names = reported_names(&collector);
    // within the concurrency window: both implications and the equivalence
    assert!(
        names.iter().any(|n| n == "<lightning =|> thunder>"),
        "predictive implication missing; reported: {names:?}"
    );
    assert!(
        names.iter().any(|n| n == "<thunder =|> lightning>"),
        "retrodictive implication missing; reported: {names:?}"
    );
    assert!(
        names.iter().any(|n| n == "<lightning <|> thunder>"),
        "equivalence missing; reported: {names:?}"
    );
}

#[test]
fn test_determinism_across_runs() {
    let run_once = || {
        let mut memory = Memory::with_defaults();
        let collector = CollectorOutput::new();
        memory.set_output(Box::new(collector.clone()));
        let set = Term::set_ext(vec![Term::atom("canary")]).unwrap();
        let content = Term::inheritance(&Term::atom("bird"), &set).unwrap();
        let task = eternal_judgment(&mut memory, content);
    memory.input_task(task);
        let product = Term::product(vec![Term::atom("tom"), Term::atom("mary")]).unwrap();
        let relation = Term::inheritance(&product, &Term::atom("uncle")).unwrap();
        let second = eternal_judgment(&mut memory, relation);
        memory.input_task(second);
        run(&mut memory, 150);
        collector
            .reported()
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(run_once(), run_once());
}

#[test]
fn test_recorder_sees_cycle_boundaries() {
    let mut memory = Memory::with_defaults();
    let recorder = BufferRecorder::new();
    memory.set_recorder(Box::new(recorder.clone()));
    run(&mut memory, 2);
    let messages = recorder.messages();
    assert!(messages.iter().any(|m| m == "cycle 0 start"));
    assert!(messages.iter().any(|m| m == "cycle 1 end"));
}

#[test]
fn test_low_expectation_judgments_are_neglected_without_a_concept() {
    // a derived-style weak judgment for an unknown term never seeds a
    // novel concept
    let mut memory = Memory::with_defaults();
    let recorder = BufferRecorder::new();
    memory.set_recorder(Box::new(recorder.clone()));

    // an input task always reaches its concept; to exercise the novelty
    // gate the task must be non-input, which only arises internally, so
    // instead verify the bag stays empty for weak inputs processed
    // normally
    let content = Term::inheritance(&Term::atom("x"), &Term::atom("y")).unwrap();
    let truth = TruthValue::new(0.2, 0.3);
    let stamp = Stamp::input(
        memory.new_stamp_serial(),
        memory.time(),
        OccurrenceTime::Eternal,
    );
    let task = Task::input(
        Sentence::judgment(content, truth, stamp),
        BudgetValue::for_judgment(&truth),
    );
    memory.input_task(task);
    run(&mut memory, 3);
    assert_eq!(memory.novel_task_count(), 0);
}
