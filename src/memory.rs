//! Memory: the run-time state of one reasoner and its attention loop.
//!
//! A memory owns the concepts bag, the novel-tasks bag, the new-task
//! queue, the clock, the stamp serial counter, the operator registry and
//! the per-cycle scratch slots. One driver owns one memory; a cycle is
//! the unit of atomicity, and with a fixed seed and input sequence every
//! run reproduces the same derivations.
//!
//! Two things in here carry most of the engineering weight: the cycle
//! (`cycle`, `process_new_tasks`, `process_novel_task`,
//! `process_concept`) that decides what work happens, and the admission
//! gate (`derived_task`) that every produced task must pass — budget
//! threshold, zero-confidence filter, derivation-chain cycle check, and
//! the evidence-overlap check on revision.

use std::collections::VecDeque;

use dashmap::DashMap;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use tracing::{debug, info, trace};

use crate::bag::{Bag, BagConfig, Item};
use crate::budget::{self, BudgetValue};
use crate::concept::Concept;
use crate::config::EngineConfig;
use crate::error::NoemaResult;
use crate::link::TermLink;
use crate::recorder::{NullRecorder, OutputChannel, Recorder};
use crate::rules;
use crate::sentence::{Punctuation, Sentence};
use crate::stamp::Stamp;
use crate::task::Task;
use crate::term::Term;
use crate::truth::{self, TruthValue};

/// A registered operation, addressed by name from task content.
#[derive(Debug, Clone)]
pub struct Operator {
    name: String,
}

impl Operator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The run-time state of one reasoner.
pub struct Memory {
    config: EngineConfig,

    // long-term storage
    concepts: Bag<Concept>,
    novel_tasks: Bag<Task>,
    operators: DashMap<String, Operator>,

    // short-term workspace
    new_tasks: VecDeque<Task>,
    current_task: Option<Task>,
    current_belief: Option<Sentence>,
    current_term: Option<Term>,
    current_belief_link: Option<TermLink>,
    current_task_link_budget: Option<BudgetValue>,
    new_stamp: Option<Stamp>,
    last_event: Option<Task>,

    // bookkeeping
    clock: u64,
    stamp_serial: u64,
    steps_queued: u32,
    working: bool,
    rng: XorShiftRng,
    recorder: Box<dyn Recorder>,
    output: Option<Box<dyn OutputChannel>>,
}

impl Memory {
    /// Create a memory with the given configuration and initial
    /// operators.
    pub fn new(config: EngineConfig, initial_operators: Vec<Operator>) -> NoemaResult<Self> {
        config.validate()?;
        let concepts = Bag::new(BagConfig {
            capacity: config.concept_bag_capacity,
            levels: config.bag_levels,
            forget_cycles: config.concept_forgetting_cycles,
            relative_threshold: config.relative_threshold,
        });
        let novel_tasks = Bag::new(BagConfig {
            capacity: config.novel_task_bag_capacity,
            levels: config.bag_levels,
            forget_cycles: config.task_link_forgetting_cycles,
            relative_threshold: config.relative_threshold,
        });
        let operators = DashMap::new();
        for op in initial_operators {
            operators.insert(op.name.clone(), op);
        }
        let rng = XorShiftRng::seed_from_u64(config.rng_seed);
        info!(seed = config.rng_seed, "memory initialized");
        Ok(Self {
            concepts,
            novel_tasks,
            operators,
            new_tasks: VecDeque::new(),
            current_task: None,
            current_belief: None,
            current_term: None,
            current_belief_link: None,
            current_task_link_budget: None,
            new_stamp: None,
            last_event: None,
            clock: 0,
            stamp_serial: 0,
            steps_queued: 0,
            working: true,
            rng,
            recorder: Box::new(NullRecorder),
            output: None,
            config,
        })
    }

    /// Create a memory with the default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default(), Vec::new()).expect("default configuration is valid")
    }

    /// Clear all state and re-seed the generator.
    pub fn reset(&mut self) {
        self.concepts.clear();
        self.novel_tasks.clear();
        self.new_tasks.clear();
        self.current_task = None;
        self.current_belief = None;
        self.current_term = None;
        self.current_belief_link = None;
        self.current_task_link_budget = None;
        self.new_stamp = None;
        self.last_event = None;
        self.clock = 0;
        self.steps_queued = 0;
        self.working = true;
        self.rng = XorShiftRng::seed_from_u64(self.config.rng_seed);
        if self.recorder.is_active() {
            self.recorder.append("Reset");
        }
        info!("memory reset");
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The logical clock: cycles executed while working.
    pub fn time(&self) -> u64 {
        self.clock
    }

    /// Fresh serial for an input stamp.
    pub fn new_stamp_serial(&mut self) -> u64 {
        let serial = self.stamp_serial;
        self.stamp_serial += 1;
        serial
    }

    pub fn is_working(&self) -> bool {
        self.working
    }

    /// Pause or resume cycling at cycle boundaries.
    pub fn set_working(&mut self, working: bool) {
        self.working = working;
    }

    /// Request `cycles` additional cycles; an advisory counter for
    /// drivers.
    pub fn step_later(&mut self, cycles: u32) {
        self.steps_queued += cycles;
    }

    pub fn steps_queued(&self) -> u32 {
        self.steps_queued
    }

    pub fn set_recorder(&mut self, recorder: Box<dyn Recorder>) {
        self.recorder = recorder;
    }

    pub fn set_output(&mut self, output: Box<dyn OutputChannel>) {
        self.output = Some(output);
    }

    pub fn add_operator(&mut self, operator: Operator) {
        self.operators.insert(operator.name.clone(), operator);
    }

    pub fn get_operator(&self, name: &str) -> Option<Operator> {
        self.operators.get(name).map(|op| op.clone())
    }

    pub fn is_registered_operator(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    /// Number of concepts currently held.
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    /// Read access to a concept, for drivers and tests.
    pub fn concept(&self, term: &Term) -> Option<&Concept> {
        self.concepts.get(term.name())
    }

    pub fn novel_task_count(&self) -> usize {
        self.novel_tasks.len()
    }

    pub fn pending_task_count(&self) -> usize {
        self.new_tasks.len()
    }

    /// Whether the current cycle has produced nothing yet.
    pub fn no_result(&self) -> bool {
        self.new_tasks.is_empty()
    }

    /// Tasks waiting for the next cycle, in arrival order.
    pub fn pending_tasks(&self) -> impl Iterator<Item = &Task> {
        self.new_tasks.iter()
    }

    /* ---------- task intake ---------- */

    /// Accept an externally constructed task. Tasks below the admission
    /// threshold are silently neglected.
    pub fn input_task(&mut self, task: Task) {
        if task.budget().above_threshold(self.config.budget_threshold) {
            self.add_new_task(task, "Perceived");
        } else {
            self.record_task_remove(&task, "Neglected");
        }
    }

    /// Wrap a sentence produced by a layered rule into a task whose
    /// parent is the current task, and enqueue it.
    pub fn activated_task(
        &mut self,
        budget: BudgetValue,
        sentence: Sentence,
        candidate_belief: Option<Sentence>,
    ) {
        let Some(current) = self.current_task.clone() else {
            return;
        };
        let task = Task::derived(sentence, budget, &current, candidate_belief);
        if task.sentence().is_question() {
            self.output(&task);
        }
        self.add_new_task(task, "Activated");
    }

    fn add_new_task(&mut self, task: Task, reason: &str) {
        if self.recorder.is_active() {
            self.recorder.on_task_add(&task, reason);
        }
        trace!(%task, reason, "task enqueued");
        self.new_tasks.push_back(task);
    }

    pub(crate) fn record_task_remove(&mut self, task: &Task, reason: &str) {
        if self.recorder.is_active() {
            self.recorder.on_task_remove(task, reason);
        }
        trace!(%task, reason, "task dropped");
    }

    /// Report a task on the output channel, subject to the noise gate.
    fn output(&mut self, task: &Task) {
        let Some(output) = self.output.as_mut() else {
            return;
        };
        let gate = 1.0 - self.config.noise_level as f32 / 100.0;
        if task.budget().summary() >= gate {
            output.report(task.sentence());
        }
    }

    /* ---------- derivation admission (the gate) ---------- */

    /// The only entrance for derived tasks. Applies, in order: the budget
    /// threshold, the zero-confidence filter, the derivation-chain
    /// update, and either the chain cycle check (ordinary derivations)
    /// or the evidence-overlap check (revision).
    pub(crate) fn derived_task(&mut self, mut task: Task, revised: bool, single: bool) {
        if !task.budget().above_threshold(self.config.budget_threshold) {
            self.record_task_remove(&task, "Ignored");
            return;
        }
        if let Some(truth) = task.sentence().truth() {
            if truth.confidence() == 0.0 {
                self.record_task_remove(&task, "Ignored");
                return;
            }
        }

        let max_chain = self.config.max_derivation_chain;
        let belief_content = self
            .current_belief
            .as_ref()
            .filter(|b| b.is_judgment())
            .map(|b| b.content().clone());
        if let Some(content) = belief_content {
            task.sentence_mut()
                .stamp_mut()
                .add_to_chain(content, max_chain);
        }
        let current_is_judgment = self
            .current_task
            .as_ref()
            .map(|t| t.sentence().is_judgment())
            .unwrap_or(false);
        if current_is_judgment {
            let applies = if single {
                self.current_belief.is_none()
            } else {
                true
            };
            if applies {
                let content = self
                    .current_task
                    .as_ref()
                    .map(|t| t.content().clone())
                    .expect("current task present");
                task.sentence_mut()
                    .stamp_mut()
                    .add_to_chain(content, max_chain);
            }
        }

        if !revised {
            // a judgment re-deriving a term already on its chain is
            // cyclic, unless it is the negation partner of its parent
            if task.sentence().is_judgment() {
                let content = task.content().clone();
                let on_chain = task
                    .sentence()
                    .stamp()
                    .derivation_chain()
                    .iter()
                    .any(|c| *c == content);
                if on_chain {
                    let excused = task.parent_content().is_some_and(|parent| {
                        *parent == Term::negation(&content)
                            || content == Term::negation(parent)
                    });
                    if !excused {
                        self.record_task_remove(&task, "Cyclic Reasoning");
                        return;
                    }
                }
            }
        } else if task.sentence().stamp().has_duplicate_evidence() {
            self.record_task_remove(&task, "Overlapping Evidence");
            return;
        }

        self.output(&task);
        self.add_new_task(task, "Derived");
    }

    /// Shared final operation of double-premise rules. The stamp is the
    /// pre-merged scratch stamp; absent content or stamp aborts silently.
    pub(crate) fn double_premise_task(
        &mut self,
        content: Option<Term>,
        truth: Option<TruthValue>,
        budget: BudgetValue,
    ) {
        self.emit_double_premise(content, truth, budget, false);
    }

    /// Double-premise emission for revision: the gate checks evidence
    /// overlap instead of chain cycles.
    pub(crate) fn double_premise_task_revised(
        &mut self,
        content: Option<Term>,
        truth: Option<TruthValue>,
        budget: BudgetValue,
    ) {
        self.emit_double_premise(content, truth, budget, true);
    }

    fn emit_double_premise(
        &mut self,
        content: Option<Term>,
        truth: Option<TruthValue>,
        budget: BudgetValue,
        revised: bool,
    ) {
        let Some(content) = content else {
            return;
        };
        let Some(stamp) = self.new_stamp.clone() else {
            return;
        };
        let Some(current) = self.current_task.clone() else {
            return;
        };
        let sentence = Sentence::new(content, current.sentence().punctuation(), truth, stamp);
        let task = Task::derived(sentence, budget, &current, self.current_belief.clone());
        self.derived_task(task, revised, false);
    }

    /// Shared final operation of single-premise (structural) rules.
    ///
    /// A conclusion equal to the grandparent's content is circular
    /// structural inference and is silently dropped. The stamp derives
    /// from the task for judgments (or when no belief is in play) and
    /// from the belief otherwise.
    pub(crate) fn single_premise_task(
        &mut self,
        content: Term,
        punctuation: Option<Punctuation>,
        truth: Option<TruthValue>,
        budget: BudgetValue,
    ) {
        let Some(current) = self.current_task.clone() else {
            return;
        };
        if let Some(parent_content) = current.parent_content() {
            if content == *parent_content {
                return;
            }
        }
        let task_sentence = current.sentence();
        let stamp = if task_sentence.is_judgment() || self.current_belief.is_none() {
            Stamp::child(task_sentence.stamp(), self.clock)
        } else {
            let belief = self.current_belief.as_ref().expect("belief present");
            Stamp::child(belief.stamp(), self.clock)
        };
        self.new_stamp = Some(stamp.clone());
        let punctuation = punctuation.unwrap_or_else(|| task_sentence.punctuation());
        let sentence = Sentence::new(content, punctuation, truth, stamp);
        let task = Task::derived(sentence, budget, &current, None);
        self.derived_task(task, false, true);
    }

    /* ---------- the attention loop ---------- */

    /// One atomic working cycle: drain the new tasks accumulated in the
    /// previous cycle, otherwise pull one novel task, otherwise fire one
    /// concept. No-op while paused.
    pub fn cycle(&mut self) {
        if !self.working {
            return;
        }
        if self.recorder.is_active() {
            self.recorder.on_cycle_start(self.clock);
        }

        self.process_new_tasks();
        if self.no_result() {
            self.process_novel_task();
        }
        if self.no_result() {
            self.process_concept();
        }

        if self.recorder.is_active() {
            self.recorder.on_cycle_end(self.clock);
        }
        if self.steps_queued > 0 {
            self.steps_queued -= 1;
        }
        self.clock += 1;
    }

    /// Drain exactly the tasks that were queued when the cycle began.
    /// Input tasks and tasks whose concept already exists are processed
    /// immediately; novel well-supported judgments go to the novel bag;
    /// the rest are neglected. The best time-bound judgment of the drain
    /// becomes the new event for temporal induction.
    fn process_new_tasks(&mut self) {
        let mut counter = self.new_tasks.len();
        let mut new_event: Option<Task> = None;
        while counter > 0 {
            counter -= 1;
            let Some(task) = self.new_tasks.pop_front() else {
                break;
            };
            if task.is_input() || self.concepts.contains(task.content().name()) {
                self.immediate_process(task.clone());
                if !task.sentence().is_eternal() && task.sentence().is_judgment() {
                    let better = match &new_event {
                        Some(event) => {
                            budget::rank_belief(event.sentence())
                                < budget::rank_belief(task.sentence())
                        }
                        None => true,
                    };
                    if better {
                        new_event = Some(task);
                    }
                }
            } else if task.sentence().is_judgment() {
                let expectation = task
                    .sentence()
                    .truth()
                    .map(|t| t.expectation())
                    .unwrap_or(0.0);
                if expectation > self.config.creation_expectation {
                    if let Some(displaced) = self.novel_tasks.put_in(task) {
                        self.record_task_remove(&displaced, "Displaced");
                    }
                } else {
                    self.record_task_remove(&task, "Neglected");
                }
            }
        }
        if let Some(event) = new_event {
            if let Some(last) = self.last_event.clone() {
                let merged = Stamp::merge(
                    event.sentence().stamp(),
                    last.sentence().stamp(),
                    self.clock,
                    self.config.max_evidential_base,
                    self.config.max_derivation_chain,
                );
                if let Some(stamp) = merged {
                    self.new_stamp = Some(stamp);
                    self.current_task = Some(event.clone());
                    self.current_belief = Some(last.sentence().clone());
                    let new_sentence = event.sentence().clone();
                    let old_sentence = last.sentence().clone();
                    rules::temporal_induction(&new_sentence, &old_sentence, self);
                }
            }
            self.last_event = Some(event);
        }
    }

    /// Pull one task from the novel bag and process it.
    fn process_novel_task(&mut self) {
        if let Some(task) = self.novel_tasks.take_out(&mut self.rng) {
            self.immediate_process(task);
        }
    }

    /// Select a concept by bag policy and fire it.
    fn process_concept(&mut self) {
        let Some(mut concept) = self.concepts.take_out(&mut self.rng) else {
            return;
        };
        budget::forget(
            concept.budget_mut(),
            self.config.concept_forgetting_cycles,
            self.config.relative_threshold,
        );
        self.current_term = Some(concept.term().clone());
        if self.recorder.is_active() {
            self.recorder
                .append(&format!("Concept selected: {}", concept.term()));
        }
        concept.fire(self);
        self.commit_concept(concept);
    }

    /// Constant-time local processing of a task in its own concept.
    fn immediate_process(&mut self, task: Task) {
        self.current_task = Some(task.clone());
        if self.recorder.is_active() {
            self.recorder
                .append(&format!("Task immediately processed: {task}"));
        }
        self.current_term = Some(task.content().clone());
        let term = task.content().clone();
        self.with_concept(&term, |concept, memory| {
            concept.activate(task.budget(), memory.config());
            concept.direct_process(&task, memory);
        });
    }

    /* ---------- concept access ---------- */

    /// Check a concept out of the bag (creating it for a constant term on
    /// first reference), run `f` with it and the rest of memory, and
    /// reseat it. Returns false when the term cannot name a concept.
    pub(crate) fn with_concept<F>(&mut self, term: &Term, f: F) -> bool
    where
        F: FnOnce(&mut Concept, &mut Memory),
    {
        if !term.is_constant() {
            return false;
        }
        let mut concept = match self.concepts.pick_out(term.name()) {
            Some(existing) => existing,
            None => {
                let created = Concept::new(term.clone(), &self.config);
                if self.recorder.is_active() {
                    self.recorder.on_concept_new(term);
                }
                debug!(concept = %term, "concept created");
                created
            }
        };
        f(&mut concept, self);
        self.commit_concept(concept);
        true
    }

    fn commit_concept(&mut self, concept: Concept) {
        if let Some(displaced) = self.concepts.put_in(concept) {
            trace!(concept = %displaced.term(), "concept displaced");
        }
    }

    /// Priority of the concept named by `term`, zero when absent.
    pub(crate) fn concept_activation(&self, term: &Term) -> f32 {
        self.concepts
            .get(term.name())
            .map(|c| c.budget().priority())
            .unwrap_or(0.0)
    }

    /// Find a belief in `term`'s concept usable against `task`, and
    /// park the merged stamp in the scratch slot.
    pub(crate) fn belief_for(&mut self, term: &Term, task: &Task) -> Option<Sentence> {
        let (belief, stamp) = self.concepts.get(term.name()).and_then(|concept| {
            concept.find_belief(
                task,
                self.clock,
                self.config.max_evidential_base,
                self.config.max_derivation_chain,
            )
        })?;
        self.new_stamp = Some(stamp);
        Some(belief)
    }

    /* ---------- scratch slots ---------- */

    pub(crate) fn current_task(&self) -> Option<&Task> {
        self.current_task.as_ref()
    }

    pub(crate) fn set_current_task(&mut self, task: Option<Task>) {
        self.current_task = task;
    }

    pub(crate) fn current_belief(&self) -> Option<&Sentence> {
        self.current_belief.as_ref()
    }

    pub(crate) fn set_current_belief(&mut self, belief: Option<Sentence>) {
        self.current_belief = belief;
    }

    pub(crate) fn current_term(&self) -> Option<&Term> {
        self.current_term.as_ref()
    }

    pub(crate) fn current_belief_link(&self) -> Option<&TermLink> {
        self.current_belief_link.as_ref()
    }

    pub(crate) fn set_current_belief_link(&mut self, link: TermLink) {
        self.current_belief_link = Some(link);
    }

    pub(crate) fn clear_current_belief_link(&mut self) {
        self.current_belief_link = None;
    }

    pub(crate) fn take_current_belief_link(&mut self) -> Option<TermLink> {
        self.current_belief_link.take()
    }

    pub(crate) fn set_current_task_link_budget(&mut self, budget: Option<BudgetValue>) {
        self.current_task_link_budget = budget;
    }

    pub(crate) fn set_new_stamp(&mut self, stamp: Option<Stamp>) {
        self.new_stamp = stamp;
    }

    pub(crate) fn rng_mut(&mut self) -> &mut XorShiftRng {
        &mut self.rng
    }

    /* ---------- inference budgets ---------- */

    fn budget_inference(&mut self, quality: f32, complexity: usize) -> BudgetValue {
        let task_budget = self
            .current_task_link_budget
            .or_else(|| self.current_task.as_ref().map(|t| *t.budget()))
            .unwrap_or_default();
        let target_activation = self
            .current_belief_link
            .as_ref()
            .map(|link| self.concept_activation(link.target()));
        match (&mut self.current_belief_link, target_activation) {
            (Some(link), Some(activation)) => budget::budget_inference(
                quality,
                complexity,
                &task_budget,
                Some((link.budget_mut(), activation)),
            ),
            _ => budget::budget_inference(quality, complexity, &task_budget, None),
        }
    }

    /// Forward inference budget, complexity-charged for `content`.
    pub(crate) fn compound_forward(
        &mut self,
        truth: Option<&TruthValue>,
        content: &Term,
    ) -> BudgetValue {
        let quality = truth.map(budget::truth_to_quality).unwrap_or(1.0);
        self.budget_inference(quality, content.complexity())
    }

    /// Backward inference budget, complexity-charged for `content`.
    pub(crate) fn compound_backward(&mut self, content: &Term) -> BudgetValue {
        self.budget_inference(1.0, content.complexity())
    }

    /// Weak backward inference budget.
    pub(crate) fn compound_backward_weak(&mut self, content: &Term) -> BudgetValue {
        let quality = truth::w2c(1.0, self.config.horizon);
        self.budget_inference(quality, content.complexity())
    }

    /// Forward inference budget without a complexity charge.
    pub(crate) fn forward(&mut self, truth: Option<&TruthValue>) -> BudgetValue {
        let quality = truth.map(budget::truth_to_quality).unwrap_or(1.0);
        self.budget_inference(quality, 1)
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("clock", &self.clock)
            .field("concepts", &self.concepts.len())
            .field("novel_tasks", &self.novel_tasks.len())
            .field("new_tasks", &self.new_tasks.len())
            .field("working", &self.working)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::BufferRecorder;
    use crate::stamp::OccurrenceTime;

    fn memory() -> (Memory, BufferRecorder) {
        let mut m = Memory::with_defaults();
        let recorder = BufferRecorder::new();
        m.set_recorder(Box::new(recorder.clone()));
        (m, recorder)
    }

    fn judgment_task(m: &mut Memory, content: Term) -> Task {
        let truth = TruthValue::new(1.0, 0.9);
        let stamp = Stamp::input(m.new_stamp_serial(), m.time(), OccurrenceTime::Eternal);
        Task::input(
            Sentence::judgment(content, truth, stamp),
            BudgetValue::for_judgment(&truth),
        )
    }

    fn inh(a: &str, b: &str) -> Term {
        Term::inheritance(&Term::atom(a), &Term::atom(b)).unwrap()
    }

    #[test]
    fn test_input_below_threshold_is_neglected() {
        let (mut m, recorder) = memory();
        let mut task = judgment_task(&mut m, inh("a", "b"));
        *task.budget_mut() = BudgetValue::new(0.001, 0.001, 0.001);
        m.input_task(task);
        assert_eq!(m.pending_task_count(), 0);
        assert!(recorder.messages().iter().any(|msg| msg.contains("Neglected")));
    }

    #[test]
    fn test_zero_confidence_derivation_is_ignored() {
        let (mut m, recorder) = memory();
        let parent = judgment_task(&mut m, inh("a", "b"));
        m.set_current_task(Some(parent.clone()));
        let stamp = Stamp::child(parent.sentence().stamp(), 0);
        let sentence = Sentence::judgment(inh("b", "c"), TruthValue::new(1.0, 0.0), stamp);
        let task = Task::derived(sentence, BudgetValue::new(0.8, 0.8, 0.8), &parent, None);
        m.derived_task(task, false, true);
        assert_eq!(m.pending_task_count(), 0);
        assert!(recorder.messages().iter().any(|msg| msg.contains("Ignored")));
    }

    #[test]
    fn test_cyclic_derivation_is_rejected() {
        let (mut m, recorder) = memory();
        let content = inh("a", "b");
        let parent = judgment_task(&mut m, content.clone());
        m.set_current_task(Some(parent.clone()));
        // re-deriving the parent's own content: the chain update puts the
        // parent content on the chain, and the conclusion equals it
        let stamp = Stamp::child(parent.sentence().stamp(), 0);
        let sentence = Sentence::judgment(content, TruthValue::new(1.0, 0.9), stamp);
        let task = Task::derived(sentence, BudgetValue::new(0.8, 0.8, 0.8), &parent, None);
        m.derived_task(task, false, true);
        assert_eq!(m.pending_task_count(), 0);
        assert!(recorder
            .messages()
            .iter()
            .any(|msg| msg.contains("Cyclic Reasoning")));
    }

    #[test]
    fn test_negation_partner_is_excused_from_cycle_check() {
        let (mut m, _recorder) = memory();
        let content = inh("a", "b");
        let negated = Term::negation(&content);
        let parent = judgment_task(&mut m, negated);
        m.set_current_task(Some(parent.clone()));
        let mut stamp = Stamp::child(parent.sentence().stamp(), 0);
        stamp.add_to_chain(content.clone(), 20);
        let sentence = Sentence::judgment(content, TruthValue::new(0.0, 0.9), stamp);
        let task = Task::derived(sentence, BudgetValue::new(0.8, 0.8, 0.8), &parent, None);
        m.derived_task(task, false, true);
        assert_eq!(m.pending_task_count(), 1);
    }

    #[test]
    fn test_revision_with_duplicate_evidence_is_rejected() {
        let (mut m, recorder) = memory();
        let parent = judgment_task(&mut m, inh("a", "b"));
        m.set_current_task(Some(parent));
        m.set_new_stamp(Some(Stamp::from_base(&[3, 5, 3], 0)));
        m.double_premise_task_revised(
            Some(inh("a", "c")),
            Some(TruthValue::new(1.0, 0.95)),
            BudgetValue::new(0.9, 0.9, 0.9),
        );
        assert_eq!(m.pending_task_count(), 0);
        assert!(recorder
            .messages()
            .iter()
            .any(|msg| msg.contains("Overlapping Evidence")));
    }

    #[test]
    fn test_revision_with_distinct_evidence_is_admitted() {
        let (mut m, _recorder) = memory();
        let parent = judgment_task(&mut m, inh("a", "b"));
        m.set_current_task(Some(parent));
        m.set_new_stamp(Some(Stamp::from_base(&[3, 5, 7], 0)));
        m.double_premise_task_revised(
            Some(inh("a", "c")),
            Some(TruthValue::new(1.0, 0.95)),
            BudgetValue::new(0.9, 0.9, 0.9),
        );
        assert_eq!(m.pending_task_count(), 1);
    }

    #[test]
    fn test_single_premise_circular_conclusion_is_dropped() {
        let (mut m, _recorder) = memory();
        let grandparent_content = inh("x", "y");
        let grandparent = judgment_task(&mut m, grandparent_content.clone());
        let mid_sentence = Sentence::judgment(
            Term::negation(&grandparent_content),
            TruthValue::new(0.0, 0.9),
            Stamp::child(grandparent.sentence().stamp(), 0),
        );
        let mid = Task::derived(
            mid_sentence,
            BudgetValue::new(0.8, 0.8, 0.8),
            &grandparent,
            None,
        );
        m.set_current_task(Some(mid));
        m.single_premise_task(
            grandparent_content,
            None,
            Some(TruthValue::new(1.0, 0.9)),
            BudgetValue::new(0.8, 0.8, 0.8),
        );
        assert_eq!(m.pending_task_count(), 0);
    }

    #[test]
    fn test_every_pending_task_is_above_threshold() {
        let (mut m, _recorder) = memory();
        let task = judgment_task(&mut m, inh("bird", "animal"));
        m.input_task(task);
        let threshold = m.config().budget_threshold;
        assert!(m
            .pending_tasks()
            .all(|t| t.budget().above_threshold(threshold)));
    }

    #[test]
    fn test_operator_registry() {
        let (mut m, _recorder) = memory();
        assert!(!m.is_registered_operator("^go"));
        m.add_operator(Operator::new("^go"));
        assert!(m.is_registered_operator("^go"));
        assert_eq!(m.get_operator("^go").unwrap().name(), "^go");
    }

    #[test]
    fn test_stamp_serials_are_unique() {
        let (mut m, _recorder) = memory();
        let a = m.new_stamp_serial();
        let b = m.new_stamp_serial();
        assert_ne!(a, b);
    }
}
