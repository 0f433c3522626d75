//! Concepts: the persistent indexing unit of memory.
//!
//! A concept is keyed by a constant term and holds everything the system
//! knows around that term: a bag of task links worth revisiting, a bag of
//! term links into structurally related concepts, a bounded ranked table
//! of beliefs, and bounded lists of pending questions and goals. Concepts
//! are created on first reference and die by displacement from the
//! concepts bag when their priority has decayed below everything else —
//! there is no other garbage collection.

use tracing::trace;

use crate::bag::{Bag, BagConfig, Item};
use crate::budget::{self, BudgetValue};
use crate::config::EngineConfig;
use crate::link::{prepare_component_links, LinkKind, TaskLink, TermLink};
use crate::memory::Memory;
use crate::rules;
use crate::sentence::Sentence;
use crate::stamp::Stamp;
use crate::task::Task;
use crate::term::Term;

/// Insert a judgment into a ranked, bounded table.
///
/// Higher-ranked beliefs come first; on rank ties the newcomer wins the
/// earlier slot. The weakest entry is dropped when capacity is exceeded.
fn add_to_table(table: &mut Vec<Sentence>, sentence: Sentence, capacity: usize) {
    let rank = budget::rank_belief(&sentence);
    let position = table
        .iter()
        .position(|existing| rank >= budget::rank_belief(existing))
        .unwrap_or(table.len());
    table.insert(position, sentence);
    if table.len() > capacity {
        table.pop();
    }
}

/// The per-term unit of long-term memory.
#[derive(Debug)]
pub struct Concept {
    term: Term,
    budget: BudgetValue,
    key: String,
    task_links: Bag<TaskLink>,
    term_links: Bag<TermLink>,
    term_link_templates: Vec<TermLink>,
    beliefs: Vec<Sentence>,
    questions: Vec<Task>,
    goals: Vec<Task>,
}

impl Concept {
    pub fn new(term: Term, config: &EngineConfig) -> Self {
        let term_link_templates = if term.is_composite() {
            prepare_component_links(&term)
        } else {
            Vec::new()
        };
        let key = term.name().to_string();
        Self {
            task_links: Bag::new(BagConfig {
                capacity: config.task_link_bag_capacity,
                levels: config.bag_levels,
                forget_cycles: config.task_link_forgetting_cycles,
                relative_threshold: config.relative_threshold,
            }),
            term_links: Bag::new(BagConfig {
                capacity: config.term_link_bag_capacity,
                levels: config.bag_levels,
                forget_cycles: config.term_link_forgetting_cycles,
                relative_threshold: config.relative_threshold,
            }),
            term_link_templates,
            beliefs: Vec::new(),
            questions: Vec::new(),
            goals: Vec::new(),
            budget: BudgetValue::default(),
            key,
            term,
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn beliefs(&self) -> &[Sentence] {
        &self.beliefs
    }

    pub fn questions(&self) -> &[Task] {
        &self.questions
    }

    pub fn goals(&self) -> &[Task] {
        &self.goals
    }

    pub(crate) fn term_link_templates(&self) -> &[TermLink] {
        &self.term_link_templates
    }

    /// Raise this concept's budget for a task touching it, then decay,
    /// mirroring the pick-out/activate/put-back sequence its level will
    /// see at commit.
    pub(crate) fn activate(&mut self, incoming: &BudgetValue, config: &EngineConfig) {
        budget::activate(&mut self.budget, incoming);
        budget::forget(
            &mut self.budget,
            config.concept_forgetting_cycles,
            config.relative_threshold,
        );
    }

    /// Find a belief usable against `task`: the highest-ranked entry
    /// whose stamp does not overlap the task's, together with the merged
    /// stamp a double-premise rule would use.
    pub(crate) fn find_belief(
        &self,
        task: &Task,
        now: u64,
        max_base: usize,
        max_chain: usize,
    ) -> Option<(Sentence, Stamp)> {
        for belief in &self.beliefs {
            if let Some(stamp) = Stamp::merge(
                task.sentence().stamp(),
                belief.stamp(),
                now,
                max_base,
                max_chain,
            ) {
                return Some((belief.clone(), stamp));
            }
        }
        None
    }

    /// Local processing of a task that reached this concept directly.
    pub(crate) fn direct_process(&mut self, task: &Task, memory: &mut Memory) {
        match task.sentence().punctuation() {
            crate::sentence::Punctuation::Judgment => self.process_judgment(task, memory),
            crate::sentence::Punctuation::Question | crate::sentence::Punctuation::Quest => {
                self.process_question(task, memory)
            }
            crate::sentence::Punctuation::Goal => self.process_goal(task, memory),
        }
        if task
            .budget()
            .above_threshold(memory.config().budget_threshold)
        {
            self.link_to_task(task, memory);
        }
    }

    fn process_judgment(&mut self, task: &Task, memory: &mut Memory) {
        let judgment = task.sentence();
        if self
            .beliefs
            .iter()
            .any(|belief| belief.stamp() == judgment.stamp())
        {
            memory.record_task_remove(task, "Duplicated");
            return;
        }
        if task
            .budget()
            .above_threshold(memory.config().budget_threshold)
        {
            let capacity = memory.config().belief_capacity;
            add_to_table(&mut self.beliefs, judgment.clone(), capacity);
            trace!(concept = %self.term, belief = %judgment, "belief admitted");
        }
    }

    fn process_question(&mut self, task: &Task, memory: &mut Memory) {
        let known = self
            .questions
            .iter()
            .any(|q| q.content() == task.content());
        if !known {
            self.questions.push(task.clone());
        }
        let capacity = memory.config().question_capacity;
        while self.questions.len() > capacity {
            self.questions.remove(0);
        }
    }

    fn process_goal(&mut self, task: &Task, memory: &mut Memory) {
        let known = self.goals.iter().any(|g| g.content() == task.content());
        if !known {
            self.goals.push(task.clone());
        }
        let capacity = memory.config().goal_capacity;
        while self.goals.len() > capacity {
            self.goals.remove(0);
        }
    }

    /// Wire a task into this concept and, through the link templates,
    /// into every component concept.
    fn link_to_task(&mut self, task: &Task, memory: &mut Memory) {
        let task_budget = *task.budget();
        let recording = memory.config().novelty_recording_length;
        self.insert_task_link(
            TaskLink::new(task.clone(), None, task_budget, recording),
            memory.config(),
        );
        if !self.term.is_composite() || self.term_link_templates.is_empty() {
            return;
        }
        let sub_budget =
            budget::distribute_among_links(&task_budget, self.term_link_templates.len());
        if !sub_budget.above_threshold(memory.config().budget_threshold) {
            return;
        }
        let templates = self.term_link_templates.clone();
        for template in &templates {
            let target = template.target().clone();
            memory.with_concept(&target, |concept, memory| {
                concept.insert_task_link(
                    TaskLink::new(task.clone(), Some(template), sub_budget, recording),
                    memory.config(),
                );
            });
        }
        self.build_term_links(&task_budget, memory);
    }

    /// Build reciprocal term links for every non-transform template,
    /// recursing through composite components.
    fn build_term_links(&mut self, task_budget: &BudgetValue, memory: &mut Memory) {
        if self.term_link_templates.is_empty() {
            return;
        }
        let sub_budget =
            budget::distribute_among_links(task_budget, self.term_link_templates.len());
        if !sub_budget.above_threshold(memory.config().budget_threshold) {
            return;
        }
        let templates = self.term_link_templates.clone();
        for template in &templates {
            if template.kind() == LinkKind::Transform {
                continue;
            }
            let target = template.target().clone();
            let own_term = self.term.clone();
            let linked = memory.with_concept(&target, |concept, memory| {
                concept.insert_term_link(TermLink::from_template(
                    own_term.clone(),
                    template,
                    sub_budget,
                ));
                if target.is_composite() {
                    concept.build_term_links(&sub_budget, memory);
                }
            });
            if linked {
                self.insert_term_link(TermLink::from_template(target, template, sub_budget));
            }
        }
    }

    pub(crate) fn insert_task_link(&mut self, link: TaskLink, config: &EngineConfig) {
        let link_budget = *link.budget();
        self.task_links.put_in(link);
        self.activate(&link_budget, config);
    }

    pub(crate) fn insert_term_link(&mut self, link: TermLink) {
        self.term_links.put_in(link);
    }

    /// One reasoning step: select a task link, then either run the
    /// product/image transform or reason it against a handful of novel
    /// term links, stopping as soon as the cycle has produced something.
    pub(crate) fn fire(&mut self, memory: &mut Memory) {
        let Some(mut task_link) = self.task_links.take_out(memory.rng_mut()) else {
            return;
        };
        memory.set_current_task(Some(task_link.target_task().clone()));
        memory.set_current_task_link_budget(Some(*task_link.budget()));
        memory.clear_current_belief_link();
        if task_link.kind() == LinkKind::Transform {
            memory.set_current_belief(None);
            memory.set_new_stamp(None);
            rules::transform_task(&task_link, memory);
        } else {
            let mut remaining = memory.config().max_reasoned_term_links;
            while memory.no_result() && remaining > 0 {
                let Some(term_link) = self.take_novel_term_link(&mut task_link, memory) else {
                    break;
                };
                memory.set_current_belief_link(term_link);
                rules::reason(&task_link, memory);
                if let Some(used) = memory.take_current_belief_link() {
                    self.term_links.put_back(used);
                }
                remaining -= 1;
            }
        }
        memory.set_current_task_link_budget(None);
        self.task_links.put_back(task_link);
    }

    fn take_novel_term_link(
        &mut self,
        task_link: &mut TaskLink,
        memory: &mut Memory,
    ) -> Option<TermLink> {
        let attempts = memory.config().max_matched_term_links;
        let now = memory.time();
        for _ in 0..attempts {
            let term_link = self.term_links.take_out(memory.rng_mut())?;
            if task_link.novel(&term_link, now) {
                return Some(term_link);
            }
            self.term_links.put_back(term_link);
        }
        None
    }
}

impl Item for Concept {
    fn key(&self) -> &str {
        &self.key
    }

    fn budget(&self) -> &BudgetValue {
        &self.budget
    }

    fn budget_mut(&mut self) -> &mut BudgetValue {
        &mut self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stamp::OccurrenceTime;
    use crate::truth::TruthValue;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn judgment(serial: u64, confidence: f32) -> Sentence {
        Sentence::judgment(
            Term::inheritance(&Term::atom("bird"), &Term::atom("animal")).unwrap(),
            TruthValue::new(1.0, confidence),
            Stamp::input(serial, 0, OccurrenceTime::Eternal),
        )
    }

    #[test]
    fn test_belief_table_is_ranked_and_bounded() {
        let mut table = Vec::new();
        for i in 0..10 {
            add_to_table(&mut table, judgment(i, 0.1 + 0.08 * i as f32), 7);
        }
        assert_eq!(table.len(), 7);
        for pair in table.windows(2) {
            assert!(budget::rank_belief(&pair[0]) >= budget::rank_belief(&pair[1]));
        }
    }

    #[test]
    fn test_concept_has_templates_for_composite_terms() {
        let term = Term::inheritance(&Term::atom("bird"), &Term::atom("animal")).unwrap();
        let concept = Concept::new(term, &config());
        assert_eq!(concept.term_link_templates().len(), 2);
        let atom_concept = Concept::new(Term::atom("bird"), &config());
        assert!(atom_concept.term_link_templates().is_empty());
    }

    #[test]
    fn test_activation_raises_priority() {
        let mut concept = Concept::new(Term::atom("bird"), &config());
        let before = concept.budget().priority();
        concept.activate(&BudgetValue::new(0.9, 0.9, 0.9), &config());
        assert!(concept.budget().priority() > before);
    }
}
