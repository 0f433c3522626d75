//! Tasks: the unit of scheduling.

use std::fmt;

use crate::bag::Item;
use crate::budget::BudgetValue;
use crate::sentence::Sentence;
use crate::term::Term;

/// Id-style reference to a task's ancestry.
///
/// Parents are not owning handles: a derived task records its parent's
/// content and the parent's own parent content, which is exactly the
/// slice of lineage the cyclic-derivation and circular-structural checks
/// consume. A parent evicted from every bag costs nothing to keep here.
#[derive(Debug, Clone)]
pub struct TaskParent {
    content: Term,
    parent_content: Option<Term>,
}

/// A sentence with a budget and ancestry; what bags schedule.
#[derive(Debug, Clone)]
pub struct Task {
    sentence: Sentence,
    budget: BudgetValue,
    parent: Option<TaskParent>,
    parent_belief: Option<Sentence>,
    best_solution: Option<Sentence>,
    key: String,
}

impl Task {
    /// A task arriving from outside; it has no parent.
    pub fn input(sentence: Sentence, budget: BudgetValue) -> Self {
        let key = sentence.key();
        Self {
            sentence,
            budget,
            parent: None,
            parent_belief: None,
            best_solution: None,
            key,
        }
    }

    /// A task produced by inference from `parent`, optionally against a
    /// belief.
    pub fn derived(
        sentence: Sentence,
        budget: BudgetValue,
        parent: &Task,
        parent_belief: Option<Sentence>,
    ) -> Self {
        let key = sentence.key();
        Self {
            sentence,
            budget,
            parent: Some(TaskParent {
                content: parent.content().clone(),
                parent_content: parent.parent_content().cloned(),
            }),
            parent_belief,
            best_solution: None,
            key,
        }
    }

    pub fn sentence(&self) -> &Sentence {
        &self.sentence
    }

    pub fn sentence_mut(&mut self) -> &mut Sentence {
        &mut self.sentence
    }

    pub fn content(&self) -> &Term {
        self.sentence.content()
    }

    pub fn budget(&self) -> &BudgetValue {
        &self.budget
    }

    pub fn budget_mut(&mut self) -> &mut BudgetValue {
        &mut self.budget
    }

    /// Whether the task came from outside rather than from inference.
    pub fn is_input(&self) -> bool {
        self.parent.is_none()
    }

    /// Derived without a belief: the mark of structural inference.
    pub fn is_structural(&self) -> bool {
        self.parent.is_some() && self.parent_belief.is_none()
    }

    /// Content of the parent task, if any.
    pub fn parent_content(&self) -> Option<&Term> {
        self.parent.as_ref().map(|p| &p.content)
    }

    /// Content of the grandparent task, if any.
    pub fn grandparent_content(&self) -> Option<&Term> {
        self.parent.as_ref().and_then(|p| p.parent_content.as_ref())
    }

    pub fn parent_belief(&self) -> Option<&Sentence> {
        self.parent_belief.as_ref()
    }

    pub fn best_solution(&self) -> Option<&Sentence> {
        self.best_solution.as_ref()
    }

    pub fn set_best_solution(&mut self, solution: Sentence) {
        self.best_solution = Some(solution);
    }
}

impl Item for Task {
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

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.budget, self.sentence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stamp::{OccurrenceTime, Stamp};
    use crate::truth::TruthValue;

    fn judgment(name: &str) -> Sentence {
        Sentence::judgment(
            Term::atom(name),
            TruthValue::new(1.0, 0.9),
            Stamp::input(1, 0, OccurrenceTime::Eternal),
        )
    }

    #[test]
    fn test_input_has_no_parent() {
        let t = Task::input(judgment("a"), BudgetValue::default());
        assert!(t.is_input());
        assert!(!t.is_structural());
        assert!(t.parent_content().is_none());
    }

    #[test]
    fn test_derivation_chain_of_contents() {
        let a = Task::input(judgment("a"), BudgetValue::default());
        let b = Task::derived(judgment("b"), BudgetValue::default(), &a, None);
        let c = Task::derived(judgment("c"), BudgetValue::default(), &b, None);
        assert_eq!(c.parent_content().unwrap().name(), "b");
        assert_eq!(c.grandparent_content().unwrap().name(), "a");
        assert!(b.is_structural());
    }
}
