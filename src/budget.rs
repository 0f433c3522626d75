//! Budgets and the budget algebra.
//!
//! Every schedulable item — task, concept, link — carries a
//! [`BudgetValue`]: priority (current urgency), durability (how slowly
//! urgency decays) and quality (long-term usefulness). The geometric mean
//! of the three is the item's summary, and "above threshold" on the
//! summary is the single admission gate of the engine.
//!
//! The derivation functions at the bottom are the scheduling half of every
//! inference rule: they charge the conclusion a complexity-proportional
//! share of the premises' budgets.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sentence::Sentence;
use crate::truth::TruthValue;

/// Extended boolean AND over unit values.
pub(crate) fn and(a: f32, b: f32) -> f32 {
    a * b
}

/// Extended boolean OR over unit values.
pub(crate) fn or(a: f32, b: f32) -> f32 {
    1.0 - (1.0 - a) * (1.0 - b)
}

/// Arithmetic mean.
pub(crate) fn ave_ari(a: f32, b: f32) -> f32 {
    (a + b) / 2.0
}

/// Geometric mean of three unit values.
pub(crate) fn ave_geo(a: f32, b: f32, c: f32) -> f32 {
    (a * b * c).powf(1.0 / 3.0)
}

/// A priority/durability/quality triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetValue {
    priority: f32,
    durability: f32,
    quality: f32,
}

impl Default for BudgetValue {
    /// The budget of an item nobody has asked for yet.
    fn default() -> Self {
        Self::new(0.01, 0.01, 0.01)
    }
}

impl BudgetValue {
    /// Create a budget, clamping each component into the unit interval.
    pub fn new(priority: f32, durability: f32, quality: f32) -> Self {
        Self {
            priority: priority.clamp(0.0, 1.0),
            durability: durability.clamp(0.0, 1.0),
            quality: quality.clamp(0.0, 1.0),
        }
    }

    /// Default budget for an input judgment with the given truth.
    pub fn for_judgment(truth: &TruthValue) -> Self {
        Self::new(0.8, 0.8, truth_to_quality(truth))
    }

    /// Default budget for an input question or quest.
    pub fn for_question() -> Self {
        Self::new(0.9, 0.9, 1.0)
    }

    /// Default budget for an input goal with the given truth.
    pub fn for_goal(truth: &TruthValue) -> Self {
        Self::new(0.9, 0.9, truth_to_quality(truth))
    }

    pub fn priority(&self) -> f32 {
        self.priority
    }

    pub fn durability(&self) -> f32 {
        self.durability
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn set_priority(&mut self, v: f32) {
        self.priority = v.clamp(0.0, 1.0);
    }

    pub fn set_durability(&mut self, v: f32) {
        self.durability = v.clamp(0.0, 1.0);
    }

    pub fn set_quality(&mut self, v: f32) {
        self.quality = v.clamp(0.0, 1.0);
    }

    /// Raise priority by OR-ing in `v`.
    pub fn inc_priority(&mut self, v: f32) {
        self.priority = or(self.priority, v);
    }

    /// Lower priority by AND-ing in `v`.
    pub fn dec_priority(&mut self, v: f32) {
        self.priority = and(self.priority, v);
    }

    /// Raise durability by OR-ing in `v`.
    pub fn inc_durability(&mut self, v: f32) {
        self.durability = or(self.durability, v);
    }

    /// Merge another budget in, keeping the larger of each component.
    pub fn merge(&mut self, other: &BudgetValue) {
        self.priority = self.priority.max(other.priority);
        self.durability = self.durability.max(other.durability);
        self.quality = self.quality.max(other.quality);
    }

    /// Overall usefulness: geometric mean of the three components.
    pub fn summary(&self) -> f32 {
        ave_geo(self.priority, self.durability, self.quality)
    }

    /// Whether the summary clears the admission threshold.
    pub fn above_threshold(&self, threshold: f32) -> bool {
        self.summary() >= threshold
    }
}

impl fmt::Display for BudgetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${:.2};{:.2};{:.2}$",
            self.priority, self.durability, self.quality
        )
    }
}

/// Quality a judgment of the given truth deserves as an item.
pub fn truth_to_quality(t: &TruthValue) -> f32 {
    let exp = t.expectation();
    exp.max((1.0 - exp) * 0.75)
}

/// Rank of a judgment in a belief table: confidence OR originality.
///
/// Originality decays with the length of the evidential base, so direct
/// experience outranks derived conclusions of equal confidence.
pub fn rank_belief(judgment: &Sentence) -> f32 {
    let confidence = judgment
        .truth()
        .map(|t| t.confidence())
        .unwrap_or(0.0);
    let originality = 1.0 / (judgment.stamp().evidential_base().len() as f32 + 1.0);
    or(confidence, originality)
}

/// Activate a concept with the budget of a task touching it.
///
/// Priority accumulates (OR), durability averages, quality is untouched.
pub fn activate(concept: &mut BudgetValue, incoming: &BudgetValue) {
    concept.priority = or(concept.priority, incoming.priority);
    concept.durability = ave_ari(concept.durability, incoming.durability);
}

/// Decay an item's priority toward its quality floor.
///
/// After `forget_cycles` untouched cycles a fully durable item has
/// relaxed most of the way down to `quality * relative_threshold`.
pub fn forget(budget: &mut BudgetValue, forget_cycles: f32, relative_threshold: f32) {
    let mut quality = budget.quality * relative_threshold;
    let p = budget.priority - quality;
    if p > 0.0 {
        quality += p * budget.durability.powf(1.0 / (forget_cycles * p));
    }
    budget.set_priority(quality);
}

/// Split a task budget evenly among `n` links.
pub fn distribute_among_links(budget: &BudgetValue, n: usize) -> BudgetValue {
    let priority = budget.priority / (n.max(1) as f32);
    BudgetValue::new(priority, budget.durability, budget.quality)
}

/// Shared kernel of all inference budgets.
///
/// The conclusion inherits the task-link budget, with durability and
/// quality divided by the conclusion's syntactic complexity. When a belief
/// link took part, its budget is folded in and the link itself is fed back
/// a share of the conclusion's quality (plus the target concept's
/// activation), so productive links grow hotter.
pub fn budget_inference(
    quality: f32,
    complexity: usize,
    task_budget: &BudgetValue,
    belief_link: Option<(&mut BudgetValue, f32)>,
) -> BudgetValue {
    let complexity = complexity.max(1) as f32;
    let mut priority = task_budget.priority();
    let mut durability = task_budget.durability() / complexity;
    let quality = quality / complexity;
    if let Some((link, target_activation)) = belief_link {
        priority = or(priority, link.priority());
        durability = and(durability, link.durability());
        link.inc_priority(or(quality, target_activation));
        link.inc_durability(quality);
    }
    BudgetValue::new(priority, durability, quality)
}
