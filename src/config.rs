//! Engine constants.
//!
//! Every tunable of the kernel lives in [`EngineConfig`], a plain value
//! supplied at construction. The defaults reproduce the classic reasoner
//! personality: a 0.9 reliance on structural deduction, hundred-level bags,
//! an evidential base of at most eight serials, and a twenty-term
//! derivation chain.

use serde::{Deserialize, Serialize};

use crate::error::{NoemaError, NoemaResult};

/// Configuration for a [`Memory`](crate::Memory) instance.
///
/// All fields are public; construct with `EngineConfig::default()` and
/// override what you need. [`EngineConfig::validate`] is called by
/// `Memory::new` and rejects out-of-range values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Confidence factor applied by single-premise structural deduction
    pub reliance: f32,
    /// Evidential horizon `k` used when converting weight to confidence
    pub horizon: f32,
    /// Minimum budget summary for a task to be admitted anywhere
    pub budget_threshold: f32,
    /// Quality floor factor used by bag forgetting
    pub relative_threshold: f32,

    /// Capacity of the concepts bag
    pub concept_bag_capacity: usize,
    /// Capacity of the novel-tasks bag
    pub novel_task_bag_capacity: usize,
    /// Capacity of each concept's task-link bag
    pub task_link_bag_capacity: usize,
    /// Capacity of each concept's term-link bag
    pub term_link_bag_capacity: usize,
    /// Number of priority levels in every bag
    pub bag_levels: usize,

    /// Cycles a concept stays relevant without being touched
    pub concept_forgetting_cycles: f32,
    /// Cycles a task link stays relevant without being touched
    pub task_link_forgetting_cycles: f32,
    /// Cycles a term link stays relevant without being touched
    pub term_link_forgetting_cycles: f32,

    /// Truth expectation a judgment needs to seed a novel concept
    pub creation_expectation: f32,
    /// Maximum length of a stamp's evidential base
    pub max_evidential_base: usize,
    /// Maximum length of a stamp's derivation chain
    pub max_derivation_chain: usize,

    /// Capacity of a concept's ranked belief table
    pub belief_capacity: usize,
    /// Capacity of a concept's pending-question list
    pub question_capacity: usize,
    /// Capacity of a concept's pending-goal list
    pub goal_capacity: usize,

    /// Term links reasoned upon per concept firing
    pub max_reasoned_term_links: usize,
    /// Candidate term links inspected per novelty-filtered selection
    pub max_matched_term_links: usize,
    /// Length of the per-task-link novelty recording ring
    pub novelty_recording_length: usize,

    /// Occurrence-time gap (in cycles) under which two events count as
    /// concurrent for temporal induction
    pub duration: u64,

    /// Output noise gate, 0..=100; only tasks whose budget summary
    /// reaches `1 - noise_level/100` are reported. At 100 everything is
    /// reported, at 0 only full-budget tasks.
    pub noise_level: u8,
    /// Seed for the per-memory deterministic generator
    pub rng_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reliance: 0.9,
            horizon: 1.0,
            budget_threshold: 0.01,
            relative_threshold: 0.1,
            concept_bag_capacity: 1000,
            novel_task_bag_capacity: 100,
            task_link_bag_capacity: 20,
            term_link_bag_capacity: 100,
            bag_levels: 100,
            concept_forgetting_cycles: 10.0,
            task_link_forgetting_cycles: 20.0,
            term_link_forgetting_cycles: 50.0,
            creation_expectation: 0.66,
            max_evidential_base: 8,
            max_derivation_chain: 20,
            belief_capacity: 7,
            question_capacity: 5,
            goal_capacity: 5,
            max_reasoned_term_links: 10,
            max_matched_term_links: 10,
            novelty_recording_length: 10,
            duration: 5,
            noise_level: 100,
            rng_seed: 1,
        }
    }
}

impl EngineConfig {
    /// Check every field against its admissible range.
    pub fn validate(&self) -> NoemaResult<()> {
        fn unit(name: &str, v: f32) -> NoemaResult<()> {
            if !(0.0..=1.0).contains(&v) || !v.is_finite() {
                return Err(NoemaError::InvalidConfig {
                    reason: format!("{name} must lie in [0, 1], got {v}"),
                });
            }
            Ok(())
        }
        fn positive(name: &str, v: usize) -> NoemaResult<()> {
            if v == 0 {
                return Err(NoemaError::InvalidConfig {
                    reason: format!("{name} must be positive"),
                });
            }
            Ok(())
        }

        unit("reliance", self.reliance)?;
        unit("budget_threshold", self.budget_threshold)?;
        unit("relative_threshold", self.relative_threshold)?;
        unit("creation_expectation", self.creation_expectation)?;
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(NoemaError::InvalidConfig {
                reason: format!("horizon must be positive, got {}", self.horizon),
            });
        }
        positive("concept_bag_capacity", self.concept_bag_capacity)?;
        positive("novel_task_bag_capacity", self.novel_task_bag_capacity)?;
        positive("task_link_bag_capacity", self.task_link_bag_capacity)?;
        positive("term_link_bag_capacity", self.term_link_bag_capacity)?;
        positive("bag_levels", self.bag_levels)?;
        positive("max_evidential_base", self.max_evidential_base)?;
        positive("max_derivation_chain", self.max_derivation_chain)?;
        positive("belief_capacity", self.belief_capacity)?;
        positive("question_capacity", self.question_capacity)?;
        positive("goal_capacity", self.goal_capacity)?;
        positive("max_reasoned_term_links", self.max_reasoned_term_links)?;
        positive("max_matched_term_links", self.max_matched_term_links)?;
        positive("novelty_recording_length", self.novelty_recording_length)?;
        if self.noise_level > 100 {
            return Err(NoemaError::InvalidConfig {
                reason: format!("noise_level must lie in 0..=100, got {}", self.noise_level),
            });
        }
        for (name, rate) in [
            ("concept_forgetting_cycles", self.concept_forgetting_cycles),
            ("task_link_forgetting_cycles", self.task_link_forgetting_cycles),
            ("term_link_forgetting_cycles", self.term_link_forgetting_cycles),
        ] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(NoemaError::InvalidConfig {
                    reason: format!("{name} must be positive, got {rate}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_reliance() {
        let config = EngineConfig {
            reliance: 1.5,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = EngineConfig {
            concept_bag_capacity: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_noise_above_hundred() {
        let config = EngineConfig {
            noise_level: 101,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
