//! Truth values and the pure truth maps.
//!
//! A [`TruthValue`] is a `(frequency, confidence)` pair: frequency is the
//! proportion of positive evidence, confidence the proportion of current
//! evidence among all evidence at the horizon. Both live in the unit
//! interval, confidence strictly below one — certainty is never reached
//! under insufficient knowledge.
//!
//! The functions here are total, deterministic and side-effect free; they
//! are the numeric half of every inference rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence is kept strictly below one.
const MAX_CONFIDENCE: f32 = 0.9999;

/// A `(frequency, confidence)` pair attached to judgments and goals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruthValue {
    frequency: f32,
    confidence: f32,
}

impl TruthValue {
    /// Create a truth value, clamping into range.
    pub fn new(frequency: f32, confidence: f32) -> Self {
        Self {
            frequency: frequency.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, MAX_CONFIDENCE),
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Expectation of the statement being the case: `c * (f - 1/2) + 1/2`.
    pub fn expectation(&self) -> f32 {
        self.confidence * (self.frequency - 0.5) + 0.5
    }
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{:.2};{:.2}%", self.frequency, self.confidence)
    }
}

/// Convert an evidence weight into confidence at horizon `k`.
pub fn w2c(weight: f32, horizon: f32) -> f32 {
    weight / (weight + horizon)
}

/// Convert confidence back into an evidence weight at horizon `k`.
pub fn c2w(confidence: f32, horizon: f32) -> f32 {
    horizon * confidence / (1.0 - confidence)
}

/// Structural deduction: the premise is relied upon with a fixed weight.
///
/// Frequency is carried; confidence becomes `f * c * reliance`.
pub fn deduction(t: &TruthValue, reliance: f32) -> TruthValue {
    TruthValue::new(t.frequency, t.frequency * t.confidence * reliance)
}

/// Negation: frequency flips, confidence is carried.
pub fn negation(t: &TruthValue) -> TruthValue {
    TruthValue::new(1.0 - t.frequency, t.confidence)
}

/// Contraposition: weak evidence against the converse.
///
/// The conclusion's frequency is zero; its confidence comes from the
/// weight `(1 - f) * c` taken to the horizon.
pub fn contraposition(t: &TruthValue, horizon: f32) -> TruthValue {
    let weight = (1.0 - t.frequency) * t.confidence;
    TruthValue::new(0.0, w2c(weight, horizon))
}

/// Induction between two premises; the dual of abduction.
pub fn induction(t1: &TruthValue, t2: &TruthValue, horizon: f32) -> TruthValue {
    abduction(t2, t1, horizon)
}

/// Abduction between two premises.
pub fn abduction(t1: &TruthValue, t2: &TruthValue, horizon: f32) -> TruthValue {
    let weight = t2.frequency * t1.confidence * t2.confidence;
    TruthValue::new(t1.frequency, w2c(weight, horizon))
}

/// Comparison between two premises, yielding a symmetric conclusion.
pub fn comparison(t1: &TruthValue, t2: &TruthValue, horizon: f32) -> TruthValue {
    let f0 = or(t1.frequency, t2.frequency);
    let frequency = if f0 == 0.0 {
        0.0
    } else {
        (t1.frequency * t2.frequency) / f0
    };
    let weight = f0 * t1.confidence * t2.confidence;
    TruthValue::new(frequency, w2c(weight, horizon))
}

fn or(a: f32, b: f32) -> f32 {
    1.0 - (1.0 - a) * (1.0 - b)
}
