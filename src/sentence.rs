//! Sentences: a term under a punctuation, with truth and provenance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stamp::Stamp;
use crate::term::{TemporalOrder, Term};
use crate::truth::TruthValue;

/// What kind of attitude a sentence expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Punctuation {
    /// Something believed, with truth
    Judgment,
    /// Something asked about a belief
    Question,
    /// Something desired, with truth
    Goal,
    /// Something asked about a desire
    Quest,
}

impl Punctuation {
    /// The surface mark of the punctuation.
    pub fn mark(self) -> char {
        match self {
            Punctuation::Judgment => '.',
            Punctuation::Question => '?',
            Punctuation::Goal => '!',
            Punctuation::Quest => '@',
        }
    }

    /// Whether sentences of this punctuation carry truth.
    pub fn carries_truth(self) -> bool {
        matches!(self, Punctuation::Judgment | Punctuation::Goal)
    }
}

/// An immutable statement of content, attitude, truth and provenance.
///
/// Truth is present exactly on judgments and goals; a truth value passed
/// with a question or quest is discarded at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    content: Term,
    punctuation: Punctuation,
    truth: Option<TruthValue>,
    stamp: Stamp,
}

impl Sentence {
    pub fn new(
        content: Term,
        punctuation: Punctuation,
        truth: Option<TruthValue>,
        stamp: Stamp,
    ) -> Self {
        let truth = if punctuation.carries_truth() {
            truth
        } else {
            None
        };
        Self {
            content,
            punctuation,
            truth,
            stamp,
        }
    }

    pub fn judgment(content: Term, truth: TruthValue, stamp: Stamp) -> Self {
        Self::new(content, Punctuation::Judgment, Some(truth), stamp)
    }

    pub fn question(content: Term, stamp: Stamp) -> Self {
        Self::new(content, Punctuation::Question, None, stamp)
    }

    pub fn goal(content: Term, truth: TruthValue, stamp: Stamp) -> Self {
        Self::new(content, Punctuation::Goal, Some(truth), stamp)
    }

    pub fn quest(content: Term, stamp: Stamp) -> Self {
        Self::new(content, Punctuation::Quest, None, stamp)
    }

    pub fn content(&self) -> &Term {
        &self.content
    }

    pub fn punctuation(&self) -> Punctuation {
        self.punctuation
    }

    pub fn truth(&self) -> Option<&TruthValue> {
        self.truth.as_ref()
    }

    pub fn stamp(&self) -> &Stamp {
        &self.stamp
    }

    pub fn stamp_mut(&mut self) -> &mut Stamp {
        &mut self.stamp
    }

    pub fn is_judgment(&self) -> bool {
        self.punctuation == Punctuation::Judgment
    }

    pub fn is_question(&self) -> bool {
        self.punctuation == Punctuation::Question
    }

    pub fn is_goal(&self) -> bool {
        self.punctuation == Punctuation::Goal
    }

    pub fn is_quest(&self) -> bool {
        self.punctuation == Punctuation::Quest
    }

    /// The temporal order of the content.
    pub fn temporal_order(&self) -> TemporalOrder {
        self.content.temporal_order()
    }

    /// Whether the sentence holds timelessly.
    pub fn is_eternal(&self) -> bool {
        self.stamp.occurrence_time().is_eternal()
    }

    /// Scheduling key: content, punctuation and truth. Two sentences with
    /// the same key are the same item to a bag.
    pub fn key(&self) -> String {
        match &self.truth {
            Some(t) => format!("{}{} {}", self.content.name(), self.punctuation.mark(), t),
            None => format!("{}{}", self.content.name(), self.punctuation.mark()),
        }
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.content, self.punctuation.mark())?;
        if let Some(t) = &self.truth {
            write!(f, " {t}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stamp::OccurrenceTime;

    fn stamp() -> Stamp {
        Stamp::input(1, 0, OccurrenceTime::Eternal)
    }

    #[test]
    fn test_question_drops_truth() {
        let s = Sentence::new(
            Term::atom("a"),
            Punctuation::Question,
            Some(TruthValue::new(1.0, 0.9)),
            stamp(),
        );
        assert!(s.truth().is_none());
    }

    #[test]
    fn test_judgment_carries_truth() {
        let s = Sentence::judgment(Term::atom("a"), TruthValue::new(1.0, 0.9), stamp());
        assert!(s.truth().is_some());
        assert!(s.is_judgment());
    }

    #[test]
    fn test_key_distinguishes_punctuation() {
        let j = Sentence::judgment(Term::atom("a"), TruthValue::new(1.0, 0.9), stamp());
        let q = Sentence::question(Term::atom("a"), stamp());
        assert_ne!(j.key(), q.key());
    }
}
