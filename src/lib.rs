//! # noema — a bounded-resource reasoning kernel
//!
//! noema is the reasoning kernel of a non-axiomatic reasoner: it accepts
//! judgments, goals, questions and quests over a canonical term algebra
//! and produces derived beliefs and answers under the Assumption of
//! Insufficient Knowledge and Resources. Memory and time are always
//! finite here — every datum carries a priority/durability/quality
//! budget, storage is organized as probabilistic priority bags, and each
//! working cycle spends attention on whatever currently looks most
//! valuable. Most candidate work is discarded; that is the design, not a
//! failure mode.
//!
//! ## Quick start
//!
//! ```
//! use noema::{
//!     BudgetValue, Memory, OccurrenceTime, Sentence, Stamp, Task, Term, TruthValue,
//! };
//!
//! let mut memory = Memory::with_defaults();
//!
//! // <bird --> animal>. %1.00;0.90%
//! let content = Term::inheritance(&Term::atom("bird"), &Term::atom("animal")).unwrap();
//! let truth = TruthValue::new(1.0, 0.9);
//! let stamp = Stamp::input(
//!     memory.new_stamp_serial(),
//!     memory.time(),
//!     OccurrenceTime::Eternal,
//! );
//! let task = Task::input(
//!     Sentence::judgment(content, truth, stamp),
//!     BudgetValue::for_judgment(&truth),
//! );
//! memory.input_task(task);
//!
//! for _ in 0..10 {
//!     memory.cycle();
//! }
//! assert!(memory.concept_count() > 0);
//! ```
//!
//! ## Architecture
//!
//! - **Term algebra** ([`Term`]) — immutable, hash-consed terms: atoms,
//!   compounds (products, images, sets, intersections, differences,
//!   junctions, negation) and statements, canonicalized at construction.
//! - **Truth and budget functions** ([`truth`], [`budget`]) — the pure
//!   numeric maps every rule is built from.
//! - **Stamps** ([`Stamp`]) — bounded evidential bases and derivation
//!   chains; overlap detection is what keeps reasoning non-circular.
//! - **Concepts, tasks and links** ([`Concept`], [`Task`]) — the indexing
//!   fabric of memory.
//! - **The attention loop and admission gate** ([`Memory`]) — one cycle
//!   drains new tasks, maybe pulls a novel task, maybe fires a concept;
//!   every derived task passes one gate that enforces budget thresholds
//!   and rejects cyclic or evidence-overlapping derivations.
//! - **Structural rules** — single-premise transformations between
//!   compounds and their components (compose/decompose, product/image,
//!   set relations, negation, contraposition).
//!
//! ## Determinism
//!
//! A memory's only randomness is a per-instance xorshift generator
//! seeded from its configuration. Given the same seed and the same input
//! sequence, every cycle selects the same items and emits the same
//! derivations. `reset` re-seeds.

mod bag;
mod budget;
mod concept;
mod config;
mod error;
mod link;
mod memory;
mod recorder;
mod rules;
mod sentence;
mod stamp;
mod task;
mod term;
mod truth;

// Core API exports
pub use bag::{Bag, BagConfig, Item};
pub use budget::{
    activate, budget_inference, distribute_among_links, forget, rank_belief, truth_to_quality,
    BudgetValue,
};
pub use concept::Concept;
pub use config::EngineConfig;
pub use error::{NoemaError, NoemaResult};
pub use link::{LinkKind, TaskLink, TermLink};
pub use memory::{Memory, Operator};
pub use recorder::{
    BufferRecorder, CollectorOutput, NullRecorder, OutputChannel, Recorder, TraceEvent,
    TracingRecorder,
};
pub use sentence::{Punctuation, Sentence};
pub use stamp::{OccurrenceTime, Stamp};
pub use task::{Task, TaskParent};
pub use term::{Connector, Copula, TemporalOrder, Term};
pub use truth::{
    abduction, c2w, comparison, contraposition, deduction, induction, negation, w2c, TruthValue,
};

/// Prelude module for convenient imports.
///
/// ```
/// use noema::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::error::{NoemaError, NoemaResult};
    pub use crate::memory::{Memory, Operator};
    pub use crate::recorder::{BufferRecorder, CollectorOutput, NullRecorder, TracingRecorder};
    pub use crate::sentence::{Punctuation, Sentence};
    pub use crate::stamp::{OccurrenceTime, Stamp};
    pub use crate::task::Task;
    pub use crate::term::{Connector, Copula, TemporalOrder, Term};
    pub use crate::truth::TruthValue;
    pub use crate::BudgetValue;
}
