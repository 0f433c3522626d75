//! Observation interfaces: the inference recorder and the output channel.
//!
//! Both are optional sinks installed by the driver. The default recorder
//! is a null object whose `is_active` is false, so call sites skip all
//! message formatting when nobody is listening.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::sentence::Sentence;
use crate::task::Task;
use crate::term::Term;

/// Receiver of fine-grained reasoning events.
pub trait Recorder: Send {
    /// When false, callers skip event formatting entirely.
    fn is_active(&self) -> bool;

    fn append(&mut self, _message: &str) {}
    fn on_cycle_start(&mut self, _clock: u64) {}
    fn on_cycle_end(&mut self, _clock: u64) {}
    fn on_concept_new(&mut self, _term: &Term) {}
    fn on_task_add(&mut self, _task: &Task, _reason: &str) {}
    fn on_task_remove(&mut self, _task: &Task, _reason: &str) {}
}

/// The do-nothing recorder installed by default.
#[derive(Debug, Default)]
pub struct NullRecorder;

impl Recorder for NullRecorder {
    fn is_active(&self) -> bool {
        false
    }
}

/// A recorder that forwards everything to `tracing` at debug level.
#[derive(Debug, Default)]
pub struct TracingRecorder;

impl Recorder for TracingRecorder {
    fn is_active(&self) -> bool {
        true
    }

    fn append(&mut self, message: &str) {
        debug!(target: "noema::trace", "{message}");
    }

    fn on_cycle_start(&mut self, clock: u64) {
        debug!(target: "noema::trace", clock, "cycle start");
    }

    fn on_cycle_end(&mut self, clock: u64) {
        debug!(target: "noema::trace", clock, "cycle end");
    }

    fn on_concept_new(&mut self, term: &Term) {
        debug!(target: "noema::trace", concept = %term, "new concept");
    }

    fn on_task_add(&mut self, task: &Task, reason: &str) {
        debug!(target: "noema::trace", %task, reason, "task added");
    }

    fn on_task_remove(&mut self, task: &Task, reason: &str) {
        debug!(target: "noema::trace", %task, reason, "task removed");
    }
}

/// One recorded event with its wall-clock instant.
#[derive(Debug, Clone)]
pub struct TraceEvent {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// A recorder that buffers events in memory; useful in tests and
/// inspection tools. Clone the handle before installing.
#[derive(Debug, Default, Clone)]
pub struct BufferRecorder {
    events: Arc<Mutex<Vec<TraceEvent>>>,
}

impl BufferRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, message: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(TraceEvent {
                at: Utc::now(),
                message,
            });
        }
    }

    /// Snapshot of the messages recorded so far.
    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .map(|e| e.iter().map(|ev| ev.message.clone()).collect())
            .unwrap_or_default()
    }
}

impl Recorder for BufferRecorder {
    fn is_active(&self) -> bool {
        true
    }

    fn append(&mut self, message: &str) {
        self.push(message.to_string());
    }

    fn on_cycle_start(&mut self, clock: u64) {
        self.push(format!("cycle {clock} start"));
    }

    fn on_cycle_end(&mut self, clock: u64) {
        self.push(format!("cycle {clock} end"));
    }

    fn on_concept_new(&mut self, term: &Term) {
        self.push(format!("new concept: {term}"));
    }

    fn on_task_add(&mut self, task: &Task, reason: &str) {
        self.push(format!("add [{reason}]: {task}"));
    }

    fn on_task_remove(&mut self, task: &Task, reason: &str) {
        self.push(format!("remove [{reason}]: {task}"));
    }
}

/// Receiver of reported sentences that clear the noise gate.
pub trait OutputChannel: Send {
    fn report(&mut self, sentence: &Sentence);
}

/// An output channel that collects reported sentences. Clone the handle
/// before installing.
#[derive(Debug, Default, Clone)]
pub struct CollectorOutput {
    reported: Arc<Mutex<Vec<Sentence>>>,
}

impl CollectorOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reported(&self) -> Vec<Sentence> {
        self.reported
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl OutputChannel for CollectorOutput {
    fn report(&mut self, sentence: &Sentence) {
        if let Ok(mut reported) = self.reported.lock() {
            reported.push(sentence.clone());
        }
    }
}
