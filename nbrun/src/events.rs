//! Run events and event sinks.
//!
//! The runner reports progress through an [`EventSink`]. Sinks must never
//! fail a run: event delivery is best-effort by contract.

use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// An event emitted during a notebook run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// The run has loaded its notebook and is about to start.
    RunStarted {
        /// Path of the notebook being run.
        path: PathBuf,
        /// Total number of cells in the notebook.
        cell_count: usize,
    },
    /// A code cell is about to execute.
    CellStarted {
        /// The cell's index.
        index: usize,
    },
    /// A code cell finished executing.
    CellCompleted {
        /// The cell's index.
        index: usize,
        /// Wall-clock execution time in milliseconds.
        duration_ms: f64,
    },
    /// A code cell's content failed to run.
    CellFailed {
        /// The cell's index.
        index: usize,
        /// The engine's failure message.
        message: String,
    },
    /// The run halted at a stop-tagged cell. Not a failure.
    RunHalted {
        /// Index of the halting cell.
        index: usize,
        /// Why the run halted.
        reason: String,
    },
    /// Every cell was offered to the engine.
    RunCompleted {
        /// Number of code cells executed.
        executed: usize,
    },
    /// The notebook was written back to disk.
    NotebookSaved {
        /// Path the notebook was written to.
        path: PathBuf,
    },
}

/// Trait for sinks that receive run events.
pub trait EventSink: Send + Sync {
    /// Delivers an event. Must not panic; errors are the sink's problem.
    fn emit(&self, event: &RunEvent);
}

/// A no-op sink that discards all events.
///
/// Used as the default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn emit(&self, _event: &RunEvent) {
        // Intentionally empty - discards all events
    }
}

/// A sink that logs events through the tracing framework.
///
/// Halts and cell failures log at warn level, everything else at info.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &RunEvent) {
        match event {
            RunEvent::RunStarted { path, cell_count } => {
                info!(path = %path.display(), cell_count, "run started");
            }
            RunEvent::CellStarted { index } => {
                info!(index, "cell started");
            }
            RunEvent::CellCompleted { index, duration_ms } => {
                info!(index, duration_ms, "cell completed");
            }
            RunEvent::CellFailed { index, message } => {
                warn!(index, message = %message, "cell failed");
            }
            RunEvent::RunHalted { index, reason } => {
                warn!(index, reason = %reason, "run halted");
            }
            RunEvent::RunCompleted { executed } => {
                info!(executed, "run completed");
            }
            RunEvent::NotebookSaved { path } => {
                info!(path = %path.display(), "notebook saved");
            }
        }
    }
}

/// A collecting sink for test assertions.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<RunEvent>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.read().clone()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Returns the indices of cells that started executing, in order.
    #[must_use]
    pub fn started_cells(&self) -> Vec<usize> {
        self.events
            .read()
            .iter()
            .filter_map(|e| match e {
                RunEvent::CellStarted { index } => Some(*index),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for CollectingEventSink {
    fn emit(&self, event: &RunEvent) {
        self.events.write().push(event.clone());
    }
}
