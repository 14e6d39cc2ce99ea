//! Pre-dispatch hooks for cell execution.
//!
//! Hooks are consulted strictly before a cell is handed to the engine. A
//! hook that returns a [`Halt`] short-circuits the run at that cell: the
//! cell never executes and neither does anything after it. This is the seam
//! the stop-tag mechanism lives behind.

use crate::notebook::Cell;
use async_trait::async_trait;
use std::sync::Arc;

/// The reserved tag that halts a run before the tagged cell executes.
pub const STOP_TAG: &str = "stop_here";

/// A cooperative halt signal raised from the pre-dispatch seam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halt {
    /// Index of the cell that triggered the halt.
    pub cell_index: usize,
    /// Human-readable reason for the halt.
    pub reason: String,
}

impl Halt {
    /// Creates a new halt signal.
    #[must_use]
    pub fn new(cell_index: usize, reason: impl Into<String>) -> Self {
        Self {
            cell_index,
            reason: reason.into(),
        }
    }
}

/// Trait for per-cell pre-dispatch hooks.
#[async_trait]
pub trait CellHook: Send + Sync {
    /// Returns the hook's priority (lower = consulted earlier).
    fn priority(&self) -> i32 {
        0
    }

    /// Called before a cell is dispatched to the engine.
    ///
    /// Return `Some(halt)` to stop the run at this cell.
    /// Return `None` to continue to the next hook, then the engine.
    async fn before_dispatch(&self, cell: &Cell, index: usize) -> Option<Halt>;
}

/// An ordered chain of pre-dispatch hooks.
pub struct HookChain {
    hooks: Vec<Arc<dyn CellHook>>,
}

impl HookChain {
    /// Creates a new empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Adds a hook to the chain.
    pub fn add(&mut self, hook: Arc<dyn CellHook>) {
        self.hooks.push(hook);
        self.hooks.sort_by_key(|h| h.priority());
    }

    /// Consults each hook in priority order.
    ///
    /// Returns the first `Halt` produced, or `None` if every hook passes.
    pub async fn before_dispatch(&self, cell: &Cell, index: usize) -> Option<Halt> {
        for hook in &self.hooks {
            if let Some(halt) = hook.before_dispatch(cell, index).await {
                return Some(halt);
            }
        }
        None
    }

    /// Returns the number of hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl Default for HookChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Halts the run when a cell carries the [`STOP_TAG`].
///
/// The check inspects every cell, not only code cells, so a stop tag on a
/// markdown cell halts the run just the same.
#[derive(Debug, Clone)]
pub struct StopTagHook {
    tag: String,
}

impl StopTagHook {
    /// Creates a hook that checks for a custom tag.
    #[must_use]
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Default for StopTagHook {
    fn default() -> Self {
        Self::with_tag(STOP_TAG)
    }
}

#[async_trait]
impl CellHook for StopTagHook {
    async fn before_dispatch(&self, cell: &Cell, index: usize) -> Option<Halt> {
        if cell.has_tag(&self.tag) {
            Some(Halt::new(
                index,
                format!("'{}' tag found on cell {index}", self.tag),
            ))
        } else {
            None
        }
    }
}
