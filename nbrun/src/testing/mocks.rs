//! Scripted cell engines.

use crate::engine::{CellEngine, CellExecutionError, RunContext};
use crate::notebook::Cell;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

fn stream_output(text: &str) -> serde_json::Value {
    json!({
        "output_type": "stream",
        "name": "stdout",
        "text": text,
    })
}

/// An engine that records which cells it executed and fills their output
/// slots with a stream echo of the source.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    executed: Mutex<Vec<usize>>,
}

impl RecordingEngine {
    /// Creates a new recording engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the indices of executed cells, in execution order.
    #[must_use]
    pub fn executed_indices(&self) -> Vec<usize> {
        self.executed.lock().clone()
    }
}

#[async_trait]
impl CellEngine for RecordingEngine {
    async fn execute_cell(
        &self,
        cell: &mut Cell,
        index: usize,
        _ctx: &RunContext,
    ) -> Result<(), CellExecutionError> {
        let mut executed = self.executed.lock();
        executed.push(index);
        cell.execution_count = Some(executed.len() as i64);
        cell.outputs = vec![stream_output(&cell.source.as_text())];
        Ok(())
    }
}

/// An engine that pushes a tag onto every cell it executes, after filling
/// the output slot. Useful for checking that tags appearing mid-run, once a
/// cell has already been dispatched, do not disturb the walk.
#[derive(Debug)]
pub struct TaggingEngine {
    tag: String,
    executed: Mutex<Vec<usize>>,
}

impl TaggingEngine {
    /// Creates an engine that tags each executed cell with `tag`.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Returns the indices of executed cells, in execution order.
    #[must_use]
    pub fn executed_indices(&self) -> Vec<usize> {
        self.executed.lock().clone()
    }
}

#[async_trait]
impl CellEngine for TaggingEngine {
    async fn execute_cell(
        &self,
        cell: &mut Cell,
        index: usize,
        _ctx: &RunContext,
    ) -> Result<(), CellExecutionError> {
        let mut executed = self.executed.lock();
        executed.push(index);
        cell.execution_count = Some(executed.len() as i64);
        cell.outputs = vec![stream_output(&cell.source.as_text())];
        cell.metadata.tags.push(self.tag.clone());
        Ok(())
    }
}

/// An engine that fails at a fixed cell index and records everything it
/// executed before that.
#[derive(Debug)]
pub struct FailingEngine {
    fail_at: usize,
    message: String,
    executed: Mutex<Vec<usize>>,
}

impl FailingEngine {
    /// Creates an engine that fails when it reaches `fail_at`.
    #[must_use]
    pub fn fail_at(fail_at: usize, message: impl Into<String>) -> Self {
        Self {
            fail_at,
            message: message.into(),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Returns the indices of successfully executed cells.
    #[must_use]
    pub fn executed_indices(&self) -> Vec<usize> {
        self.executed.lock().clone()
    }
}

#[async_trait]
impl CellEngine for FailingEngine {
    async fn execute_cell(
        &self,
        cell: &mut Cell,
        index: usize,
        _ctx: &RunContext,
    ) -> Result<(), CellExecutionError> {
        if index == self.fail_at {
            return Err(CellExecutionError::new(index, self.message.clone()));
        }
        let mut executed = self.executed.lock();
        executed.push(index);
        cell.execution_count = Some(executed.len() as i64);
        cell.outputs = vec![stream_output(&cell.source.as_text())];
        Ok(())
    }
}
