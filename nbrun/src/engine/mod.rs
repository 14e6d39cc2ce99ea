//! The cell execution seam.
//!
//! The runner drives cells in order but never interprets their content:
//! "how a cell runs" belongs to a [`CellEngine`] implementation. The engine
//! populates the cell's output slot and execution count as a side effect and
//! reports intrinsic failures through [`CellExecutionError`]. Scripted
//! engines for tests live in [`crate::testing`].

use crate::notebook::Cell;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

fn default_kernel() -> String {
    "python3".to_string()
}

/// Resources handed to the engine for the duration of one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Working directory for cell execution.
    pub workdir: PathBuf,

    /// Name of the kernel/runtime that executes cell content.
    pub kernel_name: String,

    /// Per-cell execution allowance. `None` means unbounded: the runner
    /// never times a cell out.
    pub timeout: Option<Duration>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("./"),
            kernel_name: default_kernel(),
            timeout: None,
        }
    }
}

impl RunContext {
    /// Creates a context with default resources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the working directory.
    #[must_use]
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = workdir.into();
        self
    }

    /// Sets the kernel name.
    #[must_use]
    pub fn with_kernel(mut self, kernel_name: impl Into<String>) -> Self {
        self.kernel_name = kernel_name.into();
        self
    }

    /// Sets a per-cell execution allowance.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Raised by the engine when a cell's content fails to run correctly.
#[derive(Debug, Clone, Error)]
#[error("Cell execution failed at cell {cell_index}: {message}")]
pub struct CellExecutionError {
    /// Index of the failing cell.
    pub cell_index: usize,
    /// What went wrong.
    pub message: String,
    /// Engine-captured traceback lines, if any.
    pub traceback: Vec<String>,
}

impl CellExecutionError {
    /// Creates a new cell execution error.
    #[must_use]
    pub fn new(cell_index: usize, message: impl Into<String>) -> Self {
        Self {
            cell_index,
            message: message.into(),
            traceback: Vec::new(),
        }
    }

    /// Attaches traceback lines.
    #[must_use]
    pub fn with_traceback(mut self, traceback: Vec<String>) -> Self {
        self.traceback = traceback;
        self
    }
}

/// Trait for cell execution engines.
///
/// Implementations run one cell's content and record the result into the
/// cell's output slot. The runner guarantees cells are offered strictly one
/// at a time, in document order.
#[async_trait]
pub trait CellEngine: Send + Sync {
    /// Executes one cell's content.
    ///
    /// # Arguments
    ///
    /// * `cell` - The cell to run; outputs and execution count are written
    ///   back into it
    /// * `index` - The cell's position in the notebook
    /// * `ctx` - Run-wide resources
    async fn execute_cell(
        &self,
        cell: &mut Cell,
        index: usize,
        ctx: &RunContext,
    ) -> Result<(), CellExecutionError>;
}
