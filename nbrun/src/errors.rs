//! Error types for notebook runs.
//!
//! Every variant here is a genuine failure that propagates to the caller.
//! The cooperative halt signal is deliberately not among them: a stop tag
//! is represented by [`crate::hooks::Halt`] and always absorbed inside
//! [`Runner::run`], so it can never be mistaken for a failure.
//!
//! [`Runner::run`]: crate::runner::Runner::run

use crate::engine::CellExecutionError;
use thiserror::Error;

/// The main error type for nbrun operations.
#[derive(Debug, Error)]
pub enum NbrunError {
    /// A cell's content failed to execute (engine-intrinsic failure).
    #[error("{0}")]
    Execution(#[from] CellExecutionError),

    /// The notebook path could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The notebook resource could not be parsed or serialized.
    #[error("Notebook format error: {0}")]
    Format(#[from] serde_json::Error),

    /// A settings file could not be parsed.
    #[error("Settings error: {0}")]
    Settings(#[from] serde_yaml::Error),
}
