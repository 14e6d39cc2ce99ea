//! Test support: scripted engines and notebook fixtures.
//!
//! Everything here is deterministic and filesystem-light so runner behavior
//! can be asserted without a real kernel.

pub mod fixtures;
pub mod mocks;

pub use fixtures::write_notebook;
pub use mocks::{FailingEngine, RecordingEngine, TaggingEngine};
