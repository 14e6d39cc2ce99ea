//! Notebook fixtures for tests.

use crate::notebook::{Cell, Notebook};
use std::path::{Path, PathBuf};

/// Writes a notebook with the given cells into `dir` and returns its path.
///
/// # Panics
///
/// Panics if the notebook cannot be written; fixtures are for tests only.
#[must_use]
pub fn write_notebook(dir: &Path, cells: Vec<Cell>) -> PathBuf {
    let path = dir.join("notebook.ipynb");
    Notebook::new(cells)
        .write(&path)
        .expect("fixture notebook should be writable");
    path
}
