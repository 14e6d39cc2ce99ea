//! Notebook document model and persistence.
//!
//! A [`Notebook`] is an ordered sequence of [`Cell`]s plus document metadata.
//! Cell order is stable and defines execution order. The notebook is the
//! sole unit of persistence: it is read whole and written whole, never
//! partially. Fields the runner does not interpret are carried through
//! untouched so a read/write cycle is lossless.

mod cell;

pub use cell::{Cell, CellMetadata, CellType, SourceText};

use crate::errors::NbrunError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

fn default_nbformat() -> u32 {
    4
}

fn default_nbformat_minor() -> u32 {
    5
}

/// A structured notebook document: ordered cells plus resource metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    /// The cells in document (and execution) order.
    #[serde(default)]
    pub cells: Vec<Cell>,

    /// Document-level metadata (kernel spec, language info, ...). Opaque
    /// to the runner.
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Major on-disk format version.
    #[serde(default = "default_nbformat")]
    pub nbformat: u32,

    /// Minor on-disk format version.
    #[serde(default = "default_nbformat_minor")]
    pub nbformat_minor: u32,

    /// Unrecognized top-level fields, preserved for lossless persistence.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Notebook {
    /// Creates a notebook from a list of cells.
    #[must_use]
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: Map::new(),
            nbformat: default_nbformat(),
            nbformat_minor: default_nbformat_minor(),
            extra: Map::new(),
        }
    }

    /// Loads a notebook from a file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, NbrunError> {
        let raw = fs::read_to_string(path)?;
        let notebook = serde_json::from_str(&raw)?;
        Ok(notebook)
    }

    /// Writes the notebook to a file, overwriting any existing content.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), NbrunError> {
        let mut raw = serde_json::to_string_pretty(self)?;
        raw.push('\n');
        fs::write(path, raw)?;
        Ok(())
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the notebook has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the number of code cells.
    #[must_use]
    pub fn code_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_code()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_notebook_defaults() {
        let nb = Notebook::default();
        assert!(nb.is_empty());
        assert_eq!(nb.nbformat, 4);
        assert_eq!(nb.nbformat_minor, 5);
    }

    #[test]
    fn test_code_cell_count() {
        let nb = Notebook::new(vec![
            Cell::markdown("# Intro"),
            Cell::code("x = 1"),
            Cell::code("print(x)"),
        ]);
        assert_eq!(nb.len(), 3);
        assert_eq!(nb.code_cell_count(), 2);
    }

    #[test]
    fn test_read_write_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nb.ipynb");

        let nb = Notebook::new(vec![
            Cell::code("print('a')"),
            Cell::code("print('b')").with_tag("stop_here"),
        ]);
        nb.write(&path).unwrap();

        let loaded = Notebook::read(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.cells[1].has_tag("stop_here"));
    }

    #[test]
    fn test_read_preserves_unknown_document_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nb.ipynb");

        let raw = r#"{
            "cells": [],
            "metadata": {"kernelspec": {"name": "python3"}},
            "nbformat": 4,
            "nbformat_minor": 5,
            "vendor_extension": {"key": 7}
        }"#;
        std::fs::write(&path, raw).unwrap();

        let nb = Notebook::read(&path).unwrap();
        assert!(nb.extra.contains_key("vendor_extension"));

        nb.write(&path).unwrap();
        let reloaded = Notebook::read(&path).unwrap();
        assert_eq!(
            reloaded.extra.get("vendor_extension"),
            nb.extra.get("vendor_extension")
        );
        assert!(reloaded.metadata.contains_key("kernelspec"));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let err = Notebook::read("/definitely/not/here.ipynb").unwrap_err();
        assert!(matches!(err, crate::errors::NbrunError::Io(_)));
    }

    #[test]
    fn test_read_malformed_file_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ipynb");
        std::fs::write(&path, "not json").unwrap();

        let err = Notebook::read(&path).unwrap_err();
        assert!(matches!(err, crate::errors::NbrunError::Format(_)));
    }
}
