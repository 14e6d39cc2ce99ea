//! Cell types: source content, tag metadata, and output slots.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The kind of content a cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    /// Executable source handed to the engine.
    Code,
    /// Prose; never offered to the engine.
    Markdown,
    /// Unrendered content; never offered to the engine.
    Raw,
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code => write!(f, "code"),
            Self::Markdown => write!(f, "markdown"),
            Self::Raw => write!(f, "raw"),
        }
    }
}

/// Cell source as stored on disk: either a single string or a list of lines.
///
/// Both encodings are accepted on read; whichever was present is preserved
/// on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceText {
    /// The whole source as one string.
    Text(String),
    /// The source split into lines (each usually newline-terminated).
    Lines(Vec<String>),
}

impl SourceText {
    /// Returns the source joined into a single string.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Lines(lines) => lines.concat(),
        }
    }

    /// Returns true if the source contains no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Lines(lines) => lines.iter().all(String::is_empty),
        }
    }
}

impl Default for SourceText {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for SourceText {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SourceText {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Per-cell metadata. Only the tag list is interpreted; everything else is
/// carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CellMetadata {
    /// Free-form tags attached to the cell.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Unrecognized metadata fields, preserved for lossless persistence.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One element of a notebook's cell sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// What kind of cell this is.
    pub cell_type: CellType,

    /// The cell's source content.
    #[serde(default)]
    pub source: SourceText,

    /// Tag set and other per-cell metadata.
    #[serde(default)]
    pub metadata: CellMetadata,

    /// The engine-assigned execution counter, if the cell has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_count: Option<i64>,

    /// Captured execution output. Opaque to the runner; the engine owns
    /// the shape of each entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<Value>,

    /// Unrecognized cell fields, preserved for lossless persistence.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// Creates a code cell with the given source and no outputs.
    #[must_use]
    pub fn code(source: impl Into<SourceText>) -> Self {
        Self {
            cell_type: CellType::Code,
            source: source.into(),
            metadata: CellMetadata::default(),
            execution_count: None,
            outputs: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Creates a markdown cell with the given source.
    #[must_use]
    pub fn markdown(source: impl Into<SourceText>) -> Self {
        Self {
            cell_type: CellType::Markdown,
            source: source.into(),
            metadata: CellMetadata::default(),
            execution_count: None,
            outputs: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Adds a tag to the cell's tag set.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.metadata.tags.push(tag.into());
        self
    }

    /// Returns true if the cell's tag set contains `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata.tags.iter().any(|t| t == tag)
    }

    /// Returns true if this cell is executable.
    #[must_use]
    pub fn is_code(&self) -> bool {
        self.cell_type == CellType::Code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_text_both_encodings() {
        let text: SourceText = serde_json::from_str(r#""print('a')""#).unwrap();
        assert_eq!(text.as_text(), "print('a')");

        let lines: SourceText = serde_json::from_str(r#"["x = 1\n", "x"]"#).unwrap();
        assert_eq!(lines.as_text(), "x = 1\nx");
    }

    #[test]
    fn test_source_text_encoding_preserved_on_write() {
        let lines = SourceText::Lines(vec!["a\n".to_string(), "b".to_string()]);
        let json = serde_json::to_string(&lines).unwrap();
        assert_eq!(json, r#"["a\n","b"]"#);
    }

    #[test]
    fn test_cell_tags() {
        let cell = Cell::code("pass").with_tag("stop_here");
        assert!(cell.has_tag("stop_here"));
        assert!(!cell.has_tag("other"));
    }

    #[test]
    fn test_cell_is_code() {
        assert!(Cell::code("x = 1").is_code());
        assert!(!Cell::markdown("# Title").is_code());
    }

    #[test]
    fn test_cell_roundtrip_preserves_unknown_fields() {
        let json = r#"{
            "cell_type": "code",
            "source": "1 + 1",
            "metadata": {"tags": ["keep"], "collapsed": true},
            "id": "abc123"
        }"#;

        let cell: Cell = serde_json::from_str(json).unwrap();
        assert!(cell.has_tag("keep"));
        assert_eq!(cell.metadata.extra.get("collapsed"), Some(&Value::Bool(true)));
        assert_eq!(cell.extra.get("id"), Some(&Value::String("abc123".to_string())));

        let out = serde_json::to_value(&cell).unwrap();
        assert_eq!(out.get("id"), Some(&Value::String("abc123".to_string())));
    }

    #[test]
    fn test_markdown_cell_serializes_without_output_slots() {
        let cell = Cell::markdown("# Title");
        let out = serde_json::to_value(&cell).unwrap();
        assert!(out.get("outputs").is_none());
        assert!(out.get("execution_count").is_none());
    }
}
