//! Import functionality
//!
//! Turns what the diagram editor stores (a list of boards, each a list of element
//! records) into a [`Diagram`]. This is the input boundary: shape errors are
//! rejected here, before any schema generation runs.

pub mod diagram;

use crate::models::Diagram;

/// Result of an import operation.
///
/// Contains the decoded diagram and any elements that were skipped.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[must_use = "import results should be processed or warnings checked"]
pub struct ImportResult {
    /// Classes and relationships, in board then element order
    pub diagram: Diagram,
    /// Number of boards that were flattened
    pub board_count: usize,
    /// Elements that could not be decoded and were skipped
    pub warnings: Vec<ImportWarning>,
}

/// Element skipped during import
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct ImportWarning {
    pub board_index: usize,
    pub element_index: usize,
    pub message: String,
}

impl std::fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "board {} element {}: {}",
            self.board_index, self.element_index, self.message
        )
    }
}

/// Error during import
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize, PartialEq)]
pub enum ImportError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid input shape: {0}")]
    InvalidShape(String),
    #[error("IO error: {0}")]
    IoError(String),
}

pub use diagram::DiagramImporter;
