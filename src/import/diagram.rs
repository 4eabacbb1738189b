//! Diagram import
//!
//! Accepted documents (JSON or YAML):
//! - a bare list of boards: `[[element, ...], [element, ...]]`
//! - an object carrying the boards under `elementsByBoard` (or `elementosPorPizarra`,
//!   the field name the diagram editor uses when it posts a project)
//!
//! Elements are tagged by `type`; the editor's `tipo` key is accepted as well.

use super::{ImportError, ImportResult, ImportWarning};
use crate::models::{Diagram, DiagramElement};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Object keys that may carry the list of boards
const BOARD_KEYS: &[&str] = &["elementsByBoard", "elementosPorPizarra"];

/// Importer for diagram element documents
#[derive(Debug, Default)]
pub struct DiagramImporter;

impl DiagramImporter {
    pub fn new() -> Self {
        Self
    }

    /// Import a JSON document
    ///
    /// # Example
    ///
    /// ```rust
    /// use uml_schema_sdk::import::DiagramImporter;
    ///
    /// let json = r#"[[{"type": "Class", "id": "1", "name": "Person", "attributes": ["+ age: int"]}]]"#;
    /// let result = DiagramImporter::new().import_json(json).unwrap();
    /// assert_eq!(result.diagram.classes.len(), 1);
    /// ```
    pub fn import_json(&self, content: &str) -> Result<ImportResult, ImportError> {
        let document: Value = serde_json::from_str(content)
            .map_err(|e| ImportError::ParseError(format!("Invalid JSON: {}", e)))?;
        self.import_value(document)
    }

    /// Import a YAML document with the same shape as the JSON form
    pub fn import_yaml(&self, content: &str) -> Result<ImportResult, ImportError> {
        let document: Value = serde_yaml::from_str(content)
            .map_err(|e| ImportError::ParseError(format!("Invalid YAML: {}", e)))?;
        self.import_value(document)
    }

    /// Import a file, choosing YAML for `.yaml`/`.yml` extensions and JSON otherwise
    pub fn import_file(&self, path: &Path) -> Result<ImportResult, ImportError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ImportError::IoError(format!("{}: {}", path.display(), e)))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => self.import_yaml(&content),
            _ => self.import_json(&content),
        }
    }

    /// Import an already parsed document
    pub fn import_value(&self, document: Value) -> Result<ImportResult, ImportError> {
        let boards = match document {
            Value::Array(boards) => boards,
            Value::Object(mut object) => {
                let boards = BOARD_KEYS
                    .iter()
                    .find_map(|key| object.remove(*key))
                    .ok_or_else(|| {
                        ImportError::InvalidShape(format!(
                            "expected a list of boards or an object with '{}'",
                            BOARD_KEYS[0]
                        ))
                    })?;
                match boards {
                    Value::Array(boards) => boards,
                    other => {
                        return Err(ImportError::InvalidShape(format!(
                            "'{}' must be a list of boards, got {}",
                            BOARD_KEYS[0],
                            kind_of(&other)
                        )));
                    }
                }
            }
            other => {
                return Err(ImportError::InvalidShape(format!(
                    "expected a list of boards, got {}",
                    kind_of(&other)
                )));
            }
        };

        let board_count = boards.len();
        let mut elements = Vec::new();
        let mut warnings = Vec::new();

        for (board_index, board) in boards.into_iter().enumerate() {
            let board_elements = match board {
                Value::Array(board_elements) => board_elements,
                other => {
                    return Err(ImportError::InvalidShape(format!(
                        "board {} must be a list of elements, got {}",
                        board_index,
                        kind_of(&other)
                    )));
                }
            };

            for (element_index, element) in board_elements.into_iter().enumerate() {
                match decode_element(element) {
                    Ok(element) => elements.push(element),
                    Err(message) => {
                        let warning = ImportWarning {
                            board_index,
                            element_index,
                            message,
                        };
                        warn!("Skipping diagram element: {}", warning);
                        warnings.push(warning);
                    }
                }
            }
        }

        let diagram = Diagram::from_elements(elements);
        info!(
            "Imported {} classes and {} relationships from {} boards",
            diagram.classes.len(),
            diagram.relationships.len(),
            board_count
        );

        Ok(ImportResult {
            diagram,
            board_count,
            warnings,
        })
    }
}

fn decode_element(element: Value) -> Result<DiagramElement, String> {
    let mut object = match element {
        Value::Object(object) => object,
        other => return Err(format!("expected an object, got {}", kind_of(&other))),
    };

    if !object.contains_key("type") {
        match object.remove("tipo") {
            Some(tag) => {
                object.insert("type".to_string(), tag);
            }
            None => return Err("element has no 'type' tag".to_string()),
        }
    }

    serde_json::from_value(Value::Object(object)).map_err(|e| e.to_string())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
