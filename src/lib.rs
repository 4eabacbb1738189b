//! UML Schema SDK - PostgreSQL schema synthesis from class diagrams
//!
//! Provides unified interfaces for:
//! - Diagram import (editor JSON or YAML, one list of elements per board)
//! - Schema generation (idempotent PostgreSQL DDL)
//! - Validation logic (table names, orphaned relationships, inheritance cycles)
//! - The request/response contract shared by the CLI and WASM bindings

pub mod api;
#[cfg(feature = "cli")]
pub mod cli;
pub mod export;
pub mod import;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use api::{ApiResponse, ErrorResponse, GenerateRequest, GenerateResponse};
pub use export::{GenerationResult, GenerationStatistics, GeneratorOptions, SchemaGenerator};
pub use import::{DiagramImporter, ImportError, ImportResult};
pub use validation::{
    RelationshipValidationResult, RelationshipValidator, TableValidationResult, TableValidator,
};

// Re-export models
pub use models::enums::*;
pub use models::{ClassNode, Column, Diagram, DiagramElement, ForeignKey, RelationshipEdge, Table};

// WASM bindings for schema generation
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod wasm {
    use crate::api::{ApiResponse, handle_generate_request};
    use crate::export::sql::SchemaGenerator;
    use crate::import::DiagramImporter;
    use wasm_bindgen::prelude::*;

    fn serialize<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
        serde_json::to_string(value)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Generate a PostgreSQL script from a generation request.
    ///
    /// # Arguments
    ///
    /// * `request_json` - `{"elementsByBoard": [[...], ...]}`
    ///
    /// # Returns
    ///
    /// JSON string with the generation response, or JsValue error carrying the
    /// `{"success": false, "error": ...}` body
    #[wasm_bindgen]
    pub fn generate_sql_from_elements(request_json: &str) -> Result<String, JsValue> {
        match handle_generate_request(request_json, &SchemaGenerator::default()) {
            response @ ApiResponse::Generated(_) => serialize(&response),
            response @ ApiResponse::Failed(_) => Err(JsValue::from_str(&serialize(&response)?)),
        }
    }

    /// Validate a diagram document and return the findings as JSON.
    ///
    /// # Arguments
    ///
    /// * `diagram_json` - list of boards, or an object with `elementsByBoard`
    #[wasm_bindgen]
    pub fn validate_diagram(diagram_json: &str) -> Result<String, JsValue> {
        let imported = DiagramImporter::new()
            .import_json(diagram_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let report = crate::validation::validate_diagram(&imported.diagram);
        serialize(&report)
    }
}
