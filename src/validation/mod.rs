//! Validation functionality
//!
//! Provides validation logic for:
//! - Identifier sanitization (every diagram name that reaches DDL)
//! - Table validation (naming collisions, names PostgreSQL rejects unquoted)
//! - Relationship validation (orphaned edges, self-references, inheritance cycles)

pub mod input;
pub mod relationships;
pub mod tables;

pub use input::{ValidationError, sanitize_identifier, validate_table_name};
pub use relationships::{RelationshipValidationResult, RelationshipValidator};
pub use tables::{TableValidationResult, TableValidator};

use crate::models::Diagram;
use serde::Serialize;

/// Table and relationship findings for one diagram
#[derive(Debug, Default, Serialize)]
#[must_use = "validation reports should be checked"]
pub struct DiagramValidationReport {
    pub tables: TableValidationResult,
    pub relationships: RelationshipValidationResult,
}

impl DiagramValidationReport {
    /// No collisions, invalid table names, orphans or inheritance cycles
    pub fn is_clean(&self) -> bool {
        self.tables.is_clean() && self.relationships.is_clean()
    }
}

/// Run both validators over a diagram
pub fn validate_diagram(diagram: &Diagram) -> DiagramValidationReport {
    DiagramValidationReport {
        tables: TableValidator::new().validate(diagram),
        relationships: RelationshipValidator::new().validate(diagram),
    }
}
