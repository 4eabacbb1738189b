//! Table validation functionality
//!
//! Validates the table names a diagram will produce: two classes whose names sanitize
//! to the same identifier, and names PostgreSQL cannot take unquoted.

use super::input::{ValidationError, sanitize_identifier, validate_table_name};
use crate::models::Diagram;
use crate::models::table::truncate_identifier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of table validation.
#[derive(Debug, Default, Serialize)]
#[must_use = "validation results should be checked for conflicts and invalid names"]
pub struct TableValidationResult {
    /// Naming conflicts found
    pub naming_conflicts: Vec<NamingConflict>,
    /// Table names PostgreSQL would reject unquoted
    pub invalid_names: Vec<InvalidTableName>,
}

impl TableValidationResult {
    pub fn is_clean(&self) -> bool {
        self.naming_conflicts.is_empty() && self.invalid_names.is_empty()
    }
}

/// Two classes mapping to the same table name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamingConflict {
    pub table_name: String,
    /// Class id that claimed the name first, in element order
    pub existing_class_id: String,
    pub existing_class_name: String,
    pub new_class_id: String,
    pub new_class_name: String,
}

/// Table name failing identifier validation
#[derive(Debug, Clone, Serialize)]
pub struct InvalidTableName {
    pub class_id: String,
    pub table_name: String,
    pub error: ValidationError,
}

/// Table validator
#[derive(Default)]
pub struct TableValidator;

impl TableValidator {
    /// Create a new table validator
    ///
    /// # Example
    ///
    /// ```rust
    /// use uml_schema_sdk::validation::tables::TableValidator;
    ///
    /// let validator = TableValidator::new();
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Validate every table name the diagram's classes sanitize to
    pub fn validate(&self, diagram: &Diagram) -> TableValidationResult {
        TableValidationResult {
            naming_conflicts: self.detect_naming_conflicts(diagram),
            invalid_names: self.detect_invalid_names(diagram),
        }
    }

    /// Detect classes whose sanitized names collide
    ///
    /// Each later class is reported against the first class that claimed the name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use uml_schema_sdk::models::{ClassNode, Diagram};
    /// use uml_schema_sdk::validation::tables::TableValidator;
    ///
    /// let diagram = Diagram::new(
    ///     vec![ClassNode::new("1", "Order Line"), ClassNode::new("2", "order_line")],
    ///     vec![],
    /// );
    /// let conflicts = TableValidator::new().detect_naming_conflicts(&diagram);
    /// assert_eq!(conflicts.len(), 1);
    /// assert_eq!(conflicts[0].table_name, "order_line");
    /// ```
    pub fn detect_naming_conflicts(&self, diagram: &Diagram) -> Vec<NamingConflict> {
        let mut first_owner: HashMap<String, usize> = HashMap::new();
        let mut conflicts = Vec::new();

        for (index, class) in diagram.classes.iter().enumerate() {
            let table_name = truncate_identifier(&sanitize_identifier(&class.name));
            match first_owner.get(&table_name) {
                Some(&owner) => {
                    let existing = &diagram.classes[owner];
                    conflicts.push(NamingConflict {
                        table_name,
                        existing_class_id: existing.id.clone(),
                        existing_class_name: existing.name.clone(),
                        new_class_id: class.id.clone(),
                        new_class_name: class.name.clone(),
                    });
                }
                None => {
                    first_owner.insert(table_name, index);
                }
            }
        }

        conflicts
    }

    /// Detect table names PostgreSQL would reject unquoted
    pub fn detect_invalid_names(&self, diagram: &Diagram) -> Vec<InvalidTableName> {
        diagram
            .classes
            .iter()
            .filter_map(|class| {
                let table_name = sanitize_identifier(&class.name);
                validate_table_name(&table_name)
                    .err()
                    .map(|error| InvalidTableName {
                        class_id: class.id.clone(),
                        table_name,
                        error,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassNode;

    #[test]
    fn distinct_names_are_clean() {
        let diagram = Diagram::new(
            vec![ClassNode::new("1", "Person"), ClassNode::new("2", "Address")],
            vec![],
        );
        assert!(TableValidator::new().validate(&diagram).is_clean());
    }

    #[test]
    fn third_collision_reports_against_first_owner() {
        let diagram = Diagram::new(
            vec![
                ClassNode::new("1", "Item"),
                ClassNode::new("2", "item"),
                ClassNode::new("3", " ITEM! "),
            ],
            vec![],
        );
        let conflicts = TableValidator::new().detect_naming_conflicts(&diagram);
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.iter().all(|c| c.existing_class_id == "1"));
        assert_eq!(conflicts[1].new_class_id, "3");
    }

    #[test]
    fn names_sharing_a_truncated_prefix_collide() {
        let stem = "a".repeat(63);
        let diagram = Diagram::new(
            vec![
                ClassNode::new("1", format!("{}first", stem)),
                ClassNode::new("2", format!("{}second", stem)),
            ],
            vec![],
        );
        let conflicts = TableValidator::new().detect_naming_conflicts(&diagram);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].table_name, stem);
        assert_eq!(conflicts[0].new_class_id, "2");
    }

    #[test]
    fn reserved_names_are_reported() {
        let diagram = Diagram::new(vec![ClassNode::new("1", "User")], vec![]);
        let result = TableValidator::new().validate(&diagram);
        assert_eq!(result.invalid_names.len(), 1);
        assert_eq!(result.invalid_names[0].table_name, "user");
    }
}
