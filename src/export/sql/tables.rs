//! Class tables
//!
//! Resolves the table name of every class and emits one `CREATE TABLE` per class
//! that is not a join intermediary.

use super::attributes::parse_attribute;
use super::classifier::Classification;
use super::ddl::DdlStatement;
use crate::models::table::{suffixed_identifier, truncate_identifier};
use crate::models::{ClassNode, CollisionPolicy, Column, ColumnType, Diagram, Table};
use crate::validation::input::sanitize_identifier;
use crate::validation::tables::TableValidator;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Column every table gets when its class declares no attributes
pub const FALLBACK_COLUMN: &str = "data";

/// Table name per class id
#[derive(Debug, Clone, Default)]
pub struct TableNames {
    by_id: HashMap<String, String>,
    warnings: Vec<String>,
}

impl TableNames {
    /// Sanitize every class name. Colliding names are kept and reported under
    /// [`CollisionPolicy::Warn`], or renamed `<name>_2`, `<name>_3`, ... in element
    /// order under [`CollisionPolicy::Suffix`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use uml_schema_sdk::export::sql::tables::TableNames;
    /// use uml_schema_sdk::models::{ClassNode, CollisionPolicy, Diagram};
    ///
    /// let diagram = Diagram::new(
    ///     vec![ClassNode::new("1", "Item"), ClassNode::new("2", "item")],
    ///     vec![],
    /// );
    /// let names = TableNames::resolve(&diagram, CollisionPolicy::Suffix);
    /// assert_eq!(names.get("1"), Some("item"));
    /// assert_eq!(names.get("2"), Some("item_2"));
    /// ```
    pub fn resolve(diagram: &Diagram, policy: CollisionPolicy) -> Self {
        let mut names = TableNames::default();

        for conflict in TableValidator::new().detect_naming_conflicts(diagram) {
            let message = match policy {
                CollisionPolicy::Warn => format!(
                    "Classes '{}' ({}) and '{}' ({}) both map to table '{}'",
                    conflict.existing_class_name,
                    conflict.existing_class_id,
                    conflict.new_class_name,
                    conflict.new_class_id,
                    conflict.table_name
                ),
                CollisionPolicy::Suffix => format!(
                    "Class '{}' ({}) collides with '{}' ({}) on table '{}' and was renamed",
                    conflict.new_class_name,
                    conflict.new_class_id,
                    conflict.existing_class_name,
                    conflict.existing_class_id,
                    conflict.table_name
                ),
            };
            warn!("{}", message);
            names.warnings.push(message);
        }

        let mut taken: HashSet<String> = HashSet::new();
        for class in &diagram.classes {
            if names.by_id.contains_key(&class.id) {
                continue;
            }
            let base = truncate_identifier(&sanitize_identifier(&class.name));
            let name = match policy {
                CollisionPolicy::Warn => base,
                CollisionPolicy::Suffix => unique_name(&base, &taken),
            };
            taken.insert(name.clone());
            names.by_id.insert(class.id.clone(), name);
        }

        names
    }

    pub fn get(&self, class_id: &str) -> Option<&str> {
        self.by_id.get(class_id).map(String::as_str)
    }

    /// Collision messages produced while resolving
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

fn unique_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| suffixed_identifier(base, &format!("_{}", n)))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Build the table for one class: surrogate `id` first, then one column per
/// attribute in declaration order. An attribute named `id` becomes `attr_id`; a class
/// without attributes gets a single `data jsonb` column.
pub fn class_table(class: &ClassNode, table_name: &str) -> Table {
    let mut columns = vec![Column::surrogate_key()];

    if class.attributes.is_empty() {
        columns.push(Column::new(FALLBACK_COLUMN, ColumnType::Jsonb));
    } else {
        columns.extend(class.attributes.iter().map(|raw| {
            let parsed = parse_attribute(raw);
            let name = if parsed.name == "id" {
                "attr_id".to_string()
            } else {
                parsed.name
            };
            Column::new(name, parsed.column_type)
        }));
    }

    Table::new(table_name, columns)
}

/// One statement block per class table, in class order
pub fn emit_tables(
    diagram: &Diagram,
    names: &TableNames,
    classification: &Classification,
) -> Vec<Vec<DdlStatement>> {
    let mut emitted: HashSet<&str> = HashSet::new();

    diagram
        .classes
        .iter()
        .filter(|class| !classification.is_intermediary(&class.id))
        .filter(|class| emitted.insert(class.id.as_str()))
        .filter_map(|class| {
            let table_name = names.get(&class.id)?;
            Some(vec![
                DdlStatement::comment(format!("Table for class {}", table_name)),
                DdlStatement::CreateTable {
                    table: class_table(class, table_name),
                },
            ])
        })
        .collect()
}
