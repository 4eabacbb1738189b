//! Table model for the SDK
//!
//! Tables, foreign keys and indexes as the schema generator emits them. Rendering
//! to PostgreSQL lives in [`crate::export::sql::ddl`]; these types only carry structure.

use super::column::Column;
use super::enums::OnDelete;
use serde::{Deserialize, Serialize};

/// PostgreSQL truncates identifiers longer than this many bytes
pub const MAX_IDENTIFIER_BYTES: usize = 63;

/// Foreign key constraint from `table.column` to `referenced_table(id)`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForeignKey {
    /// Constraint name, deterministic from table, column and referenced table
    pub name: String,
    /// Table owning the constraint
    pub table: String,
    /// Referencing column
    pub column: String,
    /// Referenced table (always referenced through its `id` column)
    pub referenced_table: String,
    pub on_delete: OnDelete,
}

impl ForeignKey {
    /// Foreign key named `fk_<table>_<referenced_table>`
    pub fn new(
        table: impl Into<String>,
        column: impl Into<String>,
        referenced_table: impl Into<String>,
        on_delete: OnDelete,
    ) -> Self {
        let table = table.into();
        let referenced_table = referenced_table.into();
        Self {
            name: constraint_name(&["fk", &table, &referenced_table]),
            table,
            column: column.into(),
            referenced_table,
            on_delete,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = truncate_identifier(&name.into());
        self
    }
}

/// Named `CHECK` constraint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckConstraint {
    pub name: String,
    pub expression: String,
}

/// Single-column index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Index {
    pub name: String,
    pub table: String,
    pub column: String,
}

impl Index {
    pub fn new(name: &str, table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            name: truncate_identifier(name),
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Table model: a class table or a synthesized join table
///
/// # Example
///
/// ```rust
/// use uml_schema_sdk::models::{Column, ColumnType, Table};
///
/// let table = Table::new("person", vec![Column::surrogate_key(), Column::new("age", ColumnType::Integer)]);
/// assert_eq!(table.columns.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    /// Table-level primary key; `None` when a column carries `primary_key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_key: Option<Vec<String>>,
    /// `UNIQUE (...)` column groups
    #[serde(default)]
    pub unique_keys: Vec<Vec<String>>,
    /// Foreign keys declared inline in the `CREATE TABLE`
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    #[serde(default)]
    pub checks: Vec<CheckConstraint>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            composite_key: None,
            unique_keys: Vec::new(),
            foreign_keys: Vec::new(),
            checks: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Join parts with `_` and cap the result at PostgreSQL's identifier length
pub fn constraint_name(parts: &[&str]) -> String {
    truncate_identifier(&parts.join("_"))
}

/// Cut an identifier to [`MAX_IDENTIFIER_BYTES`] on a char boundary
pub fn truncate_identifier(name: &str) -> String {
    if name.len() <= MAX_IDENTIFIER_BYTES {
        return name.to_string();
    }
    let mut end = MAX_IDENTIFIER_BYTES;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

/// `<base><suffix>` within [`MAX_IDENTIFIER_BYTES`], shortening `base` so the suffix survives
pub fn suffixed_identifier(base: &str, suffix: &str) -> String {
    let mut end = MAX_IDENTIFIER_BYTES.saturating_sub(suffix.len()).min(base.len());
    while !base.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &base[..end], suffix)
}
