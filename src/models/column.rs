//! Column model for the SDK

use super::enums::ColumnType;
use serde::{Deserialize, Serialize};

/// Column model representing a field in a generated table
///
/// # Example
///
/// ```rust
/// use uml_schema_sdk::models::{Column, ColumnType};
///
/// let column = Column::new("age", ColumnType::Integer);
/// assert!(column.nullable);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    /// Column name (already sanitized)
    pub name: String,
    /// PostgreSQL column type
    pub column_type: ColumnType,
    /// Whether the column allows NULL values (default: true)
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Whether this column alone is the primary key (default: false)
    #[serde(default)]
    pub primary_key: bool,
    /// Literal SQL default expression, e.g. `'student'`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            primary_key: false,
            default_value: None,
        }
    }

    /// Surrogate key column: `id BIGSERIAL PRIMARY KEY`
    pub fn surrogate_key() -> Self {
        Self {
            nullable: false,
            primary_key: true,
            ..Self::new("id", ColumnType::BigSerial)
        }
    }

    /// Reference column holding another table's surrogate key
    pub fn reference(name: impl Into<String>, nullable: bool) -> Self {
        Self {
            nullable,
            ..Self::new(name, ColumnType::BigInt)
        }
    }

    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default_value = Some(literal.into());
        self
    }

    /// Render the column definition as it appears inside `CREATE TABLE` or `ADD COLUMN`
    pub fn definition(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.column_type);
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default_value {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions() {
        assert_eq!(Column::surrogate_key().definition(), "id BIGSERIAL PRIMARY KEY");
        assert_eq!(Column::reference("a_id", false).definition(), "a_id BIGINT NOT NULL");
        assert_eq!(
            Column::new("tipo_student", ColumnType::Varchar(50))
                .with_default("'student'")
                .definition(),
            "tipo_student VARCHAR(50) DEFAULT 'student'"
        );
    }
}
