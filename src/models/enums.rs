//! Enums for diagram and schema modelling
//!
//! # Serde Casing Conventions
//!
//! - `PascalCase`: relationship kinds, matching the element tags the diagram editor emits
//! - `lowercase`: column types and policies, matching how they appear in DDL and config files

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a relationship edge between two class nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum RelationshipKind {
    Association,
    Composition,
    Aggregation,
    Generalization,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationshipKind::Association => "Association",
            RelationshipKind::Composition => "Composition",
            RelationshipKind::Aggregation => "Aggregation",
            RelationshipKind::Generalization => "Generalization",
        };
        f.write_str(name)
    }
}

/// Normalized multiplicity at one end of a relationship
///
/// Diagram multiplicities are free text. They are reduced to this closed set once,
/// at ingestion, so the rule engine never matches raw strings:
/// - `One`: exactly `"1"`
/// - `Many`: any token containing `*` (`*`, `0..*`, `1..*`)
/// - `Unspecified`: empty or missing
/// - `Other`: anything else (`0..1`, `2`, ...), kept verbatim for comments
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Multiplicity {
    One,
    Many,
    #[default]
    Unspecified,
    Other(String),
}

impl Multiplicity {
    /// Normalize a raw multiplicity token
    pub fn parse(raw: &str) -> Self {
        let token = raw.trim();
        if token.is_empty() {
            Multiplicity::Unspecified
        } else if token == "1" {
            Multiplicity::One
        } else if token.contains('*') {
            Multiplicity::Many
        } else {
            Multiplicity::Other(token.to_string())
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Multiplicity::One)
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Multiplicity::Many)
    }

    pub fn is_many_or_unspecified(&self) -> bool {
        matches!(self, Multiplicity::Many | Multiplicity::Unspecified)
    }
}

impl From<&str> for Multiplicity {
    fn from(raw: &str) -> Self {
        Multiplicity::parse(raw)
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Multiplicity::One => f.write_str("1"),
            Multiplicity::Many => f.write_str("*"),
            Multiplicity::Unspecified => f.write_str("?"),
            Multiplicity::Other(token) => f.write_str(token),
        }
    }
}

/// PostgreSQL column type emitted for a column
///
/// The first five variants are the canonical attribute types produced by the
/// type mapper. The rest are used for keys and generated support columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Numeric,
    Boolean,
    Timestamp,
    Text,
    BigInt,
    BigSerial,
    Jsonb,
    Varchar(u16),
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => f.write_str("integer"),
            ColumnType::Numeric => f.write_str("numeric"),
            ColumnType::Boolean => f.write_str("boolean"),
            ColumnType::Timestamp => f.write_str("timestamp"),
            ColumnType::Text => f.write_str("text"),
            ColumnType::BigInt => f.write_str("BIGINT"),
            ColumnType::BigSerial => f.write_str("BIGSERIAL"),
            ColumnType::Jsonb => f.write_str("jsonb"),
            ColumnType::Varchar(len) => write!(f, "VARCHAR({})", len),
        }
    }
}

/// Referential action applied when the referenced row is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnDelete {
    Cascade,
    SetNull,
}

impl fmt::Display for OnDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnDelete::Cascade => f.write_str("CASCADE"),
            OnDelete::SetNull => f.write_str("SET NULL"),
        }
    }
}

/// How to handle two classes whose names sanitize to the same table name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Keep the colliding name and report a warning
    #[default]
    Warn,
    /// Append `_2`, `_3`, ... to later classes in element order
    Suffix,
}

impl std::str::FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warn" => Ok(CollisionPolicy::Warn),
            "suffix" => Ok(CollisionPolicy::Suffix),
            _ => Err(format!(
                "Unknown collision policy: {}. Use 'warn' or 'suffix'.",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplicity_tokens_normalize() {
        assert_eq!(Multiplicity::parse("1"), Multiplicity::One);
        assert_eq!(Multiplicity::parse(" 1 "), Multiplicity::One);
        assert_eq!(Multiplicity::parse("*"), Multiplicity::Many);
        assert_eq!(Multiplicity::parse("1..*"), Multiplicity::Many);
        assert_eq!(Multiplicity::parse(""), Multiplicity::Unspecified);
        assert_eq!(
            Multiplicity::parse("0..1"),
            Multiplicity::Other("0..1".to_string())
        );
        assert!(Multiplicity::parse("  ").is_many_or_unspecified());
        assert!(!Multiplicity::parse("0..1").is_many_or_unspecified());
    }

    #[test]
    fn column_types_render_like_postgres() {
        assert_eq!(ColumnType::BigSerial.to_string(), "BIGSERIAL");
        assert_eq!(ColumnType::Varchar(50).to_string(), "VARCHAR(50)");
        assert_eq!(ColumnType::Timestamp.to_string(), "timestamp");
        assert_eq!(OnDelete::SetNull.to_string(), "SET NULL");
    }

    #[test]
    fn collision_policy_from_str() {
        assert_eq!("Suffix".parse::<CollisionPolicy>(), Ok(CollisionPolicy::Suffix));
        assert!("rename".parse::<CollisionPolicy>().is_err());
    }
}
