//! Attribute declaration parsing and UML type mapping
//!
//! Attribute strings look like `"+ age: int"`. Types are split on the first `:`, so a
//! type that itself contains a colon keeps everything after the first one and, being
//! an unknown token, maps to `text`.

use crate::models::ColumnType;
use crate::validation::input::sanitize_identifier;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_VISIBILITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+\-#~]\s*").expect("Invalid regex"));

/// Column name and type parsed from one attribute declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAttribute {
    pub name: String,
    pub column_type: ColumnType,
}

/// Parse a raw attribute declaration. Never fails; malformed input degrades to a
/// best-effort name with type `text`.
///
/// # Example
///
/// ```rust
/// use uml_schema_sdk::export::sql::attributes::parse_attribute;
/// use uml_schema_sdk::models::ColumnType;
///
/// let attr = parse_attribute("+ birth date: Date");
/// assert_eq!(attr.name, "birth_date");
/// assert_eq!(attr.column_type, ColumnType::Timestamp);
/// ```
pub fn parse_attribute(raw: &str) -> ParsedAttribute {
    let declaration = RE_VISIBILITY.replace(raw.trim_start(), "");
    let declaration = declaration.trim();

    match declaration.split_once(':') {
        Some((name, type_token)) => ParsedAttribute {
            name: sanitize_identifier(name),
            column_type: map_type(type_token),
        },
        None => ParsedAttribute {
            name: sanitize_identifier(declaration),
            column_type: ColumnType::Text,
        },
    }
}

/// Map a UML-ish type token to a column type, case-insensitively.
///
/// | tokens                               | type        |
/// |--------------------------------------|-------------|
/// | int, integer, number, long, short    | `integer`   |
/// | float, double, real, decimal         | `numeric`   |
/// | bool, boolean                        | `boolean`   |
/// | date, datetime, timestamp            | `timestamp` |
/// | anything else, including empty       | `text`      |
pub fn map_type(token: &str) -> ColumnType {
    match token.trim().to_lowercase().as_str() {
        "int" | "integer" | "number" | "long" | "short" => ColumnType::Integer,
        "float" | "double" | "real" | "decimal" => ColumnType::Numeric,
        "bool" | "boolean" => ColumnType::Boolean,
        "date" | "datetime" | "timestamp" => ColumnType::Timestamp,
        _ => ColumnType::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_table() {
        let cases: &[(&[&str], ColumnType)] = &[
            (&["int", "integer", "number", "long", "short"], ColumnType::Integer),
            (&["float", "double", "real", "decimal"], ColumnType::Numeric),
            (&["bool", "boolean"], ColumnType::Boolean),
            (&["date", "datetime", "timestamp"], ColumnType::Timestamp),
            (&["text", "string", "char", "varchar"], ColumnType::Text),
        ];
        for (tokens, expected) in cases {
            for token in *tokens {
                assert_eq!(map_type(token), *expected, "token {}", token);
                assert_eq!(map_type(&token.to_uppercase()), *expected, "token {}", token);
            }
        }
    }

    #[test]
    fn unknown_types_are_text() {
        assert_eq!(map_type(""), ColumnType::Text);
        assert_eq!(map_type("List<String>"), ColumnType::Text);
        assert_eq!(map_type("int[]"), ColumnType::Text);
        assert_eq!(map_type("uuid"), ColumnType::Text);
    }

    #[test]
    fn strips_visibility_markers() {
        for raw in ["+ age: int", "-age:int", "# age : int", "~  age: int", "age: int"] {
            let attr = parse_attribute(raw);
            assert_eq!(attr.name, "age", "raw {:?}", raw);
            assert_eq!(attr.column_type, ColumnType::Integer, "raw {:?}", raw);
        }
    }

    #[test]
    fn missing_colon_defaults_to_text() {
        let attr = parse_attribute("+ nickname");
        assert_eq!(attr.name, "nickname");
        assert_eq!(attr.column_type, ColumnType::Text);
    }

    #[test]
    fn splits_on_first_colon_only() {
        let attr = parse_attribute("+ tags: Map<String: Int>");
        assert_eq!(attr.name, "tags");
        assert_eq!(attr.column_type, ColumnType::Text);
    }

    #[test]
    fn degenerate_declarations() {
        assert_eq!(parse_attribute("").name, "unnamed");
        assert_eq!(parse_attribute(": int").name, "unnamed");
        assert_eq!(parse_attribute(": int").column_type, ColumnType::Integer);
        assert_eq!(parse_attribute("+").name, "unnamed");
    }
}
