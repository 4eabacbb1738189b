//! Input validation and sanitization utilities.
//!
//! Diagram names are free text typed by users. Everything that ends up in DDL as an
//! identifier passes through [`sanitize_identifier`] first, so emitted SQL never
//! carries quotes, spaces or punctuation from the diagram.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback identifier for names that sanitize to nothing
pub const UNNAMED: &str = "unnamed";

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex"));
static RE_NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("Invalid regex"));

/// Errors that can occur during identifier validation.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
pub enum ValidationError {
    /// Identifier is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Identifier starts with a digit and needs quoting in PostgreSQL
    #[error("{field} must start with a letter or underscore: {name}")]
    LeadingDigit { field: &'static str, name: String },

    /// Identifier is a reserved word
    #[error("{field} cannot be a reserved word: {word}")]
    ReservedWord { field: &'static str, word: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Normalize an arbitrary user-entered name into a lowercase snake-case identifier.
///
/// Trims, turns whitespace runs into one underscore, strips every character outside
/// `[A-Za-z0-9_]`, trims leading/trailing underscores and lowercases. An empty
/// result becomes `"unnamed"`.
///
/// # Examples
///
/// ```
/// use uml_schema_sdk::validation::input::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("  Order Line "), "order_line");
/// assert_eq!(sanitize_identifier("Café-Bar!"), "cafbar");
/// assert_eq!(sanitize_identifier("__"), "unnamed");
/// ```
pub fn sanitize_identifier(name: &str) -> String {
    let collapsed = RE_WHITESPACE.replace_all(name.trim(), "_");
    let stripped = RE_NON_WORD.replace_all(&collapsed, "");
    let sanitized = stripped.trim_matches('_').to_lowercase();
    if sanitized.is_empty() {
        UNNAMED.to_string()
    } else {
        sanitized
    }
}

/// Check a sanitized table name for problems PostgreSQL would reject unquoted.
///
/// The generator emits unquoted identifiers, so a class called `Order` or `User`
/// produces DDL that fails to apply. These are reported, never rewritten.
pub fn validate_table_name(name: &str) -> ValidationResult<()> {
    let Some(first) = name.chars().next() else {
        return Err(ValidationError::Empty("table name"));
    };

    if first.is_ascii_digit() {
        return Err(ValidationError::LeadingDigit {
            field: "table name",
            name: name.to_string(),
        });
    }

    if is_sql_reserved_word(name) {
        return Err(ValidationError::ReservedWord {
            field: "table name",
            word: name.to_string(),
        });
    }

    Ok(())
}

fn is_sql_reserved_word(word: &str) -> bool {
    const RESERVED_WORDS: &[&str] = &[
        "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "both", "case",
        "cast", "check", "collate", "column", "constraint", "create", "current_date",
        "current_role", "current_time", "current_timestamp", "current_user", "default",
        "deferrable", "desc", "distinct", "do", "else", "end", "except", "false", "fetch",
        "for", "foreign", "from", "grant", "group", "having", "in", "initially",
        "intersect", "into", "lateral", "leading", "limit", "localtime", "not", "null",
        "offset", "on", "only", "or", "order", "placing", "primary", "references",
        "returning", "select", "session_user", "some", "symmetric", "table", "then", "to",
        "trailing", "true", "union", "unique", "user", "using", "variadic", "when",
        "where", "window", "with",
    ];

    let lower = word.to_lowercase();
    RESERVED_WORDS.contains(&lower.as_str())
}
