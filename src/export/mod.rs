//! Export functionality
//!
//! Provides exporters for:
//! - PostgreSQL DDL (idempotent schema scripts from class diagrams)

pub mod sql;

pub use sql::{GenerationResult, GenerationStatistics, GeneratorOptions, SchemaGenerator};
