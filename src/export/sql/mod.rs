//! PostgreSQL schema generation from class diagrams
//!
//! The pipeline runs in a fixed order over one diagram snapshot:
//!
//! 1. [`classifier`] finds join classes of recursive many-to-many relationships
//! 2. [`tables`] resolves table names and emits one table per remaining class
//! 3. [`rules`] turns every relationship edge into columns, constraints or join tables
//! 4. [`script`] assembles the banner, both blocks and the trailer
//!
//! All state lives in the call; a [`SchemaGenerator`] can be shared across threads.

pub mod attributes;
pub mod classifier;
pub mod ddl;
pub mod rules;
pub mod script;
pub mod tables;

use crate::models::{CollisionPolicy, Diagram};
use crate::validation::relationships::RelationshipValidator;
use crate::validation::tables::TableValidator;
use chrono::{DateTime, Utc};
use rules::{Rule, RuleApplication, RuleEngine};
use serde::{Deserialize, Serialize};
use tables::TableNames;
use tracing::{info, warn};

pub use ddl::DdlStatement;

/// Options controlling schema generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GeneratorOptions {
    /// What to do when two classes map to the same table name
    pub collision_policy: CollisionPolicy,
    /// Emit the header and trailer comments
    pub include_banner: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            collision_policy: CollisionPolicy::Warn,
            include_banner: true,
        }
    }
}

/// Counts reported alongside the script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStatistics {
    pub class_count: usize,
    pub relationship_count: usize,
    /// Class tables plus generic many-to-many join tables
    pub table_count: usize,
}

/// Result of one generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[must_use = "generation results contain the DDL script and should be used"]
pub struct GenerationResult {
    pub sql: String,
    pub statistics: GenerationStatistics,
    /// One entry per applied rule, in edge order
    pub applied_rules: Vec<RuleApplication>,
    /// Name collisions, reserved table names and inheritance cycles
    pub warnings: Vec<String>,
}

/// Generator for idempotent PostgreSQL DDL
#[derive(Debug, Clone, Default)]
pub struct SchemaGenerator {
    options: GeneratorOptions,
}

impl SchemaGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Generate the schema script, stamped with the current time
    ///
    /// # Example
    ///
    /// ```rust
    /// use uml_schema_sdk::export::sql::SchemaGenerator;
    /// use uml_schema_sdk::models::{ClassNode, Diagram};
    ///
    /// let diagram = Diagram::new(
    ///     vec![ClassNode::new("1", "Person").with_attributes(["+ age: int"])],
    ///     vec![],
    /// );
    /// let result = SchemaGenerator::default().generate(&diagram);
    /// assert!(result.sql.contains("CREATE TABLE IF NOT EXISTS person (\n  id BIGSERIAL PRIMARY KEY,\n  age integer\n);"));
    /// assert_eq!(result.statistics.table_count, 1);
    /// ```
    pub fn generate(&self, diagram: &Diagram) -> GenerationResult {
        self.generate_at(diagram, Utc::now())
    }

    /// Generate the schema script with a fixed timestamp
    pub fn generate_at(&self, diagram: &Diagram, generated_at: DateTime<Utc>) -> GenerationResult {
        let names = TableNames::resolve(diagram, self.options.collision_policy);
        let classification = classifier::classify(diagram);
        let table_blocks = tables::emit_tables(diagram, &names, &classification);
        let applied_rules = RuleEngine::new(diagram, &names, &classification).run();

        let join_tables = applied_rules
            .iter()
            .filter(|a| a.rule == Rule::ManyToMany)
            .count();
        let statistics = GenerationStatistics {
            class_count: diagram.classes.len(),
            relationship_count: diagram.relationships.len(),
            table_count: diagram.classes.len() + join_tables,
        };

        let mut warnings = names.warnings().to_vec();
        warnings.extend(self.diagram_warnings(diagram));

        let sql = script::assemble(
            &table_blocks,
            &applied_rules,
            &statistics,
            self.options.include_banner.then_some(generated_at),
        );

        info!(
            "Generated schema: {} classes, {} relationships, {} tables, {} warnings",
            statistics.class_count,
            statistics.relationship_count,
            statistics.table_count,
            warnings.len()
        );

        GenerationResult {
            sql,
            statistics,
            applied_rules,
            warnings,
        }
    }

    fn diagram_warnings(&self, diagram: &Diagram) -> Vec<String> {
        let mut warnings = Vec::new();

        for invalid in TableValidator::new().detect_invalid_names(diagram) {
            let message = format!(
                "Class {} maps to table '{}': {}",
                invalid.class_id, invalid.table_name, invalid.error
            );
            warn!("{}", message);
            warnings.push(message);
        }

        for cycle in RelationshipValidator::new().find_generalization_cycles(diagram) {
            let message = format!(
                "Generalization at edge {} closes an inheritance cycle: {}",
                cycle.edge_index,
                cycle.cycle_path.join(" -> ")
            );
            warn!("{}", message);
            warnings.push(message);
        }

        warnings
    }
}
