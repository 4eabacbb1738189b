//! Relationship rules
//!
//! Each relationship edge is matched against an ordered list of rules; the first
//! rule that applies produces the DDL for that edge. Checks run in this order:
//!
//! 1. an endpoint does not resolve to a class table: comment only
//! 2. self-loop: nullable `parent_id` on the class
//! 3. edge of a recursive pair: self-referencing join table on the source
//! 4. composition: part carries the whole's key, composite primary key
//! 5. generalization: child carries the parent's key, discriminator, indexes
//! 6. aggregation: part carries a nullable reference to the whole
//! 7. association `* -> *`: join table
//! 8. association `1 -> *` (either direction): foreign key on the many side
//! 9. anything else: nullable foreign key on the target
//!
//! An edge touching a join intermediary that is not one of its pair's two edges has
//! no table to attach to and falls under rule 1.

use super::classifier::{Classification, RecursivePair};
use super::ddl::DdlStatement;
use super::tables::TableNames;
use crate::models::table::{constraint_name, suffixed_identifier, truncate_identifier};
use crate::models::{
    CheckConstraint, Column, ColumnType, Diagram, ForeignKey, Index, OnDelete, RelationshipEdge,
    RelationshipKind, Table,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// The rule that handled an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    MissingEndpoint,
    SelfReference,
    RecursiveManyToMany,
    Composition,
    Generalization,
    Aggregation,
    ManyToMany,
    OneToMany,
    Fallback,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::MissingEndpoint => "missing endpoint",
            Rule::SelfReference => "self reference",
            Rule::RecursiveManyToMany => "recursive many-to-many",
            Rule::Composition => "composition",
            Rule::Generalization => "generalization",
            Rule::Aggregation => "aggregation",
            Rule::ManyToMany => "many-to-many",
            Rule::OneToMany => "one-to-many",
            Rule::Fallback => "fallback",
        };
        write!(f, "{}", name)
    }
}

/// Statements one rule produced, and the edges it consumed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleApplication {
    pub rule: Rule,
    /// Edge indices in element order; two for a recursive pair, otherwise one
    pub edges: Vec<usize>,
    pub statements: Vec<DdlStatement>,
}

impl RuleApplication {
    fn new(rule: Rule, edge: usize, statements: Vec<DdlStatement>) -> Self {
        Self {
            rule,
            edges: vec![edge],
            statements,
        }
    }
}

/// Applies the relationship rules to every edge of a diagram
pub struct RuleEngine<'a> {
    diagram: &'a Diagram,
    names: &'a TableNames,
    classification: &'a Classification,
}

impl<'a> RuleEngine<'a> {
    pub fn new(diagram: &'a Diagram, names: &'a TableNames, classification: &'a Classification) -> Self {
        Self {
            diagram,
            names,
            classification,
        }
    }

    /// Run every edge through the rules, in element order. Each edge is handled
    /// exactly once; the second edge of a recursive pair is consumed with the first.
    pub fn run(&self) -> Vec<RuleApplication> {
        let mut processed = vec![false; self.diagram.relationships.len()];
        let mut composite_keys: HashMap<String, Vec<String>> = HashMap::new();
        let mut applications = Vec::new();

        for (index, edge) in self.diagram.relationships.iter().enumerate() {
            if processed[index] {
                continue;
            }
            let application = self.apply(index, edge, &mut composite_keys);
            debug!(
                "Edge {} ({} {} -> {}) handled by {} rule",
                index, edge.kind, edge.from, edge.to, application.rule
            );
            for &consumed in &application.edges {
                processed[consumed] = true;
            }
            applications.push(application);
        }

        applications
    }

    fn apply(
        &self,
        index: usize,
        edge: &RelationshipEdge,
        composite_keys: &mut HashMap<String, Vec<String>>,
    ) -> RuleApplication {
        let (Some(from), Some(to)) = (self.names.get(&edge.from), self.names.get(&edge.to)) else {
            warn!(
                "Skipping {} relationship {} -> {}: class not found",
                edge.kind, edge.from, edge.to
            );
            return RuleApplication::new(
                Rule::MissingEndpoint,
                index,
                vec![DdlStatement::comment(format!(
                    "Skipped {} relationship from {} to {}: class not found",
                    edge.kind, edge.from, edge.to
                ))],
            );
        };

        let pair = self.classification.pair_for(index);
        if pair.is_none() {
            let intermediary = [&edge.from, &edge.to]
                .into_iter()
                .find(|id| self.classification.is_intermediary(id));
            if let Some(id) = intermediary {
                let table = self.names.get(id).unwrap_or(id.as_str());
                warn!(
                    "Skipping {} relationship {} -> {}: {} is a join class",
                    edge.kind, from, to, table
                );
                return RuleApplication::new(
                    Rule::MissingEndpoint,
                    index,
                    vec![DdlStatement::comment(format!(
                        "Skipped {} relationship from {} to {}: {} is a join class without a table",
                        edge.kind, from, to, table
                    ))],
                );
            }
        }

        if edge.is_self_reference() {
            return RuleApplication::new(Rule::SelfReference, index, self_reference(from));
        }

        if let Some(pair) = pair {
            return self.recursive(pair, from);
        }

        match edge.kind {
            RelationshipKind::Composition => RuleApplication::new(
                Rule::Composition,
                index,
                composition(from, to, composite_keys),
            ),
            RelationshipKind::Generalization => {
                RuleApplication::new(Rule::Generalization, index, generalization(from, to))
            }
            RelationshipKind::Aggregation => {
                let (mf, mt) = (&edge.multiplicity_from, &edge.multiplicity_to);
                let statements = if mt.is_one() && mf.is_many_or_unspecified() {
                    aggregation(to, from)
                } else {
                    aggregation(from, to)
                };
                RuleApplication::new(Rule::Aggregation, index, statements)
            }
            RelationshipKind::Association => {
                let (mf, mt) = (&edge.multiplicity_from, &edge.multiplicity_to);
                if mf.is_many() && mt.is_many() {
                    RuleApplication::new(Rule::ManyToMany, index, many_to_many(from, to))
                } else if mf.is_one() && mt.is_many_or_unspecified() {
                    RuleApplication::new(Rule::OneToMany, index, one_to_many(from, to))
                } else if mt.is_one() && mf.is_many_or_unspecified() {
                    RuleApplication::new(Rule::OneToMany, index, one_to_many(to, from))
                } else {
                    RuleApplication::new(Rule::Fallback, index, fallback(from, to))
                }
            }
        }
    }

    fn recursive(&self, pair: &RecursivePair, source: &str) -> RuleApplication {
        let target = self.names.get(&pair.target).unwrap_or(pair.target.as_str());
        RuleApplication {
            rule: Rule::RecursiveManyToMany,
            edges: pair.edges.to_vec(),
            statements: recursive_many_to_many(source, target),
        }
    }
}

/// Nullable `<referenced>_id` on `table` with a guarded foreign key
fn reference_on(table: &str, referenced: &str, on_delete: OnDelete) -> Vec<DdlStatement> {
    let column = suffixed_identifier(referenced, "_id");
    vec![
        DdlStatement::AddColumn {
            table: table.to_string(),
            column: Column::reference(column.as_str(), true),
        },
        DdlStatement::AddForeignKey {
            foreign_key: ForeignKey::new(table, column, referenced, on_delete),
        },
    ]
}

fn self_reference(table: &str) -> Vec<DdlStatement> {
    vec![
        DdlStatement::comment(format!("Self-referencing relationship on {}", table)),
        DdlStatement::AddColumn {
            table: table.to_string(),
            column: Column::reference("parent_id", true),
        },
        DdlStatement::AddForeignKey {
            foreign_key: ForeignKey::new(table, "parent_id", table, OnDelete::SetNull)
                .named(format!("fk_{}_parent", table)),
        },
    ]
}

fn recursive_many_to_many(source: &str, target: &str) -> Vec<DdlStatement> {
    let join = constraint_name(&[source, "recursiva_rel"]);
    let first = suffixed_identifier(source, "_id1");
    let second = suffixed_identifier(source, "_id2");

    let mut table = Table::new(
        join.as_str(),
        vec![
            Column::reference(first.as_str(), false),
            Column::reference(second.as_str(), false),
        ],
    );
    table.composite_key = Some(vec![first.clone(), second.clone()]);
    for (n, column) in [(1, &first), (2, &second)] {
        table.foreign_keys.push(
            ForeignKey::new(join.as_str(), column.as_str(), source, OnDelete::Cascade)
                .named(format!("fk_{}_{}_{}", join, source, n)),
        );
    }
    table.checks.push(CheckConstraint {
        name: constraint_name(&["chk", &join, "distinct"]),
        expression: format!("{} <> {}", first, second),
    });

    vec![
        DdlStatement::comment(format!(
            "Recursive many-to-many on {} (join class {})",
            source, target
        )),
        DdlStatement::CreateTable { table },
    ]
}

fn composition(
    whole: &str,
    part: &str,
    composite_keys: &mut HashMap<String, Vec<String>>,
) -> Vec<DdlStatement> {
    let column = suffixed_identifier(whole, "_id");
    let key = composite_keys
        .entry(part.to_string())
        .or_insert_with(|| vec!["id".to_string()]);
    if !key.contains(&column) {
        key.push(column.clone());
    }

    vec![
        DdlStatement::comment(format!("Composition: {} is part of {}", part, whole)),
        DdlStatement::AddColumn {
            table: part.to_string(),
            column: Column::reference(column.as_str(), false),
        },
        DdlStatement::ReplacePrimaryKey {
            table: part.to_string(),
            columns: key.clone(),
        },
        DdlStatement::AddForeignKey {
            foreign_key: ForeignKey::new(part, column, whole, OnDelete::Cascade),
        },
    ]
}

fn generalization(parent: &str, child: &str) -> Vec<DdlStatement> {
    let column = suffixed_identifier(parent, "_id");
    let discriminator = truncate_identifier(&format!("tipo_{}", child));

    let mut statements = vec![DdlStatement::comment(format!(
        "Generalization: {} inherits from {}",
        child, parent
    ))];
    statements.push(DdlStatement::AddColumn {
        table: child.to_string(),
        column: Column::reference(column.as_str(), true),
    });
    statements.push(DdlStatement::AddForeignKey {
        foreign_key: ForeignKey::new(child, column.as_str(), parent, OnDelete::Cascade),
    });
    statements.push(DdlStatement::AddColumn {
        table: child.to_string(),
        column: Column::new(discriminator.as_str(), ColumnType::Varchar(50))
            .with_default(format!("'{}'", child)),
    });
    statements.push(DdlStatement::CreateIndex {
        index: Index::new(&format!("idx_{}_{}", child, column), child, column.as_str()),
    });
    statements.push(DdlStatement::CreateIndex {
        index: Index::new(&format!("idx_{}_tipo", child), child, discriminator),
    });
    statements
}

fn aggregation(whole: &str, part: &str) -> Vec<DdlStatement> {
    let mut statements = vec![DdlStatement::comment(format!(
        "Aggregation: {} groups {}",
        whole, part
    ))];
    statements.extend(reference_on(part, whole, OnDelete::SetNull));
    statements
}

fn many_to_many(from: &str, to: &str) -> Vec<DdlStatement> {
    let join = constraint_name(&[from, to, "rel"]);
    let from_column = suffixed_identifier(from, "_id");
    let to_column = suffixed_identifier(to, "_id");

    let mut table = Table::new(
        join.as_str(),
        vec![
            Column::surrogate_key(),
            Column::reference(from_column.as_str(), false),
            Column::reference(to_column.as_str(), false),
        ],
    );
    table.unique_keys.push(vec![from_column.clone(), to_column.clone()]);
    table.foreign_keys.push(ForeignKey::new(
        join.as_str(),
        from_column,
        from,
        OnDelete::Cascade,
    ));
    table
        .foreign_keys
        .push(ForeignKey::new(join.as_str(), to_column, to, OnDelete::Cascade));

    vec![
        DdlStatement::comment(format!("Many-to-many between {} and {}", from, to)),
        DdlStatement::CreateTable { table },
    ]
}

fn one_to_many(one: &str, many: &str) -> Vec<DdlStatement> {
    let mut statements = vec![DdlStatement::comment(format!(
        "One-to-many: {} to {}",
        one, many
    ))];
    statements.extend(reference_on(many, one, OnDelete::SetNull));
    statements
}

fn fallback(from: &str, to: &str) -> Vec<DdlStatement> {
    let mut statements = vec![DdlStatement::comment(format!(
        "Association: {} references {}",
        to, from
    ))];
    statements.extend(reference_on(to, from, OnDelete::SetNull));
    statements
}
