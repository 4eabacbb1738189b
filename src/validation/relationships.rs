//! Relationship validation functionality
//!
//! Validates relationship edges for unknown endpoints, self-references and
//! inheritance cycles.

use crate::models::{Diagram, RelationshipKind};
use petgraph::graph::NodeIndex;
use petgraph::{Directed, Graph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Result of relationship validation.
#[derive(Debug, Default, Serialize, Deserialize)]
#[must_use = "validation results should be checked for orphans and cycles"]
pub struct RelationshipValidationResult {
    /// Edges whose endpoints do not resolve to a class
    pub orphaned: Vec<OrphanedRelationship>,
    /// Edges connecting a class to itself
    pub self_references: Vec<SelfReference>,
    /// Generalization edges closing an inheritance cycle
    pub generalization_cycles: Vec<GeneralizationCycle>,
}

impl RelationshipValidationResult {
    pub fn is_clean(&self) -> bool {
        self.orphaned.is_empty() && self.generalization_cycles.is_empty()
    }
}

/// Relationship with a missing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrphanedRelationship {
    /// Position of the edge in element order
    pub edge_index: usize,
    pub from: String,
    pub to: String,
    pub from_exists: bool,
    pub to_exists: bool,
}

/// Self-reference detected
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelfReference {
    pub edge_index: usize,
    pub class_id: String,
}

/// Inheritance cycle detected
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralizationCycle {
    /// Edge that closes the cycle
    pub edge_index: usize,
    /// Class ids along the cycle, starting at the closing edge's target
    pub cycle_path: Vec<String>,
}

/// Relationship validator
#[derive(Default)]
pub struct RelationshipValidator;

impl RelationshipValidator {
    /// Create a new relationship validator
    ///
    /// # Example
    ///
    /// ```rust
    /// use uml_schema_sdk::validation::relationships::RelationshipValidator;
    ///
    /// let validator = RelationshipValidator::new();
    /// ```
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, diagram: &Diagram) -> RelationshipValidationResult {
        RelationshipValidationResult {
            orphaned: self.find_orphaned(diagram),
            self_references: self.find_self_references(diagram),
            generalization_cycles: self.find_generalization_cycles(diagram),
        }
    }

    /// Edges referencing class ids that are not in the diagram
    pub fn find_orphaned(&self, diagram: &Diagram) -> Vec<OrphanedRelationship> {
        let class_ids: HashSet<&str> = diagram.classes.iter().map(|c| c.id.as_str()).collect();

        diagram
            .relationships
            .iter()
            .enumerate()
            .filter_map(|(edge_index, rel)| {
                let from_exists = class_ids.contains(rel.from.as_str());
                let to_exists = class_ids.contains(rel.to.as_str());
                (!from_exists || !to_exists).then(|| OrphanedRelationship {
                    edge_index,
                    from: rel.from.clone(),
                    to: rel.to.clone(),
                    from_exists,
                    to_exists,
                })
            })
            .collect()
    }

    pub fn find_self_references(&self, diagram: &Diagram) -> Vec<SelfReference> {
        diagram
            .relationships
            .iter()
            .enumerate()
            .filter(|(_, rel)| rel.is_self_reference())
            .map(|(edge_index, rel)| SelfReference {
                edge_index,
                class_id: rel.from.clone(),
            })
            .collect()
    }

    /// Detect generalization edges that close an inheritance cycle
    ///
    /// Edges are added to a directed graph in element order; an edge `parent -> child`
    /// closes a cycle when `child` already reaches `parent`. Self-references are
    /// reported separately and skipped here.
    ///
    /// # Example
    ///
    /// ```rust
    /// use uml_schema_sdk::models::{ClassNode, Diagram, RelationshipEdge, RelationshipKind};
    /// use uml_schema_sdk::validation::relationships::RelationshipValidator;
    ///
    /// let diagram = Diagram::new(
    ///     vec![ClassNode::new("a", "A"), ClassNode::new("b", "B")],
    ///     vec![
    ///         RelationshipEdge::new(RelationshipKind::Generalization, "a", "b"),
    ///         RelationshipEdge::new(RelationshipKind::Generalization, "b", "a"),
    ///     ],
    /// );
    /// let cycles = RelationshipValidator::new().find_generalization_cycles(&diagram);
    /// assert_eq!(cycles.len(), 1);
    /// assert_eq!(cycles[0].edge_index, 1);
    /// ```
    pub fn find_generalization_cycles(&self, diagram: &Diagram) -> Vec<GeneralizationCycle> {
        let mut graph = Graph::<String, usize, Directed>::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();
        let mut cycles = Vec::new();

        for (edge_index, rel) in diagram.relationships.iter().enumerate() {
            if rel.kind != RelationshipKind::Generalization || rel.is_self_reference() {
                continue;
            }

            let parent = *node_map
                .entry(rel.from.clone())
                .or_insert_with(|| graph.add_node(rel.from.clone()));
            let child = *node_map
                .entry(rel.to.clone())
                .or_insert_with(|| graph.add_node(rel.to.clone()));

            if let Some(path) = self.find_path(&graph, child, parent) {
                cycles.push(GeneralizationCycle {
                    edge_index,
                    cycle_path: path,
                });
            }
            graph.add_edge(parent, child, edge_index);
        }

        cycles
    }

    /// Find a path between two nodes (BFS), returned as node weights
    fn find_path(
        &self,
        graph: &Graph<String, usize, Directed>,
        from: NodeIndex,
        to: NodeIndex,
    ) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut parent = HashMap::new();

        queue.push_back(from);
        visited.insert(from);

        while let Some(node) = queue.pop_front() {
            if node == to {
                let mut path = Vec::new();
                let mut current = Some(to);
                while let Some(node_idx) = current {
                    path.push(graph[node_idx].clone());
                    current = parent.get(&node_idx).copied();
                }
                path.reverse();
                return Some(path);
            }

            for neighbor in graph.neighbors(node) {
                if visited.insert(neighbor) {
                    parent.insert(neighbor, node);
                    queue.push_back(neighbor);
                }
            }
        }
        None
    }
}
