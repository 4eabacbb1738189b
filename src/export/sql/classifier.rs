//! Join-class classification
//!
//! A recursive many-to-many relationship is often drawn as a class `S` with two
//! `1 -> *` edges to an explicit join class `T`. Such a `T` is a pure join
//! intermediary: it gets no table of its own, and the two edges together become a
//! single self-referencing join table on `S`.
//!
//! This runs over all edges before any table is emitted.

use crate::models::{Diagram, RelationshipEdge};
use petgraph::graph::NodeIndex;
use petgraph::{Directed, Graph};
use std::collections::{HashMap, HashSet};

/// Two cooperating edges `source -> target` forming a recursive many-to-many
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecursivePair {
    pub source: String,
    pub target: String,
    /// Edge indices in element order
    pub edges: [usize; 2],
}

/// Output of the classification pre-pass
#[derive(Debug, Clone, Default)]
pub struct Classification {
    intermediaries: HashSet<String>,
    pairs: Vec<RecursivePair>,
    pair_by_edge: HashMap<usize, usize>,
}

impl Classification {
    /// Whether the class is a pure join intermediary (no standalone table)
    pub fn is_intermediary(&self, class_id: &str) -> bool {
        self.intermediaries.contains(class_id)
    }

    /// The recursive pair an edge belongs to, if any
    pub fn pair_for(&self, edge_index: usize) -> Option<&RecursivePair> {
        self.pair_by_edge
            .get(&edge_index)
            .map(|&pair| &self.pairs[pair])
    }

    pub fn pairs(&self) -> &[RecursivePair] {
        &self.pairs
    }
}

/// `1 -> *` between two distinct, known classes
fn qualifies(edge: &RelationshipEdge) -> bool {
    !edge.is_self_reference() && edge.multiplicity_from.is_one() && edge.multiplicity_to.is_many()
}

/// Classify join intermediaries: a target `T` qualifies when exactly two qualifying
/// edges run from the same source `S` to `T`. Three or more are left alone.
///
/// # Example
///
/// ```rust
/// use uml_schema_sdk::export::sql::classifier::classify;
/// use uml_schema_sdk::models::{ClassNode, Diagram, RelationshipEdge, RelationshipKind};
///
/// let edge = || RelationshipEdge::new(RelationshipKind::Association, "s", "t").with_multiplicities("1", "*");
/// let diagram = Diagram::new(
///     vec![ClassNode::new("s", "Person"), ClassNode::new("t", "Friendship")],
///     vec![edge(), edge()],
/// );
/// let classification = classify(&diagram);
/// assert!(classification.is_intermediary("t"));
/// assert_eq!(classification.pair_for(1).unwrap().edges, [0, 1]);
/// ```
pub fn classify(diagram: &Diagram) -> Classification {
    let mut graph = Graph::<&str, usize, Directed>::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
    for class in &diagram.classes {
        nodes
            .entry(class.id.as_str())
            .or_insert_with(|| graph.add_node(class.id.as_str()));
    }

    let mut candidates = Vec::new();
    for (index, edge) in diagram.relationships.iter().enumerate() {
        if !qualifies(edge) {
            continue;
        }
        if let (Some(&s), Some(&t)) = (nodes.get(edge.from.as_str()), nodes.get(edge.to.as_str())) {
            graph.add_edge(s, t, index);
            candidates.push((s, t));
        }
    }

    let mut classification = Classification::default();
    let mut seen = HashSet::new();

    for (s, t) in candidates {
        if !seen.insert((s, t)) {
            continue;
        }

        let mut edges: Vec<usize> = graph.edges_connecting(s, t).map(|e| *e.weight()).collect();
        if edges.len() != 2 {
            continue;
        }
        edges.sort_unstable();

        let pair = RecursivePair {
            source: graph[s].to_string(),
            target: graph[t].to_string(),
            edges: [edges[0], edges[1]],
        };
        let pair_index = classification.pairs.len();
        for edge in pair.edges {
            classification.pair_by_edge.insert(edge, pair_index);
        }
        classification.intermediaries.insert(pair.target.clone());
        classification.pairs.push(pair);
    }

    classification
}
