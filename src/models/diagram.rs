//! Class diagram model for the SDK
//!
//! The diagram editor emits a flat list of loosely shaped element records per board.
//! Here they are decoded into a tagged sum type, one variant per element kind, and
//! then split into the ordered class and relationship lists the schema generator consumes.

use super::enums::{Multiplicity, RelationshipKind};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Class node: an entity that materializes as a table
///
/// # Example
///
/// ```rust
/// use uml_schema_sdk::models::ClassNode;
///
/// let person = ClassNode::new("c1", "Person").with_attributes(["+ age: int"]);
/// assert_eq!(person.attributes.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassNode {
    /// Opaque identifier, unique within one submitted diagram
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    /// Display name as typed by the user
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Raw attribute declarations, e.g. `"+ age: int"`
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Vec<String>,
    /// Raw method declarations (carried through, never mapped to columns)
    #[serde(default, deserialize_with = "null_as_default")]
    pub methods: Vec<String>,
}

impl ClassNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }
}

/// Edge record as drawn in the editor, before kind and multiplicities are normalized
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeElement {
    #[serde(default, deserialize_with = "string_or_number")]
    pub from: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub to: String,
    #[serde(default, alias = "multOrigen", deserialize_with = "null_as_default")]
    pub multiplicity_from: String,
    #[serde(default, alias = "multDestino", deserialize_with = "null_as_default")]
    pub multiplicity_to: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
}

/// One element of a diagram board
///
/// Elements are tagged by `type`. Tags that do not describe a class or a relationship
/// (notes, free shapes, text boxes) decode to [`DiagramElement::Other`] and are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DiagramElement {
    Class(ClassNode),
    Association(EdgeElement),
    Composition(EdgeElement),
    Aggregation(EdgeElement),
    Generalization(EdgeElement),
    #[serde(other)]
    Other,
}

/// Relationship edge with its kind and normalized multiplicities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub kind: RelationshipKind,
    pub from: String,
    pub to: String,
    pub multiplicity_from: Multiplicity,
    pub multiplicity_to: Multiplicity,
    /// Cosmetic label, never used for schema generation
    #[serde(default)]
    pub label: String,
}

impl RelationshipEdge {
    pub fn new(kind: RelationshipKind, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind,
            from: from.into(),
            to: to.into(),
            multiplicity_from: Multiplicity::Unspecified,
            multiplicity_to: Multiplicity::Unspecified,
            label: String::new(),
        }
    }

    /// Set both multiplicities from raw tokens
    pub fn with_multiplicities(mut self, from: &str, to: &str) -> Self {
        self.multiplicity_from = Multiplicity::parse(from);
        self.multiplicity_to = Multiplicity::parse(to);
        self
    }

    fn from_element(kind: RelationshipKind, element: EdgeElement) -> Self {
        Self {
            kind,
            from: element.from,
            to: element.to,
            multiplicity_from: Multiplicity::parse(&element.multiplicity_from),
            multiplicity_to: Multiplicity::parse(&element.multiplicity_to),
            label: element.label,
        }
    }

    pub fn is_self_reference(&self) -> bool {
        self.from == self.to
    }
}

/// A complete diagram snapshot: every class and relationship, in element order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub classes: Vec<ClassNode>,
    pub relationships: Vec<RelationshipEdge>,
}

impl Diagram {
    pub fn new(classes: Vec<ClassNode>, relationships: Vec<RelationshipEdge>) -> Self {
        Self {
            classes,
            relationships,
        }
    }

    /// Split a flat element list into classes and relationships, preserving order
    pub fn from_elements<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = DiagramElement>,
    {
        let mut diagram = Diagram::default();
        for element in elements {
            let (kind, edge) = match element {
                DiagramElement::Class(class) => {
                    diagram.classes.push(class);
                    continue;
                }
                DiagramElement::Association(edge) => (RelationshipKind::Association, edge),
                DiagramElement::Composition(edge) => (RelationshipKind::Composition, edge),
                DiagramElement::Aggregation(edge) => (RelationshipKind::Aggregation, edge),
                DiagramElement::Generalization(edge) => (RelationshipKind::Generalization, edge),
                DiagramElement::Other => continue,
            };
            diagram
                .relationships
                .push(RelationshipEdge::from_element(kind, edge));
        }
        diagram
    }

    /// Flatten boards in their given order, then split the elements
    pub fn from_boards(boards: Vec<Vec<DiagramElement>>) -> Self {
        Self::from_elements(boards.into_iter().flatten())
    }

    pub fn class(&self, id: &str) -> Option<&ClassNode> {
        self.classes.iter().find(|c| c.id == id)
    }
}

/// Accept ids as JSON strings or numbers (editors often use timestamps as ids)
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(String::new()),
        Some(serde_json::Value::String(s)) => Ok(s),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number identifier, got {}",
            other
        ))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_tagged_elements() {
        let elements: Vec<DiagramElement> = serde_json::from_value(json!([
            {"type": "Class", "id": 17, "name": "Person", "attributes": ["+ age: int"]},
            {"type": "Association", "from": 17, "to": "x", "multOrigen": "1", "multDestino": "*"},
            {"type": "Note", "text": "ignored"}
        ]))
        .unwrap();

        assert_eq!(elements.len(), 3);
        assert_eq!(elements[2], DiagramElement::Other);

        let diagram = Diagram::from_elements(elements);
        assert_eq!(diagram.classes[0].id, "17");
        assert_eq!(diagram.relationships[0].from, "17");
        assert!(diagram.relationships[0].multiplicity_from.is_one());
        assert!(diagram.relationships[0].multiplicity_to.is_many());
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let element: DiagramElement = serde_json::from_value(json!(
            {"type": "Class", "id": "c1", "name": null, "attributes": null}
        ))
        .unwrap();
        match element {
            DiagramElement::Class(class) => {
                assert!(class.name.is_empty());
                assert!(class.attributes.is_empty());
            }
            other => panic!("expected a class, got {:?}", other),
        }
    }

    #[test]
    fn boards_flatten_in_order() {
        let boards = vec![
            vec![DiagramElement::Class(ClassNode::new("a", "A"))],
            vec![DiagramElement::Class(ClassNode::new("b", "B"))],
        ];
        let diagram = Diagram::from_boards(boards);
        let ids: Vec<_> = diagram.classes.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
