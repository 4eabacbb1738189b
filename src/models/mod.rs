//! Models module for the SDK
//!
//! Defines the diagram input model (classes, relationship edges) and the schema
//! output model (tables, columns, foreign keys, indexes).

pub mod column;
pub mod diagram;
pub mod enums;
pub mod table;

pub use column::Column;
pub use diagram::{ClassNode, Diagram, DiagramElement, EdgeElement, RelationshipEdge};
pub use enums::*;
pub use table::{CheckConstraint, ForeignKey, Index, Table};
