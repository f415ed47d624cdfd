//! Core trait for diagram types
//!
//! A diagram type decides which node and edge kinds a diagram accepts and
//! adds its own connection rules on top of the generic ones enforced by
//! [`Diagram`](super::Diagram).

use std::fmt;

use super::{EdgeKind, NodeKind};

/// Per-type rules and toolbar prototypes
///
/// Implemented by each diagram plugin. The diagram calls these hooks when
/// adding nodes, adding edges and pasting a clipboard fragment.
pub trait DiagramType: fmt::Debug + Send + Sync {
    /// Short registry name, e.g. `class`
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Default-valued node kinds offered for creation
    fn node_prototypes(&self) -> Vec<NodeKind>;

    /// Default-valued edge kinds offered for creation
    fn edge_prototypes(&self) -> Vec<EdgeKind>;

    /// Returns true if diagrams of this type may hold nodes of `kind`
    fn supports_node(&self, kind: &NodeKind) -> bool {
        let prototypes = self.node_prototypes();
        kind.is_note()
            || kind.is_point()
            || prototypes
                .iter()
                .any(|prototype| prototype.type_name() == kind.type_name())
    }

    /// Returns true if diagrams of this type may hold edges of `kind`
    fn supports_edge(&self, kind: &EdgeKind) -> bool {
        kind.is_note()
            || self
                .edge_prototypes()
                .iter()
                .any(|prototype| prototype.same_type(kind))
    }

    /// Type-specific rule for an edge of `edge` from `start` to `end`
    ///
    /// Only called once the generic note and point rules have passed.
    fn can_connect(&self, edge: &EdgeKind, start: &NodeKind, end: &NodeKind) -> bool {
        let _ = (edge, start, end);
        true
    }
}
