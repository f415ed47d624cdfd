//! Rules of class diagrams

use std::sync::Arc;

use crate::core::{Diagram, DiagramType, EdgeKind, GeneralizationType, NodeKind};

/// Class diagram type
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassDiagram;

impl ClassDiagram {
    pub fn new() -> Self {
        Self
    }

    /// Create an empty class diagram
    pub fn create() -> Diagram {
        Diagram::new(Arc::new(Self))
    }
}

fn is_classifier(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Class { .. } | NodeKind::Interface { .. })
}

impl DiagramType for ClassDiagram {
    fn name(&self) -> &'static str {
        "class"
    }

    fn description(&self) -> &'static str {
        "Classes, interfaces and packages with their relationships"
    }

    fn node_prototypes(&self) -> Vec<NodeKind> {
        vec![
            NodeKind::class(),
            NodeKind::interface(),
            NodeKind::package(),
            NodeKind::note(),
        ]
    }

    fn edge_prototypes(&self) -> Vec<EdgeKind> {
        vec![
            EdgeKind::Dependency,
            EdgeKind::association(),
            EdgeKind::generalization(),
            EdgeKind::implementation(),
            EdgeKind::aggregation(),
            EdgeKind::composition(),
            EdgeKind::Note,
        ]
    }

    /// Dependencies may link packages; every other relationship links
    /// classifiers, and an implementation must end at an interface
    fn can_connect(&self, edge: &EdgeKind, start: &NodeKind, end: &NodeKind) -> bool {
        match edge {
            EdgeKind::Dependency | EdgeKind::Note => true,
            EdgeKind::Generalization {
                generalization: GeneralizationType::Implementation,
            } => is_classifier(start) && matches!(end, NodeKind::Interface { .. }),
            _ => is_classifier(start) && is_classifier(end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Edge, Node, Point};

    #[test]
    fn test_prototypes_are_supported() {
        let class = ClassDiagram::new();
        for kind in class.node_prototypes() {
            assert!(class.supports_node(&kind), "{}", kind);
        }
        assert!(class.supports_node(&NodeKind::Point));
        assert!(!class.supports_node(&NodeKind::state()));
        assert!(!class.supports_edge(&EdgeKind::StateTransition));
    }

    #[test]
    fn test_implementation_needs_interface() {
        let class = ClassDiagram::new();
        let implementation = EdgeKind::implementation();
        assert!(class.can_connect(&implementation, &NodeKind::class(), &NodeKind::interface()));
        assert!(!class.can_connect(&implementation, &NodeKind::class(), &NodeKind::class()));
    }

    #[test]
    fn test_packages_only_take_dependencies() {
        let mut diagram = ClassDiagram::create();
        diagram.add_node(Node::package(), Point::new(0, 0)).unwrap();
        diagram.add_node(Node::package(), Point::new(300, 0)).unwrap();
        assert!(diagram
            .add_edge(Edge::generalization(), Point::new(1, 1), Point::new(301, 1))
            .is_none());
        assert!(diagram
            .add_edge(Edge::dependency(), Point::new(1, 1), Point::new(301, 1))
            .is_some());
    }
}
