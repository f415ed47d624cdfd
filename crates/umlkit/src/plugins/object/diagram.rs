//! Rules of object diagrams

use std::sync::Arc;

use crate::core::{Diagram, DiagramType, EdgeKind, NodeKind};

/// Object diagram type
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectDiagram;

impl ObjectDiagram {
    pub fn new() -> Self {
        Self
    }

    /// Create an empty object diagram
    pub fn create() -> Diagram {
        Diagram::new(Arc::new(Self))
    }
}

impl DiagramType for ObjectDiagram {
    fn name(&self) -> &'static str {
        "object"
    }

    fn description(&self) -> &'static str {
        "Object instances with references and collaborations"
    }

    fn node_prototypes(&self) -> Vec<NodeKind> {
        vec![NodeKind::object(), NodeKind::note()]
    }

    fn edge_prototypes(&self) -> Vec<EdgeKind> {
        vec![
            EdgeKind::ObjectReference,
            EdgeKind::ObjectCollaboration,
            EdgeKind::Note,
        ]
    }

    fn can_connect(&self, edge: &EdgeKind, start: &NodeKind, end: &NodeKind) -> bool {
        match edge {
            EdgeKind::ObjectReference | EdgeKind::ObjectCollaboration => {
                matches!(start, NodeKind::Object { .. }) && matches!(end, NodeKind::Object { .. })
            }
            _ => true,
        }
    }
}
