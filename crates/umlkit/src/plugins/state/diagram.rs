//! Rules of state diagrams

use std::sync::Arc;

use crate::core::{Diagram, DiagramType, EdgeKind, NodeKind};

/// State diagram type
#[derive(Debug, Clone, Copy, Default)]
pub struct StateDiagram;

impl StateDiagram {
    pub fn new() -> Self {
        Self
    }

    /// Create an empty state diagram
    pub fn create() -> Diagram {
        Diagram::new(Arc::new(Self))
    }
}

impl DiagramType for StateDiagram {
    fn name(&self) -> &'static str {
        "state"
    }

    fn description(&self) -> &'static str {
        "States and the transitions between them"
    }

    fn node_prototypes(&self) -> Vec<NodeKind> {
        vec![
            NodeKind::state(),
            NodeKind::InitialState,
            NodeKind::FinalState,
            NodeKind::note(),
        ]
    }

    fn edge_prototypes(&self) -> Vec<EdgeKind> {
        vec![EdgeKind::StateTransition, EdgeKind::Note]
    }

    /// No transition enters the initial state or leaves the final state
    fn can_connect(&self, edge: &EdgeKind, start: &NodeKind, end: &NodeKind) -> bool {
        match edge {
            EdgeKind::StateTransition => {
                !matches!(end, NodeKind::InitialState) && !matches!(start, NodeKind::FinalState)
            }
            _ => true,
        }
    }
}
