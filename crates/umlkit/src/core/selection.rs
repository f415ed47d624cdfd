//! Selection of diagram elements
//!
//! Selecting a node does not select its descendants, but they count as
//! transitively selected. An edge counts as transitively selected when
//! both of its endpoints do.

use std::fmt;

use indexmap::IndexSet;

use super::{Diagram, EdgeId, NodeId};

/// Reference to a node or an edge of a diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Node(NodeId),
    Edge(EdgeId),
}

impl From<NodeId> for ElementRef {
    fn from(id: NodeId) -> Self {
        ElementRef::Node(id)
    }
}

impl From<EdgeId> for ElementRef {
    fn from(id: EdgeId) -> Self {
        ElementRef::Edge(id)
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Node(id) => write!(f, "{}", id),
            ElementRef::Edge(id) => write!(f, "{}", id),
        }
    }
}

/// Nodes and edges of a transitive selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
    /// Selected nodes and their descendants, in containment pre-order
    pub nodes: Vec<NodeId>,
    /// Edges whose endpoints are both in `nodes`, in insertion order
    pub edges: Vec<EdgeId>,
}

impl Closure {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Ordered set of selected elements
///
/// Adding an element that is already selected moves it to the end, so the
/// last element is always the most recently selected one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionList {
    elements: IndexSet<ElementRef>,
}

impl SelectionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: impl Into<ElementRef>) {
        let element = element.into();
        self.elements.shift_remove(&element);
        self.elements.insert(element);
    }

    /// Returns true if the element was selected
    pub fn remove(&mut self, element: impl Into<ElementRef>) -> bool {
        self.elements.shift_remove(&element.into())
    }

    pub fn contains(&self, element: impl Into<ElementRef>) -> bool {
        self.elements.contains(&element.into())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Most recently selected element
    pub fn last(&self) -> Option<ElementRef> {
        self.elements.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementRef> + '_ {
        self.elements.iter().copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter_map(|element| match element {
            ElementRef::Node(id) => Some(id),
            ElementRef::Edge(_) => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.iter().filter_map(|element| match element {
            ElementRef::Edge(id) => Some(id),
            ElementRef::Node(_) => None,
        })
    }

    /// Returns true if the element or, for nodes, one of its ancestors is
    /// selected; edges also count when both endpoints are
    pub fn is_transitively_selected(&self, diagram: &Diagram, element: ElementRef) -> bool {
        match element {
            ElementRef::Node(id) => self.is_node_transitively_selected(diagram, id),
            ElementRef::Edge(id) => {
                if self.contains(id) {
                    return true;
                }
                diagram.edge(id).is_some_and(|edge| {
                    [edge.start(), edge.end()].into_iter().all(|endpoint| {
                        endpoint
                            .is_some_and(|node| self.is_node_transitively_selected(diagram, node))
                    })
                })
            }
        }
    }

    /// Transitively selected nodes and the edges internal to them
    ///
    /// Elements that no longer exist in `diagram` are skipped. A selected
    /// edge with an endpoint outside the node set is left out.
    pub fn closure(&self, diagram: &Diagram) -> Closure {
        let nodes: Vec<NodeId> = diagram
            .preorder()
            .into_iter()
            .filter(|&id| self.is_node_transitively_selected(diagram, id))
            .collect();
        let edges = diagram
            .edges()
            .filter(|(_, edge)| {
                [edge.start(), edge.end()]
                    .into_iter()
                    .all(|endpoint| endpoint.is_some_and(|node| nodes.contains(&node)))
            })
            .map(|(id, _)| id)
            .collect();
        Closure { nodes, edges }
    }

    fn is_node_transitively_selected(&self, diagram: &Diagram, id: NodeId) -> bool {
        diagram.node(id).is_some()
            && (self.contains(id)
                || diagram
                    .ancestors(id)
                    .into_iter()
                    .any(|ancestor| self.contains(ancestor)))
    }
}

impl FromIterator<ElementRef> for SelectionList {
    fn from_iter<I: IntoIterator<Item = ElementRef>>(iter: I) -> Self {
        let mut selection = SelectionList::new();
        for element in iter {
            selection.add(element);
        }
        selection
    }
}
