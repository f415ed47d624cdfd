//! The diagram aggregate
//!
//! A [`Diagram`] owns every node and edge in two insertion-ordered arenas
//! plus the ordered list of root nodes. All structural mutation goes
//! through it, which keeps containment a consistent forest and every edge
//! endpoint inside the diagram. Views are refreshed eagerly after each
//! mutation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::{
    DiagramError, DiagramType, Edge, EdgeId, EdgeKind, GraphElement, Node, NodeId, NodeKind, Point,
    Rectangle,
};

static NEXT_DIAGRAM_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a diagram instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagramId(u64);

impl DiagramId {
    fn next() -> Self {
        Self(NEXT_DIAGRAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DiagramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// Nodes, edges and containment of one diagram
#[derive(Debug)]
pub struct Diagram {
    id: DiagramId,
    diagram_type: Arc<dyn DiagramType>,
    nodes: IndexMap<NodeId, Node>,
    roots: Vec<NodeId>,
    edges: IndexMap<EdgeId, Edge>,
    next_node: u64,
    next_edge: u64,
}

impl Diagram {
    /// Create an empty diagram governed by `diagram_type`
    pub fn new(diagram_type: Arc<dyn DiagramType>) -> Self {
        Self {
            id: DiagramId::next(),
            diagram_type,
            nodes: IndexMap::new(),
            roots: Vec::new(),
            edges: IndexMap::new(),
            next_node: 0,
            next_edge: 0,
        }
    }

    pub fn id(&self) -> DiagramId {
        self.id
    }

    pub fn diagram_type(&self) -> &Arc<dyn DiagramType> {
        &self.diagram_type
    }

    /// Registry name of the diagram type
    pub fn name(&self) -> &'static str {
        self.diagram_type.name()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(&id, node)| (id, node))
    }

    /// Nodes without a parent, in insertion order
    pub fn root_nodes(&self) -> &[NodeId] {
        &self.roots
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().map(|(&id, edge)| (id, edge))
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().copied().collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Place `node` at `point`
    ///
    /// The deepest container under the point that accepts the node's kind
    /// becomes its parent; otherwise the node is added as a root. Any
    /// containment links the node carried are dropped.
    pub fn add_node(&mut self, mut node: Node, point: Point) -> Result<NodeId, DiagramError> {
        if !self.diagram_type.supports_node(node.kind()) {
            return Err(DiagramError::unsupported_element(
                self.name(),
                node.type_name(),
            ));
        }

        node.detach();
        node.move_to(point);
        let parent = self.deepest_at(&self.roots, point, &|candidate: &Node| {
            candidate.kind().accepts_child(node.kind())
        });

        let id = self.allocate_node_id();
        self.nodes.insert(id, node);
        match parent {
            Some(parent_id) => self.link(parent_id, id),
            None => self.roots.push(id),
        }
        self.refresh_chain(id);
        self.refresh_edges();

        debug!(node = %id, parent = ?parent, %point, "Added node");
        Ok(id)
    }

    /// Connect the nodes under `start_point` and `end_point` with `edge`
    ///
    /// Returns `None` without modifying the diagram when either point does
    /// not resolve to a node or the connection is not allowed. A note edge
    /// leaving a note always ends at a new point node created at
    /// `end_point`.
    pub fn add_edge(
        &mut self,
        mut edge: Edge,
        start_point: Point,
        end_point: Point,
    ) -> Option<EdgeId> {
        let kind = edge.kind();
        if !self.diagram_type.supports_edge(&kind) {
            debug!(edge = %kind, diagram = self.name(), "Edge kind not supported");
            return None;
        }

        let Some(start) = self.find_node(start_point) else {
            trace!(point = %start_point, "No edge start under point");
            return None;
        };
        let start_kind = self.nodes.get(&start)?.kind().clone();

        let end = if kind.is_note() && start_kind.is_note() {
            None
        } else {
            let Some(end) = self.find_node(end_point) else {
                trace!(point = %end_point, "No edge end under point");
                return None;
            };
            Some(end)
        };
        let end_kind = match end {
            Some(end) => self.nodes.get(&end)?.kind().clone(),
            None => NodeKind::Point,
        };

        if !self.can_connect(&kind, &start_kind, &end_kind) {
            debug!(edge = %kind, start = %start_kind, end = %end_kind, "Connection rejected");
            return None;
        }

        let end = match end {
            Some(end) => end,
            None => {
                let mut anchor = Node::point();
                anchor.move_to(end_point);
                self.insert_root(anchor)
            }
        };

        edge.attach(start, end);
        let id = self.allocate_edge_id();
        self.edges.insert(id, edge);
        self.refresh_edge(id);

        debug!(edge = %id, %start, %end, "Added edge");
        Some(id)
    }

    /// Deepest node whose view contains `point`
    ///
    /// Later roots and later children are on top and win.
    pub fn find_node(&self, point: Point) -> Option<NodeId> {
        let hit = self.deepest_at(&self.roots, point, &|_: &Node| true);
        trace!(%point, hit = ?hit, "Node hit test");
        hit
    }

    /// Most recently added edge whose path passes through `point`
    pub fn find_edge(&self, point: Point) -> Option<EdgeId> {
        self.edges
            .iter()
            .rev()
            .find(|(_, edge)| edge.view().contains(point))
            .map(|(&id, _)| id)
    }

    /// Make `child` a child of `parent`, detaching it from its previous
    /// parent or from the root list first
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DiagramError> {
        let parent_node = self.node_ref(parent)?;
        let child_node = self.node_ref(child)?;

        if !parent_node.kind().accepts_child(child_node.kind()) {
            return Err(DiagramError::invalid_containment(format!(
                "{} cannot contain {}",
                parent_node.type_name(),
                child_node.type_name()
            )));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(DiagramError::invalid_containment(format!(
                "adding {} under {} would create a cycle",
                child, parent
            )));
        }
        if child_node.parent() == Some(parent) {
            return Ok(());
        }

        self.unlink(child);
        self.link(parent, child);
        self.refresh_chain(child);
        self.refresh_edges();

        debug!(%parent, %child, "Reparented node");
        Ok(())
    }

    /// Detach `child` from `parent`; the child stays in the diagram as a root
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DiagramError> {
        self.node_ref(parent)?;
        if self.node_ref(child)?.parent() != Some(parent) {
            return Err(DiagramError::invalid_containment(format!(
                "{} is not a child of {}",
                child, parent
            )));
        }

        self.unlink(child);
        self.roots.push(child);
        self.refresh_edges();

        debug!(%parent, %child, "Detached node");
        Ok(())
    }

    /// Move a node and its whole subtree by a relative offset
    pub fn translate_node(&mut self, id: NodeId, dx: i32, dy: i32) -> Result<(), DiagramError> {
        self.node_ref(id)?;
        let mut subtree = vec![id];
        subtree.extend(self.descendants(id));
        for member in &subtree {
            if let Some(node) = self.nodes.get_mut(member) {
                node.translate(dx, dy);
            }
        }
        self.refresh_subtree(id);
        self.refresh_ancestors(id);
        self.refresh_edges();

        trace!(node = %id, dx, dy, "Translated subtree");
        Ok(())
    }

    /// Move a node so that it sits at `point`, carrying its subtree along
    pub fn move_node_to(&mut self, id: NodeId, point: Point) -> Result<(), DiagramError> {
        let position = self.node_ref(id)?.position();
        self.translate_node(id, point.x() - position.x(), point.y() - position.y())
    }

    /// Edit a node in place, then refresh every view it affects
    pub fn update_node<R>(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut Node) -> R,
    ) -> Result<R, DiagramError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(DiagramError::NodeNotFound { id })?;
        let result = edit(node);
        self.refresh_subtree(id);
        self.refresh_ancestors(id);
        self.refresh_edges();
        Ok(result)
    }

    /// Edit an edge in place, then refresh its view
    pub fn update_edge<R>(
        &mut self,
        id: EdgeId,
        edit: impl FnOnce(&mut Edge) -> R,
    ) -> Result<R, DiagramError> {
        let edge = self
            .edges
            .get_mut(&id)
            .ok_or(DiagramError::EdgeNotFound { id })?;
        let result = edit(edge);
        self.refresh_edge(id);
        Ok(result)
    }

    /// Remove a node, its subtree, and every edge attached to any of them
    ///
    /// Returns the number of nodes removed.
    pub fn remove_node(&mut self, id: NodeId) -> Result<usize, DiagramError> {
        self.node_ref(id)?;
        let mut subtree = vec![id];
        subtree.extend(self.descendants(id));

        self.unlink(id);
        let attached: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|(_, edge)| {
                [edge.start(), edge.end()]
                    .iter()
                    .flatten()
                    .any(|endpoint| subtree.contains(endpoint))
            })
            .map(|(&edge_id, _)| edge_id)
            .collect();
        for edge_id in attached {
            self.remove_edge(edge_id)?;
        }
        for member in &subtree {
            self.nodes.shift_remove(member);
        }
        self.refresh_edges();

        debug!(node = %id, removed = subtree.len(), "Removed subtree");
        Ok(subtree.len())
    }

    /// Remove an edge, along with any point node it leaves unconnected
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, DiagramError> {
        let edge = self
            .edges
            .shift_remove(&id)
            .ok_or(DiagramError::EdgeNotFound { id })?;

        for endpoint in [edge.start(), edge.end()].into_iter().flatten() {
            let is_point = self
                .nodes
                .get(&endpoint)
                .is_some_and(|node| node.kind().is_point());
            let still_used = self
                .edges
                .values()
                .any(|other| other.start() == Some(endpoint) || other.end() == Some(endpoint));
            if is_point && !still_used {
                self.unlink(endpoint);
                self.nodes.shift_remove(&endpoint);
                trace!(node = %endpoint, "Removed orphan point node");
            }
        }

        debug!(edge = %id, "Removed edge");
        Ok(edge)
    }

    /// Ancestors of a node, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.nodes.get(&id).and_then(Node::parent);
        while let Some(parent) = current {
            if ancestors.contains(&parent) || ancestors.len() > self.nodes.len() {
                break;
            }
            ancestors.push(parent);
            current = self.nodes.get(&parent).and_then(Node::parent);
        }
        ancestors
    }

    /// Descendants of a node in pre-order, excluding the node itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut descendants = Vec::new();
        if let Some(node) = self.nodes.get(&id) {
            for &child in node.children() {
                self.collect_preorder(child, &mut descendants);
            }
        }
        descendants
    }

    /// Every node in containment pre-order, roots in insertion order
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            self.collect_preorder(root, &mut order);
        }
        order
    }

    /// Returns true if `ancestor` lies on the parent chain of `id`
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    /// Union of the bounds of every root node and every edge
    pub fn bounds(&self) -> Option<Rectangle> {
        self.roots
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(Node::bounds)
            .chain(self.edges.values().map(Edge::bounds))
            .reduce(|acc, bounds| acc.union(&bounds))
    }

    /// Verify containment and connectivity invariants
    pub fn check_consistency(&self) -> Result<(), DiagramError> {
        for (index, root) in self.roots.iter().enumerate() {
            let node = self.node_ref(*root)?;
            if node.parent().is_some() {
                return Err(DiagramError::invalid_containment(format!(
                    "root {} has a parent",
                    root
                )));
            }
            if self.roots[..index].contains(root) {
                return Err(DiagramError::invalid_containment(format!(
                    "root {} is listed twice",
                    root
                )));
            }
        }

        for (&id, node) in &self.nodes {
            match node.parent() {
                Some(parent) => {
                    let parent_node = self.node_ref(parent)?;
                    if !parent_node.children().contains(&id) {
                        return Err(DiagramError::invalid_containment(format!(
                            "{} points to parent {} which does not list it",
                            id, parent
                        )));
                    }
                    if self.roots.contains(&id) {
                        return Err(DiagramError::invalid_containment(format!(
                            "{} has a parent but is listed as a root",
                            id
                        )));
                    }
                }
                None if !self.roots.contains(&id) => {
                    return Err(DiagramError::invalid_containment(format!(
                        "{} has no parent and is not a root",
                        id
                    )));
                }
                None => {}
            }
            for &child in node.children() {
                let child_node = self.node_ref(child)?;
                if child_node.parent() != Some(id) {
                    return Err(DiagramError::invalid_containment(format!(
                        "{} lists child {} whose parent differs",
                        id, child
                    )));
                }
                if !node.kind().accepts_child(child_node.kind()) {
                    return Err(DiagramError::invalid_containment(format!(
                        "{} {} cannot contain {} {}",
                        node.type_name(),
                        id,
                        child_node.type_name(),
                        child
                    )));
                }
            }
            if self.ancestors(id).contains(&id) {
                return Err(DiagramError::invalid_containment(format!(
                    "{} is its own ancestor",
                    id
                )));
            }
        }

        if self.preorder().len() != self.nodes.len() {
            return Err(DiagramError::invalid_containment(
                "some nodes are not reachable from a root",
            ));
        }

        for (&id, edge) in &self.edges {
            for endpoint in [edge.start(), edge.end()] {
                match endpoint {
                    Some(node) => {
                        self.node_ref(node)?;
                    }
                    None => return Err(DiagramError::EdgeNotFound { id }),
                }
            }
        }
        Ok(())
    }

    /// Insert a node as a root without any point lookup
    pub(crate) fn insert_root(&mut self, mut node: Node) -> NodeId {
        node.detach();
        let id = self.allocate_node_id();
        self.nodes.insert(id, node);
        self.roots.push(id);
        self.refresh_chain(id);
        id
    }

    /// Insert a node directly under `parent` without any point lookup
    pub(crate) fn insert_child(
        &mut self,
        parent: NodeId,
        mut node: Node,
    ) -> Result<NodeId, DiagramError> {
        let parent_node = self.node_ref(parent)?;
        if !parent_node.kind().accepts_child(node.kind()) {
            return Err(DiagramError::invalid_containment(format!(
                "{} cannot contain {}",
                parent_node.type_name(),
                node.type_name()
            )));
        }
        node.detach();
        let id = self.allocate_node_id();
        self.nodes.insert(id, node);
        self.link(parent, id);
        self.refresh_chain(id);
        Ok(id)
    }

    /// Insert an edge whose endpoints are already resolved
    pub(crate) fn insert_edge(&mut self, edge: Edge) -> Result<EdgeId, DiagramError> {
        for endpoint in [edge.start(), edge.end()] {
            let endpoint = endpoint.ok_or_else(|| {
                DiagramError::invalid_containment("edge endpoints must be resolved")
            })?;
            self.node_ref(endpoint)?;
        }
        let id = self.allocate_edge_id();
        self.edges.insert(id, edge);
        self.refresh_edge(id);
        Ok(id)
    }

    pub(crate) fn refresh_edges(&mut self) {
        for edge in self.edges.values_mut() {
            let start = edge.start().and_then(|id| self.nodes.get(&id)).map(Node::bounds);
            let end = edge.end().and_then(|id| self.nodes.get(&id)).map(Node::bounds);
            if let (Some(start), Some(end)) = (start, end) {
                edge.refresh_view(start, end);
            }
        }
    }

    fn can_connect(&self, edge: &EdgeKind, start: &NodeKind, end: &NodeKind) -> bool {
        let generic = if edge.is_note() {
            (start.is_note() && end.is_point()) || (end.is_note() && !start.is_point())
        } else {
            !start.is_note() && !start.is_point() && !end.is_note() && !end.is_point()
        };
        generic && self.diagram_type.can_connect(edge, start, end)
    }

    fn node_ref(&self, id: NodeId) -> Result<&Node, DiagramError> {
        self.nodes.get(&id).ok_or(DiagramError::NodeNotFound { id })
    }

    fn allocate_node_id(&mut self) -> NodeId {
        self.next_node += 1;
        NodeId::new(self.next_node)
    }

    fn allocate_edge_id(&mut self) -> EdgeId {
        self.next_edge += 1;
        EdgeId::new(self.next_edge)
    }

    /// Deepest node under `point` satisfying `accept`, searching topmost first
    fn deepest_at(
        &self,
        ids: &[NodeId],
        point: Point,
        accept: &dyn Fn(&Node) -> bool,
    ) -> Option<NodeId> {
        for &id in ids.iter().rev() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if !node.view().contains(point) {
                continue;
            }
            if let Some(hit) = self.deepest_at(node.children(), point, accept) {
                return Some(hit);
            }
            if accept(node) {
                return Some(id);
            }
        }
        None
    }

    fn collect_preorder(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if let Some(node) = self.nodes.get(&id) {
            out.push(id);
            for &child in node.children() {
                self.collect_preorder(child, out);
            }
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.push_child(child);
        }
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.set_parent(Some(parent));
        }
    }

    /// Remove a node from its parent's child list or from the roots
    fn unlink(&mut self, id: NodeId) {
        let parent = self.nodes.get(&id).and_then(Node::parent);
        match parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.remove_child_id(id);
                }
                self.refresh_chain(parent);
            }
            None => self.roots.retain(|&root| root != id),
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.set_parent(None);
        }
    }

    fn refresh_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let children: Vec<Rectangle> = node
            .children()
            .iter()
            .filter_map(|child| self.nodes.get(child))
            .map(Node::bounds)
            .collect();
        if let Some(node) = self.nodes.get_mut(&id) {
            node.refresh_view(&children);
        }
    }

    /// Refresh a node and then each of its ancestors
    fn refresh_chain(&mut self, id: NodeId) {
        self.refresh_node(id);
        self.refresh_ancestors(id);
    }

    fn refresh_ancestors(&mut self, id: NodeId) {
        for ancestor in self.ancestors(id) {
            self.refresh_node(ancestor);
        }
    }

    /// Refresh a subtree bottom-up so containers see fresh child bounds
    fn refresh_subtree(&mut self, id: NodeId) {
        let mut order = vec![id];
        order.extend(self.descendants(id));
        for member in order.into_iter().rev() {
            self.refresh_node(member);
        }
    }

    fn refresh_edge(&mut self, id: EdgeId) {
        let Some(edge) = self.edges.get(&id) else {
            return;
        };
        let start = edge.start().and_then(|node| self.nodes.get(&node)).map(Node::bounds);
        let end = edge.end().and_then(|node| self.nodes.get(&node)).map(Node::bounds);
        if let (Some(start), Some(end), Some(edge)) = (start, end, self.edges.get_mut(&id)) {
            edge.refresh_view(start, end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Everything;

    impl DiagramType for Everything {
        fn name(&self) -> &'static str {
            "everything"
        }

        fn description(&self) -> &'static str {
            "Accepts every kind"
        }

        fn node_prototypes(&self) -> Vec<NodeKind> {
            vec![
                NodeKind::class(),
                NodeKind::package(),
                NodeKind::state(),
                NodeKind::InitialState,
            ]
        }

        fn edge_prototypes(&self) -> Vec<EdgeKind> {
            vec![EdgeKind::Dependency, EdgeKind::StateTransition]
        }
    }

    fn diagram() -> Diagram {
        Diagram::new(Arc::new(Everything))
    }

    #[test]
    fn test_add_node_as_root() {
        let mut diagram = diagram();
        let id = diagram.add_node(Node::class(), Point::new(10, 10)).unwrap();
        assert_eq!(diagram.root_nodes(), &[id]);
        assert_eq!(diagram.node(id).unwrap().position(), Point::new(10, 10));
        diagram.check_consistency().unwrap();
    }

    #[test]
    fn test_add_node_into_deepest_container() {
        let mut diagram = diagram();
        let outer = diagram.add_node(Node::package(), Point::new(0, 0)).unwrap();
        let inner = diagram.add_node(Node::package(), Point::new(10, 10)).unwrap();
        let class = diagram.add_node(Node::class(), Point::new(15, 15)).unwrap();

        assert_eq!(diagram.root_nodes(), &[outer]);
        assert_eq!(diagram.node(inner).unwrap().parent(), Some(outer));
        assert_eq!(diagram.node(class).unwrap().parent(), Some(inner));
        diagram.check_consistency().unwrap();

        let outer_bounds = diagram.node(outer).unwrap().bounds();
        let class_bounds = diagram.node(class).unwrap().bounds();
        assert!(outer_bounds.encloses(&class_bounds));
    }

    #[test]
    fn test_non_container_does_not_adopt() {
        let mut diagram = diagram();
        diagram.add_node(Node::class(), Point::new(0, 0)).unwrap();
        diagram.add_node(Node::class(), Point::new(5, 5)).unwrap();
        assert_eq!(diagram.root_nodes().len(), 2);
    }

    #[test]
    fn test_unsupported_node_is_rejected() {
        let mut diagram = diagram();
        let err = diagram.add_node(Node::object(), Point::new(0, 0)).unwrap_err();
        assert!(matches!(err, DiagramError::UnsupportedElement { .. }));
        assert!(diagram.is_empty());
    }

    #[test]
    fn test_add_edge_resolves_endpoints() {
        let mut diagram = diagram();
        let a = diagram.add_node(Node::class(), Point::new(0, 0)).unwrap();
        let b = diagram.add_node(Node::class(), Point::new(200, 0)).unwrap();
        let edge = diagram
            .add_edge(Edge::dependency(), Point::new(5, 5), Point::new(205, 5))
            .unwrap();
        let edge = diagram.edge(edge).unwrap();
        assert_eq!(edge.start(), Some(a));
        assert_eq!(edge.end(), Some(b));
        assert!(!edge.view().path().is_empty());
    }

    #[test]
    fn test_add_edge_over_empty_space_is_ignored() {
        let mut diagram = diagram();
        diagram.add_node(Node::class(), Point::new(0, 0)).unwrap();
        assert!(diagram
            .add_edge(Edge::dependency(), Point::new(5, 5), Point::new(500, 500))
            .is_none());
        assert_eq!(diagram.edge_count(), 0);
    }

    #[test]
    fn test_endpoints_survive_moves() {
        let mut diagram = diagram();
        let a = diagram.add_node(Node::state(), Point::new(0, 0)).unwrap();
        let b = diagram.add_node(Node::state(), Point::new(200, 0)).unwrap();
        let edge = diagram
            .add_edge(Edge::state_transition(), Point::new(1, 1), Point::new(201, 1))
            .unwrap();
        let before = diagram.edge(edge).unwrap().bounds();
        diagram.translate_node(b, 0, 300).unwrap();
        let after = diagram.edge(edge).unwrap();
        assert_eq!(after.start(), Some(a));
        assert_eq!(after.end(), Some(b));
        assert_ne!(after.bounds(), before);
    }

    #[test]
    fn test_duplicate_edges_are_allowed() {
        let mut diagram = diagram();
        diagram.add_node(Node::state(), Point::new(0, 0)).unwrap();
        diagram.add_node(Node::state(), Point::new(200, 0)).unwrap();
        for _ in 0..2 {
            diagram
                .add_edge(Edge::state_transition(), Point::new(1, 1), Point::new(201, 1))
                .unwrap();
        }
        assert_eq!(diagram.edge_count(), 2);
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut diagram = diagram();
        let outer = diagram.add_node(Node::package(), Point::new(0, 0)).unwrap();
        let inner = diagram.add_node(Node::package(), Point::new(10, 10)).unwrap();
        let err = diagram.add_child(inner, outer).unwrap_err();
        assert!(matches!(err, DiagramError::InvalidContainment { .. }));
        assert!(diagram.add_child(outer, outer).is_err());
        diagram.check_consistency().unwrap();
    }

    #[test]
    fn test_add_child_rejects_non_containers() {
        let mut diagram = diagram();
        let class = diagram.add_node(Node::class(), Point::new(0, 0)).unwrap();
        let other = diagram.add_node(Node::class(), Point::new(300, 0)).unwrap();
        assert!(diagram.add_child(class, other).is_err());
    }

    #[test]
    fn test_reparent_moves_between_parents() {
        let mut diagram = diagram();
        let first = diagram.add_node(Node::package(), Point::new(0, 0)).unwrap();
        let second = diagram.add_node(Node::package(), Point::new(500, 0)).unwrap();
        let class = diagram.add_node(Node::class(), Point::new(10, 30)).unwrap();
        assert_eq!(diagram.node(class).unwrap().parent(), Some(first));

        diagram.add_child(second, class).unwrap();
        assert!(diagram.node(first).unwrap().children().is_empty());
        assert_eq!(diagram.node(second).unwrap().children(), &[class]);
        diagram.check_consistency().unwrap();

        diagram.remove_child(second, class).unwrap();
        assert_eq!(diagram.root_nodes(), &[first, second, class]);
        assert!(diagram.remove_child(second, class).is_err());
        diagram.check_consistency().unwrap();
    }

    #[test]
    fn test_translate_moves_subtree() {
        let mut diagram = diagram();
        let package = diagram.add_node(Node::package(), Point::new(0, 0)).unwrap();
        let class = diagram.add_node(Node::class(), Point::new(10, 30)).unwrap();
        diagram.translate_node(package, 50, 50).unwrap();
        assert_eq!(diagram.node(class).unwrap().position(), Point::new(60, 80));
        let package_bounds = diagram.node(package).unwrap().bounds();
        assert!(package_bounds.encloses(&diagram.node(class).unwrap().bounds()));
    }

    #[test]
    fn test_moving_child_grows_parent() {
        let mut diagram = diagram();
        let package = diagram.add_node(Node::package(), Point::new(0, 0)).unwrap();
        let class = diagram.add_node(Node::class(), Point::new(10, 30)).unwrap();
        diagram.translate_node(class, 400, 0).unwrap();
        let package_bounds = diagram.node(package).unwrap().bounds();
        assert!(package_bounds.max_x() >= 510);
    }

    #[test]
    fn test_remove_node_removes_subtree_and_edges() {
        let mut diagram = diagram();
        let package = diagram.add_node(Node::package(), Point::new(0, 0)).unwrap();
        diagram.add_node(Node::class(), Point::new(10, 30)).unwrap();
        diagram.add_node(Node::class(), Point::new(400, 0)).unwrap();
        diagram
            .add_edge(Edge::dependency(), Point::new(15, 35), Point::new(405, 5))
            .unwrap();

        assert_eq!(diagram.remove_node(package).unwrap(), 2);
        assert_eq!(diagram.node_count(), 1);
        assert_eq!(diagram.edge_count(), 0);
        diagram.check_consistency().unwrap();
    }

    #[test]
    fn test_update_node_refreshes_views() {
        let mut diagram = diagram();
        let state = diagram.add_node(Node::state(), Point::new(0, 0)).unwrap();
        diagram
            .update_node(state, |node| {
                if let Some(name) = node.name_mut() {
                    name.set_text("A much longer state name than fits");
                }
            })
            .unwrap();
        assert!(diagram.node(state).unwrap().bounds().width() > 80);
    }

    #[test]
    fn test_missing_ids_are_errors() {
        let mut diagram = diagram();
        let ghost = NodeId::new(42);
        assert!(matches!(
            diagram.translate_node(ghost, 1, 1),
            Err(DiagramError::NodeNotFound { .. })
        ));
        assert!(matches!(
            diagram.remove_edge(EdgeId::new(3)),
            Err(DiagramError::EdgeNotFound { .. })
        ));
    }

    #[test]
    fn test_find_edge_on_path() {
        let mut diagram = diagram();
        diagram.add_node(Node::state(), Point::new(0, 0)).unwrap();
        diagram.add_node(Node::state(), Point::new(200, 0)).unwrap();
        let edge = diagram
            .add_edge(Edge::state_transition(), Point::new(1, 1), Point::new(201, 1))
            .unwrap();
        let midpoint = diagram.edge(edge).unwrap().bounds().center();
        assert_eq!(diagram.find_edge(midpoint), Some(edge));
        assert_eq!(diagram.find_edge(Point::new(100, 500)), None);
    }

    #[test]
    fn test_bounds_cover_roots() {
        let mut diagram = diagram();
        assert!(diagram.bounds().is_none());
        diagram.add_node(Node::state(), Point::new(0, 0)).unwrap();
        diagram.add_node(Node::state(), Point::new(200, 100)).unwrap();
        assert_eq!(diagram.bounds(), Some(Rectangle::new(0, 0, 280, 160)));
    }

    #[test]
    fn test_update_node_keeps_the_variant() {
        let mut diagram = diagram();
        let package = diagram.add_node(Node::package(), Point::new(0, 0)).unwrap();
        let class = diagram.add_node(Node::class(), Point::new(10, 30)).unwrap();

        let result = diagram
            .update_node(package, |node| node.set_kind(NodeKind::class()))
            .unwrap();
        assert!(result.is_err());

        let node = diagram.node(package).unwrap();
        assert_eq!(node.type_name(), "PackageNode");
        assert_eq!(node.children(), &[class]);
        diagram.check_consistency().unwrap();
    }

    #[test]
    fn test_update_node_replaces_attributes() {
        let mut diagram = diagram();
        let class = diagram.add_node(Node::class(), Point::new(0, 0)).unwrap();
        let mut kind = NodeKind::class();
        if let NodeKind::Class { methods, .. } = &mut kind {
            methods.set_text("run()\nstop()\nreset()\npause()");
        }

        diagram
            .update_node(class, |node| node.set_kind(kind))
            .unwrap()
            .unwrap();
        assert!(diagram.node(class).unwrap().bounds().height() > 60);
    }

    #[test]
    fn test_consistency_rejects_child_of_wrong_kind() {
        let mut diagram = diagram();
        let package = diagram.add_node(Node::package(), Point::new(0, 0)).unwrap();
        let state = diagram.add_node(Node::state(), Point::new(300, 300)).unwrap();

        diagram.roots.retain(|&id| id != state);
        diagram.nodes.get_mut(&state).unwrap().set_parent(Some(package));
        diagram.nodes.get_mut(&package).unwrap().push_child(state);

        let err = diagram.check_consistency().unwrap_err();
        assert!(err.to_string().contains("cannot contain"));
    }
}
