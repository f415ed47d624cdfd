//! Diagram nodes
//!
//! A [`Node`] combines a [`NodeKind`] (the per-kind attributes), a position,
//! containment links and an owned [`NodeView`]. Containment links are only
//! ever changed by the [`Diagram`](super::Diagram) that stores the node, so
//! the parent and child lists of nodes inside a diagram stay consistent.

use std::fmt;

use super::view::{CircleNodeView, NodeView, PackageNodeView, PointNodeView, RectangleNodeView};
use super::{
    DiagramError, Dimension, GraphElement, MultiLineString, Point, Properties, Rectangle,
    ValueExtractor,
};

/// Default size of class and interface boxes
pub const CLASS_SIZE: Dimension = Dimension::new(100, 60);
/// Default size of package boxes, tab included
pub const PACKAGE_SIZE: Dimension = Dimension::new(100, 80);
/// Default size of note boxes
pub const NOTE_SIZE: Dimension = Dimension::new(60, 40);
/// Default size of state boxes
pub const STATE_SIZE: Dimension = Dimension::new(80, 60);
/// Default size of object boxes
pub const OBJECT_SIZE: Dimension = Dimension::new(80, 60);
/// Diameter of initial and final state markers
pub const STATE_MARKER_DIAMETER: i32 = 20;

/// Identifier of a node inside a diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value, for logging
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// The kind of a node together with its kind-specific attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Class {
        name: MultiLineString,
        attributes: MultiLineString,
        methods: MultiLineString,
    },
    Interface {
        name: MultiLineString,
        methods: MultiLineString,
    },
    Package {
        name: MultiLineString,
        contents: MultiLineString,
    },
    Note {
        text: MultiLineString,
    },
    /// Zero-size anchor for a free edge endpoint
    Point,
    State {
        name: MultiLineString,
    },
    InitialState,
    FinalState,
    Object {
        name: MultiLineString,
    },
}

impl NodeKind {
    pub fn class() -> Self {
        NodeKind::Class {
            name: MultiLineString::bold(),
            attributes: MultiLineString::left_aligned(),
            methods: MultiLineString::left_aligned(),
        }
    }

    pub fn interface() -> Self {
        NodeKind::Interface {
            name: MultiLineString::bold().with_text("\u{ab}interface\u{bb}"),
            methods: MultiLineString::left_aligned(),
        }
    }

    pub fn package() -> Self {
        NodeKind::Package {
            name: MultiLineString::new(),
            contents: MultiLineString::new(),
        }
    }

    pub fn note() -> Self {
        NodeKind::Note {
            text: MultiLineString::new(),
        }
    }

    pub fn state() -> Self {
        NodeKind::State {
            name: MultiLineString::new(),
        }
    }

    pub fn object() -> Self {
        NodeKind::Object {
            name: MultiLineString::underlined(),
        }
    }

    /// Name used by the persistence layer to identify the kind
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Class { .. } => "ClassNode",
            NodeKind::Interface { .. } => "InterfaceNode",
            NodeKind::Package { .. } => "PackageNode",
            NodeKind::Note { .. } => "NoteNode",
            NodeKind::Point => "PointNode",
            NodeKind::State { .. } => "StateNode",
            NodeKind::InitialState => "InitialStateNode",
            NodeKind::FinalState => "FinalStateNode",
            NodeKind::Object { .. } => "ObjectNode",
        }
    }

    /// Default-valued kind for a persisted type name
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        let kind = match type_name {
            "ClassNode" => NodeKind::class(),
            "InterfaceNode" => NodeKind::interface(),
            "PackageNode" => NodeKind::package(),
            "NoteNode" => NodeKind::note(),
            "PointNode" => NodeKind::Point,
            "StateNode" => NodeKind::state(),
            "InitialStateNode" => NodeKind::InitialState,
            "FinalStateNode" => NodeKind::FinalState,
            "ObjectNode" => NodeKind::object(),
            _ => return None,
        };
        Some(kind)
    }

    /// Returns true if both kinds are the same variant
    pub fn same_type(&self, other: &NodeKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Returns true if nodes of this kind may hold children
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Package { .. })
    }

    /// Returns true if this kind accepts `child` as a direct child
    pub fn accepts_child(&self, child: &NodeKind) -> bool {
        match self {
            NodeKind::Package { .. } => matches!(
                child,
                NodeKind::Class { .. } | NodeKind::Interface { .. } | NodeKind::Package { .. }
            ),
            _ => false,
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, NodeKind::Note { .. })
    }

    pub fn is_point(&self) -> bool {
        matches!(self, NodeKind::Point)
    }

    /// The primary label of the kind, if it has one
    pub fn name(&self) -> Option<&MultiLineString> {
        match self {
            NodeKind::Class { name, .. }
            | NodeKind::Interface { name, .. }
            | NodeKind::Package { name, .. }
            | NodeKind::State { name }
            | NodeKind::Object { name } => Some(name),
            NodeKind::Note { text } => Some(text),
            NodeKind::Point | NodeKind::InitialState | NodeKind::FinalState => None,
        }
    }

    pub fn name_mut(&mut self) -> Option<&mut MultiLineString> {
        match self {
            NodeKind::Class { name, .. }
            | NodeKind::Interface { name, .. }
            | NodeKind::Package { name, .. }
            | NodeKind::State { name }
            | NodeKind::Object { name } => Some(name),
            NodeKind::Note { text } => Some(text),
            NodeKind::Point | NodeKind::InitialState | NodeKind::FinalState => None,
        }
    }

    /// Creates a fresh view for this kind
    pub fn generate_view(&self) -> Box<dyn NodeView> {
        match self {
            NodeKind::Class { .. } | NodeKind::Interface { .. } => {
                Box::new(RectangleNodeView::new(CLASS_SIZE))
            }
            NodeKind::Package { .. } => Box::new(PackageNodeView::new(PACKAGE_SIZE)),
            NodeKind::Note { .. } => Box::new(RectangleNodeView::new(NOTE_SIZE)),
            NodeKind::Point => Box::new(PointNodeView::new()),
            NodeKind::State { .. } => Box::new(RectangleNodeView::new(STATE_SIZE)),
            NodeKind::InitialState | NodeKind::FinalState => {
                Box::new(CircleNodeView::new(STATE_MARKER_DIAMETER))
            }
            NodeKind::Object { .. } => Box::new(RectangleNodeView::new(OBJECT_SIZE)),
        }
    }

    /// Measured size of the text compartments, stacked vertically
    fn content_size(&self) -> Dimension {
        let labels: Vec<&MultiLineString> = match self {
            NodeKind::Class {
                name,
                attributes,
                methods,
            } => vec![name, attributes, methods],
            NodeKind::Interface { name, methods } => vec![name, methods],
            NodeKind::Package { contents, .. } => vec![contents],
            NodeKind::Note { text } => vec![text],
            NodeKind::State { name } | NodeKind::Object { name } => vec![name],
            NodeKind::Point | NodeKind::InitialState | NodeKind::FinalState => Vec::new(),
        };
        labels
            .into_iter()
            .map(MultiLineString::dimension)
            .fold(Dimension::default(), |acc, size| {
                Dimension::new(acc.width.max(size.width), acc.height + size.height)
            })
    }

    fn write_properties(&self, properties: &mut Properties) {
        match self {
            NodeKind::Class {
                name,
                attributes,
                methods,
            } => {
                properties.put("name", name.text());
                properties.put("attributes", attributes.text());
                properties.put("methods", methods.text());
            }
            NodeKind::Interface { name, methods } => {
                properties.put("name", name.text());
                properties.put("methods", methods.text());
            }
            NodeKind::Package { name, contents } => {
                properties.put("name", name.text());
                properties.put("contents", contents.text());
            }
            NodeKind::Note { text } => properties.put("name", text.text()),
            NodeKind::State { name } | NodeKind::Object { name } => {
                properties.put("name", name.text())
            }
            NodeKind::Point | NodeKind::InitialState | NodeKind::FinalState => {}
        }
    }

    fn read_properties(&mut self, extractor: &dyn ValueExtractor) -> Result<(), DiagramError> {
        match self {
            NodeKind::Class {
                name,
                attributes,
                methods,
            } => {
                name.set_text(extractor.get_string("name")?);
                attributes.set_text(extractor.get_string("attributes")?);
                methods.set_text(extractor.get_string("methods")?);
            }
            NodeKind::Interface { name, methods } => {
                name.set_text(extractor.get_string("name")?);
                methods.set_text(extractor.get_string("methods")?);
            }
            NodeKind::Package { name, contents } => {
                name.set_text(extractor.get_string("name")?);
                contents.set_text(extractor.get_string("contents")?);
            }
            NodeKind::Note { text } => text.set_text(extractor.get_string("name")?),
            NodeKind::State { name } | NodeKind::Object { name } => {
                name.set_text(extractor.get_string("name")?)
            }
            NodeKind::Point | NodeKind::InitialState | NodeKind::FinalState => {}
        }
        Ok(())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// A diagram element with a position, an owned view and optional containment
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    position: Point,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    view: Box<dyn NodeView>,
}

impl Node {
    /// Create a node of the given kind at the origin
    pub fn new(kind: NodeKind) -> Self {
        let view = kind.generate_view();
        let mut node = Self {
            kind,
            position: Point::default(),
            parent: None,
            children: Vec::new(),
            view,
        };
        node.refresh_view(&[]);
        node
    }

    pub fn class() -> Self {
        Self::new(NodeKind::class())
    }

    pub fn interface() -> Self {
        Self::new(NodeKind::interface())
    }

    pub fn package() -> Self {
        Self::new(NodeKind::package())
    }

    pub fn note() -> Self {
        Self::new(NodeKind::note())
    }

    pub fn point() -> Self {
        Self::new(NodeKind::Point)
    }

    pub fn state() -> Self {
        Self::new(NodeKind::state())
    }

    pub fn initial_state() -> Self {
        Self::new(NodeKind::InitialState)
    }

    pub fn final_state() -> Self {
        Self::new(NodeKind::FinalState)
    }

    pub fn object() -> Self {
        Self::new(NodeKind::object())
    }

    /// Set the primary label; kinds without a label are left unchanged
    pub fn with_name(mut self, text: impl Into<String>) -> Self {
        if let Some(name) = self.kind.name_mut() {
            name.set_text(text);
        }
        self.refresh_view(&[]);
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Replace the attributes of the kind; the variant itself is fixed
    pub fn set_kind(&mut self, kind: NodeKind) -> Result<(), DiagramError> {
        if !self.kind.same_type(&kind) {
            return Err(DiagramError::malformed_value(
                "kind",
                format!("cannot turn a {} into a {}", self.kind, kind),
            ));
        }
        self.kind = kind;
        self.refresh_view(&[]);
        Ok(())
    }

    /// Mutable access to the primary label; the diagram refreshes the view
    pub fn name_mut(&mut self) -> Option<&mut MultiLineString> {
        self.kind.name_mut()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Move the node by a relative offset
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.position = self.position.translated(dx, dy);
        // Containers are refreshed again with their child bounds by the diagram
        self.refresh_view(&[]);
    }

    /// Move the node to an absolute position
    pub fn move_to(&mut self, point: Point) {
        let dx = point.x() - self.position.x();
        let dy = point.y() - self.position.y();
        self.translate(dx, dy);
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn view(&self) -> &dyn NodeView {
        self.view.as_ref()
    }

    pub(crate) fn refresh_view(&mut self, children: &[Rectangle]) {
        let content = self.kind.content_size();
        self.view.refresh(self.position, content, children);
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child_id(&mut self, child: NodeId) -> bool {
        let before = self.children.len();
        self.children.retain(|&id| id != child);
        self.children.len() != before
    }

    /// Drop every containment link
    pub(crate) fn detach(&mut self) {
        self.parent = None;
        self.children.clear();
    }
}

impl Clone for Node {
    /// Copy the attributes into an independent node with a fresh view
    ///
    /// Labels are deep-copied. Containment links are not: the clone is
    /// detached, and whoever clones a subtree rebuilds the links between
    /// the clones.
    fn clone(&self) -> Self {
        let kind = self.kind.clone();
        let view = kind.generate_view();
        let mut clone = Self {
            kind,
            position: self.position,
            parent: None,
            children: Vec::new(),
            view,
        };
        clone.refresh_view(&[]);
        clone
    }
}

/// Nodes compare equal on kind, labels and position; containment is identity
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.position == other.position
    }
}

impl GraphElement for Node {
    fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    fn properties(&self) -> Properties {
        let mut properties = Properties::new();
        properties.put("x", self.position.x());
        properties.put("y", self.position.y());
        self.kind.write_properties(&mut properties);
        properties
    }

    fn initialize(&mut self, extractor: &dyn ValueExtractor) -> Result<(), DiagramError> {
        let x = extractor.get_int("x")?;
        let y = extractor.get_int("y")?;
        let mut kind = self.kind.clone();
        kind.read_properties(extractor)?;
        self.kind = kind;
        self.position = Point::new(x, y);
        self.refresh_view(&[]);
        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.view.bounds()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.type_name(), self.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_sits_at_origin_with_default_bounds() {
        let node = Node::state();
        assert_eq!(node.position(), Point::new(0, 0));
        assert_eq!(node.bounds(), Rectangle::new(0, 0, 80, 60));
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_translate_and_move_to_update_view() {
        let mut node = Node::class();
        node.translate(10, 20);
        assert_eq!(node.position(), Point::new(10, 20));
        assert_eq!(node.bounds(), Rectangle::new(10, 20, 100, 60));
        node.move_to(Point::new(-5, 7));
        assert_eq!(node.position(), Point::new(-5, 7));
        assert_eq!(node.bounds().origin(), Point::new(-5, 7));
    }

    #[test]
    fn test_marker_sizes() {
        assert_eq!(Node::initial_state().bounds(), Rectangle::new(0, 0, 20, 20));
        assert_eq!(Node::final_state().bounds(), Rectangle::new(0, 0, 20, 20));
        assert_eq!(Node::point().bounds(), Rectangle::new(0, 0, 0, 0));
    }

    #[test]
    fn test_long_names_widen_the_box() {
        let node = Node::state().with_name("A considerably longer state name");
        assert!(node.bounds().width() > STATE_SIZE.width);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = Node::class().with_name("Original");
        original.translate(5, 5);
        let mut clone = original.clone();
        assert_eq!(clone, original);
        assert!(!std::ptr::addr_eq(original.view(), clone.view()));

        clone.translate(100, 0);
        clone.name_mut().unwrap().set_text("Clone");
        assert_eq!(original.position(), Point::new(5, 5));
        assert_eq!(original.kind().name().unwrap().text(), "Original");

        original.translate(0, 50);
        assert_eq!(clone.position(), Point::new(105, 5));
    }

    #[test]
    fn test_clone_drops_containment() {
        let mut node = Node::package();
        node.set_parent(Some(NodeId::new(1)));
        node.push_child(NodeId::new(2));
        let clone = node.clone();
        assert!(clone.parent().is_none());
        assert!(clone.children().is_empty());
    }

    #[test]
    fn test_properties_order_base_first() {
        let node = Node::class().with_name("Foo");
        let props = node.properties();
        let keys: Vec<&str> = props.keys().collect();
        assert_eq!(keys, vec!["x", "y", "name", "attributes", "methods"]);
    }

    #[test]
    fn test_round_trip() {
        let mut original = Node::package().with_name("util");
        original.translate(12, 34);
        let mut restored = Node::package();
        restored.initialize(&original.properties()).unwrap();
        assert_eq!(restored, original);
        assert_eq!(restored.bounds(), original.bounds());
    }

    #[test]
    fn test_initialize_missing_key_fails() {
        let mut properties = Properties::new();
        properties.put("x", 1);
        let mut node = Node::state();
        let err = node.initialize(&properties).unwrap_err();
        assert!(matches!(err, DiagramError::MalformedValue { ref key, .. } if key == "y"));
    }

    #[test]
    fn test_type_names_round_trip() {
        for kind in [
            NodeKind::class(),
            NodeKind::interface(),
            NodeKind::package(),
            NodeKind::note(),
            NodeKind::Point,
            NodeKind::state(),
            NodeKind::InitialState,
            NodeKind::FinalState,
            NodeKind::object(),
        ] {
            assert_eq!(NodeKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(NodeKind::from_type_name("SequenceNode"), None);
    }

    #[test]
    fn test_only_packages_accept_children() {
        let package = NodeKind::package();
        assert!(package.accepts_child(&NodeKind::class()));
        assert!(package.accepts_child(&NodeKind::package()));
        assert!(!package.accepts_child(&NodeKind::note()));
        assert!(!NodeKind::class().accepts_child(&NodeKind::class()));
    }
}
