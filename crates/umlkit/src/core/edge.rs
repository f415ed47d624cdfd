//! Diagram edges
//!
//! An [`Edge`] connects two nodes of the same diagram. Endpoints are fixed
//! when the diagram accepts the edge and are never publicly mutable.

use std::fmt;
use std::str::FromStr;

use super::properties::parse_enum;
use super::view::{ArrowHead, EdgeView, LineStyle, SegmentationStyle, SegmentedEdgeView};
use super::{DiagramError, GraphElement, NodeId, Properties, Rectangle, ValueExtractor};

/// Identifier of an edge inside a diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u64);

impl EdgeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Navigability of an association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Directionality {
    #[default]
    None,
    Start,
    End,
    Both,
}

/// Whole-part flavor of an aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AggregationType {
    #[default]
    Aggregation,
    Composition,
}

/// Flavor of a generalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeneralizationType {
    #[default]
    Inheritance,
    Implementation,
}

macro_rules! named_constants {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($ty::$variant => f.write_str(stringify!($variant)),)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($ty::$variant),)+
                    _ => Err(()),
                }
            }
        }
    };
}

named_constants!(Directionality { None, Start, End, Both });
named_constants!(AggregationType { Aggregation, Composition });
named_constants!(GeneralizationType {
    Inheritance,
    Implementation
});

/// The kind of an edge together with its kind-specific attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Dependency,
    Association { directionality: Directionality },
    Generalization { generalization: GeneralizationType },
    Aggregation { aggregation: AggregationType },
    /// Links a note to the element it annotates
    Note,
    StateTransition,
    ObjectReference,
    ObjectCollaboration,
}

impl EdgeKind {
    pub fn association() -> Self {
        EdgeKind::Association {
            directionality: Directionality::default(),
        }
    }

    pub fn generalization() -> Self {
        EdgeKind::Generalization {
            generalization: GeneralizationType::default(),
        }
    }

    pub fn implementation() -> Self {
        EdgeKind::Generalization {
            generalization: GeneralizationType::Implementation,
        }
    }

    pub fn aggregation() -> Self {
        EdgeKind::Aggregation {
            aggregation: AggregationType::default(),
        }
    }

    pub fn composition() -> Self {
        EdgeKind::Aggregation {
            aggregation: AggregationType::Composition,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            EdgeKind::Dependency => "DependencyEdge",
            EdgeKind::Association { .. } => "AssociationEdge",
            EdgeKind::Generalization { .. } => "GeneralizationEdge",
            EdgeKind::Aggregation { .. } => "AggregationEdge",
            EdgeKind::Note => "NoteEdge",
            EdgeKind::StateTransition => "StateTransitionEdge",
            EdgeKind::ObjectReference => "ObjectReferenceEdge",
            EdgeKind::ObjectCollaboration => "ObjectCollaborationEdge",
        }
    }

    pub fn from_type_name(type_name: &str) -> Option<Self> {
        let kind = match type_name {
            "DependencyEdge" => EdgeKind::Dependency,
            "AssociationEdge" => EdgeKind::association(),
            "GeneralizationEdge" => EdgeKind::generalization(),
            "AggregationEdge" => EdgeKind::aggregation(),
            "NoteEdge" => EdgeKind::Note,
            "StateTransitionEdge" => EdgeKind::StateTransition,
            "ObjectReferenceEdge" => EdgeKind::ObjectReference,
            "ObjectCollaborationEdge" => EdgeKind::ObjectCollaboration,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_note(&self) -> bool {
        matches!(self, EdgeKind::Note)
    }

    /// Kinds of the same variant share one type regardless of attributes
    pub fn same_type(&self, other: &EdgeKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn line_style(&self) -> LineStyle {
        match self {
            EdgeKind::Dependency | EdgeKind::Note => LineStyle::Dotted,
            EdgeKind::Generalization {
                generalization: GeneralizationType::Implementation,
            } => LineStyle::Dotted,
            _ => LineStyle::Solid,
        }
    }

    pub fn start_arrow(&self) -> ArrowHead {
        match self {
            EdgeKind::Association { directionality } => match directionality {
                Directionality::Start | Directionality::Both => ArrowHead::V,
                Directionality::None | Directionality::End => ArrowHead::None,
            },
            EdgeKind::Aggregation { aggregation } => match aggregation {
                AggregationType::Aggregation => ArrowHead::Diamond,
                AggregationType::Composition => ArrowHead::BlackDiamond,
            },
            _ => ArrowHead::None,
        }
    }

    pub fn end_arrow(&self) -> ArrowHead {
        match self {
            EdgeKind::Dependency | EdgeKind::StateTransition | EdgeKind::ObjectReference => {
                ArrowHead::V
            }
            EdgeKind::Association { directionality } => match directionality {
                Directionality::End | Directionality::Both => ArrowHead::V,
                Directionality::None | Directionality::Start => ArrowHead::None,
            },
            EdgeKind::Generalization { .. } => ArrowHead::Triangle,
            EdgeKind::Aggregation { .. } | EdgeKind::Note | EdgeKind::ObjectCollaboration => {
                ArrowHead::None
            }
        }
    }

    pub fn segmentation(&self) -> SegmentationStyle {
        match self {
            EdgeKind::Association { .. } | EdgeKind::Aggregation { .. } => SegmentationStyle::Hvh,
            EdgeKind::Generalization { .. } => SegmentationStyle::Vhv,
            _ => SegmentationStyle::Straight,
        }
    }

    /// Creates a fresh view for this kind
    pub fn generate_view(&self) -> Box<dyn EdgeView> {
        Box::new(SegmentedEdgeView::new(self.segmentation()))
    }

    fn write_properties(&self, properties: &mut Properties) {
        match self {
            EdgeKind::Association { directionality } => {
                properties.put_enum("directionality", directionality)
            }
            EdgeKind::Aggregation { aggregation } => {
                properties.put_enum("aggregationType", aggregation)
            }
            EdgeKind::Generalization { generalization } => {
                properties.put_enum("generalizationType", generalization)
            }
            _ => {}
        }
    }

    fn read_properties(&mut self, extractor: &dyn ValueExtractor) -> Result<(), DiagramError> {
        match self {
            EdgeKind::Association { directionality } => {
                let name = extractor.get_enum_name("directionality")?;
                *directionality = parse_enum("directionality", &name)?;
            }
            EdgeKind::Aggregation { aggregation } => {
                let name = extractor.get_enum_name("aggregationType")?;
                *aggregation = parse_enum("aggregationType", &name)?;
            }
            EdgeKind::Generalization { generalization } => {
                let name = extractor.get_enum_name("generalizationType")?;
                *generalization = parse_enum("generalizationType", &name)?;
            }
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// A connection between two nodes, with up to three text labels
#[derive(Debug)]
pub struct Edge {
    kind: EdgeKind,
    start: Option<NodeId>,
    end: Option<NodeId>,
    start_label: String,
    middle_label: String,
    end_label: String,
    view: Box<dyn EdgeView>,
}

impl Edge {
    pub fn new(kind: EdgeKind) -> Self {
        Self {
            kind,
            start: None,
            end: None,
            start_label: String::new(),
            middle_label: String::new(),
            end_label: String::new(),
            view: kind.generate_view(),
        }
    }

    pub fn dependency() -> Self {
        Self::new(EdgeKind::Dependency)
    }

    pub fn association() -> Self {
        Self::new(EdgeKind::association())
    }

    pub fn generalization() -> Self {
        Self::new(EdgeKind::generalization())
    }

    pub fn aggregation() -> Self {
        Self::new(EdgeKind::aggregation())
    }

    pub fn note() -> Self {
        Self::new(EdgeKind::Note)
    }

    pub fn state_transition() -> Self {
        Self::new(EdgeKind::StateTransition)
    }

    pub fn object_reference() -> Self {
        Self::new(EdgeKind::ObjectReference)
    }

    pub fn object_collaboration() -> Self {
        Self::new(EdgeKind::ObjectCollaboration)
    }

    pub fn with_middle_label(mut self, label: impl Into<String>) -> Self {
        self.middle_label = label.into();
        self
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Change the attributes of the kind; the variant itself is fixed
    pub fn set_kind(&mut self, kind: EdgeKind) -> Result<(), DiagramError> {
        if !self.kind.same_type(&kind) {
            return Err(DiagramError::malformed_value(
                "kind",
                format!("cannot turn a {} into a {}", self.kind, kind),
            ));
        }
        self.kind = kind;
        Ok(())
    }

    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    pub fn end(&self) -> Option<NodeId> {
        self.end
    }

    pub fn start_label(&self) -> &str {
        &self.start_label
    }

    pub fn middle_label(&self) -> &str {
        &self.middle_label
    }

    pub fn end_label(&self) -> &str {
        &self.end_label
    }

    pub fn set_start_label(&mut self, label: impl Into<String>) {
        self.start_label = label.into();
    }

    pub fn set_middle_label(&mut self, label: impl Into<String>) {
        self.middle_label = label.into();
    }

    pub fn set_end_label(&mut self, label: impl Into<String>) {
        self.end_label = label.into();
    }

    pub fn line_style(&self) -> LineStyle {
        self.kind.line_style()
    }

    pub fn start_arrow(&self) -> ArrowHead {
        self.kind.start_arrow()
    }

    pub fn end_arrow(&self) -> ArrowHead {
        self.kind.end_arrow()
    }

    pub fn view(&self) -> &dyn EdgeView {
        self.view.as_ref()
    }

    pub(crate) fn attach(&mut self, start: NodeId, end: NodeId) {
        self.start = Some(start);
        self.end = Some(end);
    }

    pub(crate) fn refresh_view(&mut self, start: Rectangle, end: Rectangle) {
        self.view.refresh(start, end);
    }
}

impl Clone for Edge {
    /// Copy kind and labels into an edge with a fresh view
    ///
    /// Endpoints still name the original nodes; the container that owns
    /// the clone rewires them.
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            start: self.start,
            end: self.end,
            start_label: self.start_label.clone(),
            middle_label: self.middle_label.clone(),
            end_label: self.end_label.clone(),
            view: self.kind.generate_view(),
        }
    }
}

/// Edges compare equal on persisted attributes; endpoints are identity
impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.start_label == other.start_label
            && self.middle_label == other.middle_label
            && self.end_label == other.end_label
    }
}

impl GraphElement for Edge {
    fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    fn properties(&self) -> Properties {
        let mut properties = Properties::new();
        properties.put("startLabel", self.start_label.as_str());
        properties.put("middleLabel", self.middle_label.as_str());
        properties.put("endLabel", self.end_label.as_str());
        self.kind.write_properties(&mut properties);
        properties
    }

    fn initialize(&mut self, extractor: &dyn ValueExtractor) -> Result<(), DiagramError> {
        let start_label = extractor.get_string("startLabel")?;
        let middle_label = extractor.get_string("middleLabel")?;
        let end_label = extractor.get_string("endLabel")?;
        let mut kind = self.kind;
        kind.read_properties(extractor)?;
        self.start_label = start_label;
        self.middle_label = middle_label;
        self.end_label = end_label;
        self.kind = kind;
        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.view.bounds()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.type_name())?;
        if let (Some(start), Some(end)) = (self.start, self.end) {
            write!(f, " {} -> {}", start, end)?;
        }
        if !self.middle_label.is_empty() {
            write!(f, " \"{}\"", self.middle_label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PropertyValue;

    #[test]
    fn test_new_edge_is_unattached() {
        let edge = Edge::dependency();
        assert!(edge.start().is_none());
        assert!(edge.end().is_none());
        assert!(edge.view().path().is_empty());
    }

    #[test]
    fn test_properties_order_base_first() {
        let edge = Edge::association();
        let props = edge.properties();
        let keys: Vec<&str> = props.keys().collect();
        assert_eq!(
            keys,
            vec!["startLabel", "middleLabel", "endLabel", "directionality"]
        );
    }

    #[test]
    fn test_enum_attributes_are_persisted_by_name() {
        let edge = Edge::new(EdgeKind::composition());
        let properties = edge.properties();
        assert_eq!(
            properties.value("aggregationType"),
            Some(&PropertyValue::Enum("Composition".to_string()))
        );
    }

    #[test]
    fn test_round_trip() {
        let mut original = Edge::new(EdgeKind::Association {
            directionality: Directionality::Both,
        });
        original.set_start_label("1");
        original.set_middle_label("owns");
        original.set_end_label("*");

        let mut restored = Edge::association();
        restored.initialize(&original.properties()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_unknown_enum_constant_is_rejected() {
        let mut properties = Edge::generalization().properties();
        properties.put_enum("generalizationType", "Realization");
        let mut edge = Edge::generalization();
        let err = edge.initialize(&properties).unwrap_err();
        assert!(err.to_string().contains("Realization"));
        assert_eq!(edge.kind(), EdgeKind::generalization());
    }

    #[test]
    fn test_clone_keeps_endpoints_and_gets_fresh_view() {
        let mut edge = Edge::state_transition().with_middle_label("go");
        edge.attach(NodeId::new(1), NodeId::new(2));
        let clone = edge.clone();
        assert_eq!(clone, edge);
        assert_eq!(clone.start(), Some(NodeId::new(1)));
        assert_eq!(clone.end(), Some(NodeId::new(2)));
        assert!(!std::ptr::addr_eq(edge.view(), clone.view()));
    }

    #[test]
    fn test_arrow_heads_follow_kind() {
        let both = EdgeKind::Association {
            directionality: Directionality::Both,
        };
        assert_eq!(both.start_arrow(), ArrowHead::V);
        assert_eq!(both.end_arrow(), ArrowHead::V);
        assert_eq!(EdgeKind::composition().start_arrow(), ArrowHead::BlackDiamond);
        assert_eq!(EdgeKind::implementation().line_style(), LineStyle::Dotted);
        assert_eq!(EdgeKind::generalization().line_style(), LineStyle::Solid);
        assert_eq!(EdgeKind::Note.end_arrow(), ArrowHead::None);
    }

    #[test]
    fn test_set_kind_keeps_variant() {
        let mut edge = Edge::aggregation();
        edge.set_kind(EdgeKind::composition()).unwrap();
        assert_eq!(edge.start_arrow(), ArrowHead::BlackDiamond);
        assert!(edge.set_kind(EdgeKind::Dependency).is_err());
    }

    #[test]
    fn test_refresh_routes_between_bounds() {
        let mut edge = Edge::state_transition();
        edge.refresh_view(Rectangle::new(0, 0, 10, 10), Rectangle::new(100, 0, 10, 10));
        assert_eq!(edge.view().path().len(), 2);
        assert!(edge.bounds().width() > 0);
    }
}
