//! umlkit - The graph element model of a UML diagram editor
//!
//! Nodes and edges form class, state and object diagrams. Every element
//! owns a view that computes its bounds, describes itself as an ordered
//! property bag for persistence, and can be deep-cloned for copy and paste.
//!
//! # Quick Start
//!
//! ```rust
//! use umlkit::prelude::*;
//!
//! let mut diagram = umlkit::new_diagram("state").unwrap();
//! let idle = diagram.add_node(Node::state().with_name("Idle"), Point::new(30, 30)).unwrap();
//! let busy = diagram.add_node(Node::state().with_name("Busy"), Point::new(30, 130)).unwrap();
//! let edge = diagram
//!     .add_edge(Edge::state_transition(), Point::new(35, 35), Point::new(35, 135))
//!     .unwrap();
//!
//! assert_eq!(diagram.edge(edge).unwrap().start(), Some(idle));
//! assert_eq!(diagram.edge(edge).unwrap().end(), Some(busy));
//! ```
//!
//! # Copy and Paste
//!
//! ```rust
//! use umlkit::prelude::*;
//!
//! let mut diagram = ClassDiagram::create();
//! let package = diagram.add_node(Node::package(), Point::new(20, 20)).unwrap();
//! diagram.add_node(Node::class(), Point::new(25, 45)).unwrap();
//!
//! let mut selection = SelectionList::new();
//! selection.add(package);
//!
//! let mut clipboard = Clipboard::default();
//! clipboard.copy(&diagram, &selection);
//! clipboard.paste(&mut diagram).unwrap();
//!
//! assert_eq!(diagram.root_nodes().len(), 2);
//! assert_eq!(diagram.node_count(), 4);
//! ```

pub mod core;
pub mod plugins;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Clipboard, ClipboardConfig, Diagram, DiagramError, DiagramType, Edge, EdgeId, EdgeKind,
        ElementRef, GraphElement, Node, NodeId, NodeKind, Point, Properties, PropertyValue,
        Rectangle, SelectionList, ValueExtractor,
    };
    #[cfg(feature = "class")]
    pub use crate::plugins::ClassDiagram;
    #[cfg(feature = "object")]
    pub use crate::plugins::ObjectDiagram;
    pub use crate::plugins::DiagramRegistry;
    #[cfg(feature = "state")]
    pub use crate::plugins::StateDiagram;
}

/// Create an empty diagram of a registered type
///
/// # Example
/// ```rust
/// let diagram = umlkit::new_diagram("class").unwrap();
/// assert!(diagram.is_empty());
/// assert!(umlkit::new_diagram("sequence").is_err());
/// ```
pub fn new_diagram(name: &str) -> anyhow::Result<Diagram> {
    let registry = plugins::DiagramRegistry::with_all_plugins();
    Ok(registry.create_diagram(name)?)
}
