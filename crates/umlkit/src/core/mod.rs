//! Core model of the diagram editor
//!
//! Geometry, property bags, labels and views at the bottom; nodes, edges
//! and the diagram aggregate on top of them; selection and clipboard as the
//! editing surface.

mod clipboard;
mod diagram;
mod diagram_type;
mod edge;
mod element;
mod error;
mod geometry;
mod label;
pub mod logging;
mod node;
mod properties;
mod selection;
pub mod view;

pub use clipboard::*;
pub use diagram::*;
pub use diagram_type::*;
pub use edge::*;
pub use element::*;
pub use error::*;
pub use geometry::*;
pub use label::*;
pub use logging::*;
pub use node::*;
pub use properties::*;
pub use selection::*;
pub use view::{ArrowHead, EdgeView, LineStyle, NodeView, SegmentationStyle};
