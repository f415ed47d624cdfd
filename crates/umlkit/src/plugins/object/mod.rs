//! Object diagram plugin
//!
//! Objects connected by references and collaborations.

mod diagram;

pub use diagram::ObjectDiagram;
