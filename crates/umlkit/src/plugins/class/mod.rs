//! Class diagram plugin
//!
//! Classes, interfaces and packages connected by dependencies,
//! associations, generalizations and aggregations.

mod diagram;

pub use diagram::ClassDiagram;
