//! State diagram plugin
//!
//! States with initial and final markers, connected by transitions.

mod diagram;

pub use diagram::StateDiagram;
