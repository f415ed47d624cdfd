//! Diagram type plugins
//!
//! Each plugin implements [`DiagramType`](crate::core::DiagramType) for one
//! kind of UML diagram. The registry looks them up by name.

#[cfg(feature = "class")]
pub mod class;
#[cfg(feature = "object")]
pub mod object;
pub mod registry;
#[cfg(feature = "state")]
pub mod state;

#[cfg(feature = "class")]
pub use class::*;
#[cfg(feature = "object")]
pub use object::*;
pub use registry::*;
#[cfg(feature = "state")]
pub use state::*;
