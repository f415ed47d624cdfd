//! Behavior shared by every diagram element

use super::{DiagramError, Properties, Rectangle, ValueExtractor};

/// Common contract of nodes and edges
///
/// `properties` and `initialize` form the persistence round-trip:
/// initializing a fresh element of the same kind from the snapshot of
/// another yields an equal element.
pub trait GraphElement {
    /// Name used by the persistence layer to identify the element kind
    fn type_name(&self) -> &'static str;

    /// Ordered snapshot of every persisted attribute
    fn properties(&self) -> Properties;

    /// Restore persisted attributes from `extractor`
    ///
    /// On error the element is left unchanged.
    fn initialize(&mut self, extractor: &dyn ValueExtractor) -> Result<(), DiagramError>;

    /// Bounds as computed by the element's view
    fn bounds(&self) -> Rectangle;
}
