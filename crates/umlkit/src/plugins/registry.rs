//! Registry of diagram types
//!
//! Maps registry names such as `class` to their [`DiagramType`] and creates
//! empty diagrams by name.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::{Diagram, DiagramError, DiagramType};

/// Diagram types available to an application, in registration order
#[derive(Debug, Default, Clone)]
pub struct DiagramRegistry {
    types: IndexMap<&'static str, Arc<dyn DiagramType>>,
}

impl DiagramRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every plugin enabled at compile time
    pub fn with_all_plugins() -> Self {
        let mut registry = Self::new();
        #[cfg(feature = "class")]
        registry.register(Arc::new(crate::plugins::class::ClassDiagram::new()));
        #[cfg(feature = "state")]
        registry.register(Arc::new(crate::plugins::state::StateDiagram::new()));
        #[cfg(feature = "object")]
        registry.register(Arc::new(crate::plugins::object::ObjectDiagram::new()));
        registry
    }

    /// Register a diagram type, replacing any type of the same name
    pub fn register(&mut self, diagram_type: Arc<dyn DiagramType>) {
        let name = diagram_type.name();
        if self.types.insert(name, diagram_type).is_some() {
            warn!(diagram_type = name, "Replaced registered diagram type");
        } else {
            debug!(diagram_type = name, "Registered diagram type");
        }
    }

    /// Look up a diagram type by name
    pub fn get(&self, name: &str) -> Result<Arc<dyn DiagramType>, DiagramError> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| DiagramError::unknown_diagram_type(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.types.keys().copied().collect()
    }

    pub fn types(&self) -> impl Iterator<Item = &Arc<dyn DiagramType>> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Create an empty diagram of the named type
    pub fn create_diagram(&self, name: &str) -> Result<Diagram, DiagramError> {
        Ok(Diagram::new(self.get(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = DiagramRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("class").is_err());
    }

    #[test]
    #[cfg(all(feature = "class", feature = "state", feature = "object"))]
    fn test_with_all_plugins() {
        let registry = DiagramRegistry::with_all_plugins();
        assert_eq!(registry.names(), vec!["class", "state", "object"]);
        let diagram = registry.create_diagram("state").unwrap();
        assert_eq!(diagram.name(), "state");
    }

    #[test]
    fn test_unknown_type() {
        let registry = DiagramRegistry::with_all_plugins();
        let err = registry.create_diagram("sequence").unwrap_err();
        assert_eq!(err, DiagramError::unknown_diagram_type("sequence"));
    }

    #[test]
    #[cfg(feature = "class")]
    fn test_register_replaces() {
        let mut registry = DiagramRegistry::new();
        registry.register(Arc::new(crate::plugins::class::ClassDiagram::new()));
        registry.register(Arc::new(crate::plugins::class::ClassDiagram::new()));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("class"));
    }
}
