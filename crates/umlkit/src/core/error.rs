//! Core error types for the diagram model
//!
//! This module defines the error types surfaced by persistence round-trips
//! and by structural operations on a diagram.

use thiserror::Error;

use super::{EdgeId, NodeId};

/// Core error types for the diagram model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error("Malformed value for property `{key}`: {message}")]
    MalformedValue { key: String, message: String },

    #[error("{element} is not supported by {diagram_type} diagrams")]
    UnsupportedElement {
        diagram_type: String,
        element: String,
    },

    #[error("Node not found: {id}")]
    NodeNotFound { id: NodeId },

    #[error("Edge not found: {id}")]
    EdgeNotFound { id: EdgeId },

    #[error("Invalid containment: {message}")]
    InvalidContainment { message: String },

    #[error("Unknown diagram type: {diagram_type}")]
    UnknownDiagramType { diagram_type: String },
}

impl DiagramError {
    /// Create a new malformed value error
    pub fn malformed_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a new unsupported element error
    pub fn unsupported_element(
        diagram_type: impl Into<String>,
        element: impl Into<String>,
    ) -> Self {
        Self::UnsupportedElement {
            diagram_type: diagram_type.into(),
            element: element.into(),
        }
    }

    /// Create a new invalid containment error
    pub fn invalid_containment(message: impl Into<String>) -> Self {
        Self::InvalidContainment {
            message: message.into(),
        }
    }

    /// Create a new unknown diagram type error
    pub fn unknown_diagram_type(diagram_type: impl Into<String>) -> Self {
        Self::UnknownDiagramType {
            diagram_type: diagram_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_value() {
        let error = DiagramError::malformed_value("x", "missing");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Malformed value"));
        assert!(error_msg.contains("`x`"));
        assert!(error_msg.contains("missing"));
    }

    #[test]
    fn test_unsupported_element() {
        let error = DiagramError::unsupported_element("state", "ClassNode");
        assert_eq!(
            error.to_string(),
            "ClassNode is not supported by state diagrams"
        );
    }

    #[test]
    fn test_node_not_found() {
        let error = DiagramError::NodeNotFound {
            id: NodeId::new(7),
        };
        assert!(error.to_string().contains("Node not found"));
        assert!(error.to_string().contains("n7"));
    }

    #[test]
    fn test_invalid_containment() {
        let error = DiagramError::invalid_containment("cycle");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Invalid containment"));
        assert!(error_msg.contains("cycle"));
    }

    #[test]
    fn test_unknown_diagram_type() {
        let error = DiagramError::unknown_diagram_type("sequence");
        assert!(error.to_string().contains("sequence"));
    }
}
