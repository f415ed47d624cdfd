//! Tests for logging initialization

use std::str::FromStr;
use umlkit::core::logging::{init_logging, resolve_format, LogFormat};

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("invalid").is_err());
}

#[test]
fn test_init_logging_with_levels() {
    // Only the first call can install the global subscriber
    let _ = init_logging(Some("trace"), Some("compact"));
    let _ = init_logging(Some("debug"), Some("pretty"));
    let _ = init_logging(Some("off"), Some("json"));
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_resolve_format_explicit() {
    assert_eq!(resolve_format(Some("pretty")).unwrap(), LogFormat::Pretty);
}

#[test]
fn test_operations_run_with_trace_logging() {
    let _ = init_logging(Some("trace"), Some("compact"));
    let mut diagram = umlkit::new_diagram("class").unwrap();
    let id = diagram
        .add_node(umlkit::Node::class(), umlkit::Point::new(0, 0))
        .unwrap();
    assert_eq!(diagram.find_node(umlkit::Point::new(1, 1)), Some(id));
}
