//! Property bags used as the persistence intermediate form
//!
//! Every graph element can describe itself as an ordered [`Properties`]
//! snapshot and rebuild itself from any [`ValueExtractor`]. The insertion
//! order of a bag fixes the field order of persisted output, so elements
//! always emit their base attributes before their kind-specific ones.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use super::DiagramError;

/// The runtime type tag of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    String,
    Bool,
    Enum,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Int => write!(f, "int"),
            ValueType::String => write!(f, "string"),
            ValueType::Bool => write!(f, "boolean"),
            ValueType::Enum => write!(f, "enum"),
        }
    }
}

/// A single persisted attribute value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    Int(i32),
    String(String),
    Bool(bool),
    /// Name of an enumeration constant, e.g. `Both`
    Enum(String),
}

impl PropertyValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            PropertyValue::Int(_) => ValueType::Int,
            PropertyValue::String(_) => ValueType::String,
            PropertyValue::Bool(_) => ValueType::Bool,
            PropertyValue::Enum(_) => ValueType::Enum,
        }
    }

    /// Wrap an enumeration constant by its display name
    pub fn enumeration(value: impl fmt::Display) -> Self {
        PropertyValue::Enum(value.to_string())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Int(value) => write!(f, "{}", value),
            PropertyValue::String(value) => write!(f, "{:?}", value),
            PropertyValue::Bool(value) => write!(f, "{}", value),
            PropertyValue::Enum(value) => write!(f, "{}", value),
        }
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

/// Ordered mapping from property names to values
///
/// Keys are unique: putting an existing key replaces its value without
/// changing its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: IndexMap<String, PropertyValue>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Insert or replace an enumeration value by name
    pub fn put_enum(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.values.insert(key.into(), PropertyValue::enumeration(value));
    }

    /// Look up a raw value
    pub fn value(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = indexmap::map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (key, value) in iter {
            properties.put(key, value);
        }
        properties
    }
}

/// Source of typed values used to initialize an element
///
/// Implemented by the persistence layer; [`Properties`] implements it so an
/// element can be rebuilt directly from another element's snapshot.
pub trait ValueExtractor {
    /// Fetch `key` as a value of `value_type`
    fn get(&self, key: &str, value_type: ValueType) -> Result<PropertyValue, DiagramError>;

    fn get_int(&self, key: &str) -> Result<i32, DiagramError> {
        match self.get(key, ValueType::Int)? {
            PropertyValue::Int(value) => Ok(value),
            other => Err(mismatch(key, ValueType::Int, &other)),
        }
    }

    fn get_string(&self, key: &str) -> Result<String, DiagramError> {
        match self.get(key, ValueType::String)? {
            PropertyValue::String(value) => Ok(value),
            other => Err(mismatch(key, ValueType::String, &other)),
        }
    }

    fn get_bool(&self, key: &str) -> Result<bool, DiagramError> {
        match self.get(key, ValueType::Bool)? {
            PropertyValue::Bool(value) => Ok(value),
            other => Err(mismatch(key, ValueType::Bool, &other)),
        }
    }

    /// Fetch the constant name stored under an enumeration key
    fn get_enum_name(&self, key: &str) -> Result<String, DiagramError> {
        match self.get(key, ValueType::Enum)? {
            PropertyValue::Enum(value) => Ok(value),
            other => Err(mismatch(key, ValueType::Enum, &other)),
        }
    }
}

impl ValueExtractor for Properties {
    fn get(&self, key: &str, value_type: ValueType) -> Result<PropertyValue, DiagramError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| DiagramError::malformed_value(key, "missing property"))?;
        if value.value_type() != value_type {
            return Err(mismatch(key, value_type, value));
        }
        Ok(value.clone())
    }
}

/// Parse an enumeration constant read from `key`
pub fn parse_enum<T: FromStr>(key: &str, name: &str) -> Result<T, DiagramError> {
    name.parse()
        .map_err(|_| DiagramError::malformed_value(key, format!("unknown constant `{}`", name)))
}

fn mismatch(key: &str, expected: ValueType, found: &PropertyValue) -> DiagramError {
    DiagramError::malformed_value(
        key,
        format!("expected {}, found {}", expected, found.value_type()),
    )
}
