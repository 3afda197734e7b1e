//! Tree access layer used by the evaluator.
//!
//! Array checks, element walks and property reads made by the evaluator all go
//! through a [`JsonProvider`].

use crate::evaluation_error::EvaluationError;
use serde_json::Value;

/// Abstract access to a JSON tree.
///
/// Implementations must be thread safe: one provider is shared by every
/// evaluation run that uses the same configuration.
pub trait JsonProvider: std::fmt::Debug + Send + Sync {
    /// Parses JSON text into a value.
    fn parse(&self, json: &str) -> Result<Value, EvaluationError>;

    /// Returns true when the value is array-shaped.
    fn is_array(&self, value: &Value) -> bool;

    /// Returns true when the value is object-shaped.
    fn is_map(&self, value: &Value) -> bool;

    /// Iterates the elements of an array-shaped value.
    ///
    /// Non-array values yield nothing.
    fn to_iterable<'a>(&self, value: &'a Value) -> Box<dyn Iterator<Item = &'a Value> + 'a>;

    /// Number of elements of an array, entries of an object or chars of a string.
    fn length(&self, value: &Value) -> Option<usize>;

    /// Reads a property of an object-shaped value.
    fn get_map_value<'a>(&self, value: &'a Value, key: &str) -> Option<&'a Value>;

    /// Reads an element of an array-shaped value.
    fn get_array_index<'a>(&self, value: &'a Value, index: usize) -> Option<&'a Value>;

    /// Property names of an object-shaped value, in map iteration order.
    fn property_keys(&self, value: &Value) -> Vec<String>;
}

/// [`JsonProvider`] backed by `serde_json::Value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonProvider;

impl SerdeJsonProvider {
    pub fn new() -> Self {
        Self
    }
}

impl JsonProvider for SerdeJsonProvider {
    fn parse(&self, json: &str) -> Result<Value, EvaluationError> {
        serde_json::from_str(json).map_err(EvaluationError::from)
    }

    fn is_array(&self, value: &Value) -> bool {
        value.is_array()
    }

    fn is_map(&self, value: &Value) -> bool {
        value.is_object()
    }

    fn to_iterable<'a>(&self, value: &'a Value) -> Box<dyn Iterator<Item = &'a Value> + 'a> {
        match value {
            Value::Array(items) => Box::new(items.iter()),
            _ => Box::new(std::iter::empty()),
        }
    }

    fn length(&self, value: &Value) -> Option<usize> {
        match value {
            Value::Array(items) => Some(items.len()),
            Value::Object(map) => Some(map.len()),
            Value::String(s) => Some(s.chars().count()),
            _ => None,
        }
    }

    fn get_map_value<'a>(&self, value: &'a Value, key: &str) -> Option<&'a Value> {
        value.as_object().and_then(|map| map.get(key))
    }

    fn get_array_index<'a>(&self, value: &'a Value, index: usize) -> Option<&'a Value> {
        value.as_array().and_then(|items| items.get(index))
    }

    fn property_keys(&self, value: &Value) -> Vec<String> {
        value
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }
}
