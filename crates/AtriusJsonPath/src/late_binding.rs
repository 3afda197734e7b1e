//! Deferred parameter values.
//!
//! A [`LateBinding`] is assigned to a parameter during the binding pass that
//! precedes every function invocation. It captures whatever the deferred
//! computation needs (the literal text, or the sub-path with the documents and
//! configuration of the current run) and performs the computation each time
//! [`LateBinding::get`] is called. Nothing is cached.
//!
//! Bindings are values: re-targeting an indexed binding at another element
//! builds a new binding with [`LateBinding::with_index`] instead of mutating
//! one that other parameters may share.

use std::sync::Arc;

use atrius_jsonpath_support::EvaluationError;
use serde_json::Value;

use crate::compiled_path::CompiledPath;
use crate::configuration::Configuration;

/// A sub-path together with the documents it is evaluated against.
#[derive(Debug, Clone)]
pub struct PathBinding {
    path: Arc<CompiledPath>,
    document: Arc<Value>,
    root: Arc<Value>,
    configuration: Configuration,
}

impl PathBinding {
    pub fn new(
        path: Arc<CompiledPath>,
        document: Arc<Value>,
        root: Arc<Value>,
        configuration: Configuration,
    ) -> Self {
        Self {
            path,
            document,
            root,
            configuration,
        }
    }

    fn evaluate(&self) -> Result<Value, EvaluationError> {
        self.path
            .evaluate(&self.document, &self.root, &self.configuration)?
            .value_result()
    }
}

#[derive(Debug, Clone)]
pub enum LateBinding {
    /// Literal JSON text, parsed on every resolution.
    Json {
        text: String,
        configuration: Configuration,
    },
    /// A sub-path whose value is the binding's value.
    Path(PathBinding),
    /// A sub-path whose result array is indexed; out of range yields `null`.
    IndexedPath { binding: PathBinding, index: usize },
}

impl LateBinding {
    pub fn json(text: impl Into<String>, configuration: Configuration) -> Self {
        LateBinding::Json {
            text: text.into(),
            configuration,
        }
    }

    pub fn path(
        path: Arc<CompiledPath>,
        document: Arc<Value>,
        root: Arc<Value>,
        configuration: Configuration,
    ) -> Self {
        LateBinding::Path(PathBinding::new(path, document, root, configuration))
    }

    /// Performs the deferred computation.
    pub fn get(&self) -> Result<Value, EvaluationError> {
        match self {
            LateBinding::Json {
                text,
                configuration,
            } => configuration.json_provider().parse(text),
            LateBinding::Path(binding) => binding.evaluate(),
            LateBinding::IndexedPath { binding, index } => {
                let value = binding.evaluate()?;
                Ok(binding
                    .configuration
                    .json_provider()
                    .get_array_index(&value, *index)
                    .cloned()
                    .unwrap_or(Value::Null))
            }
        }
    }

    /// Returns true when the binding can be re-targeted at another index.
    pub fn is_indexed(&self) -> bool {
        matches!(self, LateBinding::IndexedPath { .. })
    }

    /// A fresh binding for `index`, or `None` when this binding is not indexed.
    pub fn with_index(&self, index: usize) -> Option<LateBinding> {
        match self {
            LateBinding::IndexedPath { binding, .. } => Some(LateBinding::IndexedPath {
                binding: binding.clone(),
                index,
            }),
            _ => None,
        }
    }

    /// Turns a sub-path binding into an indexed one starting at index 0.
    ///
    /// Literal bindings are returned unchanged.
    pub fn into_indexed(self) -> LateBinding {
        match self {
            LateBinding::Path(binding) => LateBinding::IndexedPath { binding, index: 0 },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path_binding(expr: &str, document: Value) -> LateBinding {
        let path = Arc::new(CompiledPath::compile(expr).unwrap());
        let document = Arc::new(document);
        LateBinding::path(path, document.clone(), document, Configuration::default())
    }

    #[test]
    fn test_json_binding_is_idempotent() {
        let binding = LateBinding::json("[1, \"a\"]", Configuration::default());
        assert_eq!(binding.get().unwrap(), json!([1, "a"]));
        assert_eq!(binding.get().unwrap(), binding.get().unwrap());
    }

    #[test]
    fn test_json_binding_invalid_text() {
        let binding = LateBinding::json("{oops", Configuration::default());
        assert!(matches!(binding.get(), Err(EvaluationError::InvalidJson(_))));
    }

    #[test]
    fn test_path_binding_sees_current_document() {
        let binding = path_binding("$.a.b", json!({"a": {"b": [1, 2]}}));
        assert_eq!(binding.get().unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_indexed_binding() {
        let binding = path_binding("$.items", json!({"items": ["x", "y", "z"]})).into_indexed();
        assert!(binding.is_indexed());
        assert_eq!(binding.get().unwrap(), json!("x"));

        let second = binding.with_index(1).unwrap();
        assert_eq!(second.get().unwrap(), json!("y"));
        // the original binding still points at index 0
        assert_eq!(binding.get().unwrap(), json!("x"));

        let out_of_range = binding.with_index(9).unwrap();
        assert_eq!(out_of_range.get().unwrap(), Value::Null);
    }

    #[test]
    fn test_indexed_binding_over_scalar_is_null() {
        let binding = path_binding("$.n", json!({"n": 4})).into_indexed();
        assert_eq!(binding.get().unwrap(), Value::Null);
    }

    #[test]
    fn test_only_indexed_bindings_reindex() {
        let literal = LateBinding::json("1", Configuration::default());
        assert!(!literal.is_indexed());
        assert!(literal.with_index(2).is_none());
        assert!(!literal.into_indexed().is_indexed());

        let plain = path_binding("$.n", json!({"n": 4}));
        assert!(plain.with_index(0).is_none());
    }
}
