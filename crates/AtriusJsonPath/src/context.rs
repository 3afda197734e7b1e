//! Per-run evaluation state.
//!
//! An [`EvaluationContext`] is created for every evaluation of a compiled path
//! against a document. It owns the hits recorded by the token chain and exposes
//! the tree inspection the coercion algorithm needs. Contexts are never shared
//! between runs.

use std::sync::Arc;

use atrius_jsonpath_support::{EvaluationError, JsonProvider};
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::configuration::Configuration;

/// Location of a value inside its parent, recorded next to every hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PathRef {
    /// No owning location (e.g. a value computed by a function).
    NoOp,
    /// The document root.
    Root,
    /// A property of an object.
    Property(String),
    /// An element of an array.
    ArrayIndex(usize),
}

/// One recorded result: the normalized path, its parent reference and the value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationHit {
    pub path: String,
    pub parent: PathRef,
    pub value: Value,
}

#[derive(Debug)]
pub struct EvaluationContext {
    configuration: Configuration,
    root_document: Arc<Value>,
    path_is_definite: bool,
    hits: Vec<EvaluationHit>,
}

impl EvaluationContext {
    pub fn new(
        root_document: Arc<Value>,
        configuration: Configuration,
        path_is_definite: bool,
    ) -> Self {
        Self {
            configuration,
            root_document,
            path_is_definite,
            hits: Vec::new(),
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn json_provider(&self) -> &dyn JsonProvider {
        self.configuration.json_provider()
    }

    pub fn root_document(&self) -> &Arc<Value> {
        &self.root_document
    }

    pub fn is_array(&self, value: &Value) -> bool {
        self.json_provider().is_array(value)
    }

    pub fn iterate<'a>(&self, value: &'a Value) -> Box<dyn Iterator<Item = &'a Value> + 'a> {
        self.json_provider().to_iterable(value)
    }

    /// Appends a hit to the result accumulator.
    pub fn add_result(&mut self, path: impl Into<String>, parent: PathRef, value: Value) {
        let path = path.into();
        trace!("Recording result #{} at {}", self.hits.len(), path);
        self.hits.push(EvaluationHit {
            path,
            parent,
            value,
        });
    }

    pub fn hits(&self) -> &[EvaluationHit] {
        &self.hits
    }

    pub fn result_count(&self) -> usize {
        self.hits.len()
    }

    pub fn path_is_definite(&self) -> bool {
        self.path_is_definite
    }

    /// The recorded paths, in recording order.
    pub fn path_list(&self) -> Vec<String> {
        self.hits.iter().map(|hit| hit.path.clone()).collect()
    }

    /// Every recorded value as a JSON array.
    pub fn value_list(&self) -> Value {
        Value::Array(self.hits.iter().map(|hit| hit.value.clone()).collect())
    }

    /// The evaluation result.
    ///
    /// Definite paths yield the last recorded value (a function token records
    /// its result before the rest of the chain runs, so the last hit is the
    /// outcome of the whole path) and fail when nothing was recorded.
    /// Indefinite paths yield every value as an array.
    pub fn value_result(&self) -> Result<Value, EvaluationError> {
        if !self.path_is_definite {
            return Ok(self.value_list());
        }
        self.hits
            .last()
            .map(|hit| hit.value.clone())
            .ok_or_else(|| EvaluationError::PathNotFound("No results for path".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(definite: bool) -> EvaluationContext {
        EvaluationContext::new(Arc::new(json!({})), Configuration::default(), definite)
    }

    #[test]
    fn test_add_result_and_accessors() {
        let mut ctx = context(true);
        ctx.add_result("$['a']", PathRef::Property("a".to_string()), json!(1));
        ctx.add_result("$['a'].length", PathRef::Property("a".to_string()), json!(2));

        assert_eq!(ctx.result_count(), 2);
        assert_eq!(ctx.path_list(), vec!["$['a']", "$['a'].length"]);
        assert_eq!(ctx.value_list(), json!([1, 2]));
        assert_eq!(ctx.value_result().unwrap(), json!(2));
    }

    #[test]
    fn test_value_result_empty_definite_fails() {
        let ctx = context(true);
        assert!(matches!(
            ctx.value_result(),
            Err(EvaluationError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_value_result_indefinite_is_list() {
        let mut ctx = context(false);
        assert_eq!(ctx.value_result().unwrap(), json!([]));
        ctx.add_result("$[0]", PathRef::ArrayIndex(0), json!("x"));
        assert_eq!(ctx.value_result().unwrap(), json!(["x"]));
    }

    #[test]
    fn test_type_inspection_goes_through_provider() {
        let ctx = context(true);
        let value = json!([1, 2, 3]);
        assert!(ctx.is_array(&value));
        assert!(!ctx.is_array(&json!("[1]")));
        assert_eq!(ctx.iterate(&value).count(), 3);
    }
}
