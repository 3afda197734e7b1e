//! # Path Tokens
//!
//! A compiled path is a singly-linked chain of tokens starting at a
//! [`RootPathToken`]. Each token inspects the value it receives, then either
//! records it (leaf) or hands the selected value to its successor.
//!
//! Function calls are [`crate::function_token::FunctionPathToken`]s; this
//! module holds the navigation tokens and the shared [`PathToken`] contract.

use atrius_jsonpath_support::EvaluationError;
use serde_json::Value;

use crate::context::{EvaluationContext, PathRef};

/// One step of a compiled path.
pub trait PathToken: std::fmt::Debug + Send + Sync {
    /// Evaluates this token (and, through `next`, the rest of the chain).
    ///
    /// `current_path` is the normalized path of `model`, `parent` its location
    /// in the document.
    fn evaluate(
        &self,
        current_path: &str,
        parent: &PathRef,
        model: &Value,
        ctx: &mut EvaluationContext,
    ) -> Result<(), EvaluationError>;

    /// True when the token selects at most one value.
    fn is_token_definite(&self) -> bool;

    /// Text of this token as it appears in a normalized path.
    fn path_fragment(&self) -> String;

    fn next(&self) -> Option<&dyn PathToken>;

    fn set_next(&mut self, next: Option<Box<dyn PathToken>>);

    fn is_leaf(&self) -> bool {
        self.next().is_none()
    }
}

/// Records `value` when `token` is the last link, forwards it otherwise.
pub(crate) fn handle_value(
    token: &dyn PathToken,
    path: String,
    parent: PathRef,
    value: &Value,
    ctx: &mut EvaluationContext,
) -> Result<(), EvaluationError> {
    match token.next() {
        Some(next) => next.evaluate(&path, &parent, value, ctx),
        None => {
            ctx.add_result(path, parent, value.clone());
            Ok(())
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `$` (root document) or `@` (current value).
#[derive(Debug)]
pub struct RootPathToken {
    root_token: char,
    next: Option<Box<dyn PathToken>>,
}

impl RootPathToken {
    pub fn new(root_token: char) -> Self {
        Self {
            root_token,
            next: None,
        }
    }

    pub fn is_function_path(&self) -> bool {
        let mut token = self.next();
        while let Some(current) = token {
            if current.next().is_none() {
                return current.path_fragment().ends_with(')');
            }
            token = current.next();
        }
        false
    }
}

impl PathToken for RootPathToken {
    fn evaluate(
        &self,
        _current_path: &str,
        _parent: &PathRef,
        model: &Value,
        ctx: &mut EvaluationContext,
    ) -> Result<(), EvaluationError> {
        handle_value(self, self.root_token.to_string(), PathRef::Root, model, ctx)
    }

    fn is_token_definite(&self) -> bool {
        true
    }

    fn path_fragment(&self) -> String {
        self.root_token.to_string()
    }

    fn next(&self) -> Option<&dyn PathToken> {
        self.next.as_deref()
    }

    fn set_next(&mut self, next: Option<Box<dyn PathToken>>) {
        self.next = next;
    }
}

/// `.name` or `['name']`.
#[derive(Debug)]
pub struct PropertyPathToken {
    property: String,
    next: Option<Box<dyn PathToken>>,
}

impl PropertyPathToken {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            next: None,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }
}

impl PathToken for PropertyPathToken {
    fn evaluate(
        &self,
        current_path: &str,
        _parent: &PathRef,
        model: &Value,
        ctx: &mut EvaluationContext,
    ) -> Result<(), EvaluationError> {
        let path = format!("{}{}", current_path, self.path_fragment());
        if !ctx.json_provider().is_map(model) {
            return Err(EvaluationError::PathNotFound(format!(
                "Expected to find an object with property {} in path {} but found {}",
                self.path_fragment(),
                current_path,
                value_kind(model)
            )));
        }
        let value = ctx
            .json_provider()
            .get_map_value(model, &self.property)
            .cloned()
            .ok_or_else(|| EvaluationError::PathNotFound(format!("No results for path: {}", path)))?;
        handle_value(self, path, PathRef::Property(self.property.clone()), &value, ctx)
    }

    fn is_token_definite(&self) -> bool {
        true
    }

    fn path_fragment(&self) -> String {
        let escaped = self.property.replace('\\', "\\\\").replace('\'', "\\'");
        format!("['{}']", escaped)
    }

    fn next(&self) -> Option<&dyn PathToken> {
        self.next.as_deref()
    }

    fn set_next(&mut self, next: Option<Box<dyn PathToken>>) {
        self.next = next;
    }
}

/// `[n]`; negative indexes count from the end.
#[derive(Debug)]
pub struct ArrayIndexPathToken {
    index: i64,
    next: Option<Box<dyn PathToken>>,
}

impl ArrayIndexPathToken {
    pub fn new(index: i64) -> Self {
        Self { index, next: None }
    }

    fn effective_index(&self, len: usize) -> Option<usize> {
        if self.index < 0 {
            len.checked_sub(self.index.unsigned_abs() as usize)
        } else {
            let index = self.index as usize;
            (index < len).then_some(index)
        }
    }
}

impl PathToken for ArrayIndexPathToken {
    fn evaluate(
        &self,
        current_path: &str,
        _parent: &PathRef,
        model: &Value,
        ctx: &mut EvaluationContext,
    ) -> Result<(), EvaluationError> {
        if !ctx.is_array(model) {
            return Err(EvaluationError::PathNotFound(format!(
                "Filter: {} can only be applied to arrays. Current context is: {}",
                self.path_fragment(),
                value_kind(model)
            )));
        }
        let len = ctx.json_provider().length(model).unwrap_or(0);
        let index = self.effective_index(len).ok_or_else(|| {
            EvaluationError::PathNotFound(format!(
                "No results for path: {}{}",
                current_path,
                self.path_fragment()
            ))
        })?;
        let value = ctx
            .json_provider()
            .get_array_index(model, index)
            .cloned()
            .unwrap_or(Value::Null);
        let path = format!("{}[{}]", current_path, index);
        handle_value(self, path, PathRef::ArrayIndex(index), &value, ctx)
    }

    fn is_token_definite(&self) -> bool {
        true
    }

    fn path_fragment(&self) -> String {
        format!("[{}]", self.index)
    }

    fn next(&self) -> Option<&dyn PathToken> {
        self.next.as_deref()
    }

    fn set_next(&mut self, next: Option<Box<dyn PathToken>>) {
        self.next = next;
    }
}
