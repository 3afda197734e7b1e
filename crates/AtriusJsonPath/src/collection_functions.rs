//! # Collection Functions
//!
//! Functions that pick from or extend the current model:
//!
//! | Function | Array model | Other models |
//! |----------|-------------|--------------|
//! | `first()` | first element | `null` |
//! | `last()` | last element | `null` |
//! | `index(i)` | element `i`, negative counts from the end | `null` |
//! | `append(...)` | the array with every parameter value added | error |
//! | `keys()` | `null` | keys of an object, `null` for scalars |
//!
//! Selecting past either end yields `null`.

use std::sync::Arc;

use atrius_jsonpath_support::{ElementType, EvaluationError};
use serde_json::Value;

use crate::context::{EvaluationContext, PathRef};
use crate::function_registry::{FunctionRegistry, PathFunction};
use crate::parameter::Parameter;

#[derive(Debug, Clone, Copy)]
enum Position {
    First,
    Last,
}

#[derive(Debug)]
struct Pick {
    position: Position,
}

impl PathFunction for Pick {
    fn invoke(
        &self,
        _current_path: &str,
        _parent: &PathRef,
        model: &Value,
        ctx: &EvaluationContext,
        _parameters: &[Parameter],
    ) -> Result<Value, EvaluationError> {
        if !ctx.is_array(model) {
            return Ok(Value::Null);
        }
        let picked = match self.position {
            Position::First => ctx.iterate(model).next(),
            Position::Last => ctx.iterate(model).last(),
        };
        Ok(picked.cloned().unwrap_or(Value::Null))
    }
}

#[derive(Debug)]
struct Index;

impl PathFunction for Index {
    fn invoke(
        &self,
        _current_path: &str,
        _parent: &PathRef,
        model: &Value,
        ctx: &EvaluationContext,
        parameters: &[Parameter],
    ) -> Result<Value, EvaluationError> {
        let requested = match parameters.first() {
            Some(parameter) => parameter.value()?,
            None => {
                return Err(EvaluationError::InvalidArgument(
                    "index() requires an integer argument".to_string(),
                ));
            }
        };
        let index = requested.as_i64().ok_or_else(|| {
            EvaluationError::InvalidArgument(format!(
                "index() argument must be an integer, got {}",
                requested
            ))
        })?;

        if !ctx.is_array(model) {
            return Ok(Value::Null);
        }
        let len = ctx.json_provider().length(model).unwrap_or(0);
        let position = if index < 0 {
            len.checked_sub(index.unsigned_abs() as usize)
        } else {
            Some(index as usize)
        };
        Ok(position
            .and_then(|p| ctx.json_provider().get_array_index(model, p))
            .cloned()
            .unwrap_or(Value::Null))
    }
}

#[derive(Debug)]
struct Append;

impl PathFunction for Append {
    fn invoke(
        &self,
        current_path: &str,
        _parent: &PathRef,
        model: &Value,
        ctx: &EvaluationContext,
        parameters: &[Parameter],
    ) -> Result<Value, EvaluationError> {
        if !ctx.is_array(model) {
            return Err(EvaluationError::InvalidArgument(format!(
                "append() can only be applied to arrays, {} is not an array",
                current_path
            )));
        }
        let mut result: Vec<Value> = ctx.iterate(model).cloned().collect();
        result.extend(Parameter::to_sequence(ElementType::Any, ctx, parameters)?);
        Ok(Value::Array(result))
    }
}

#[derive(Debug)]
struct Keys;

impl PathFunction for Keys {
    fn invoke(
        &self,
        _current_path: &str,
        _parent: &PathRef,
        model: &Value,
        ctx: &EvaluationContext,
        _parameters: &[Parameter],
    ) -> Result<Value, EvaluationError> {
        if !ctx.json_provider().is_map(model) {
            return Ok(Value::Null);
        }
        Ok(Value::Array(
            ctx.json_provider()
                .property_keys(model)
                .into_iter()
                .map(Value::String)
                .collect(),
        ))
    }
}

pub(crate) fn register(registry: &mut FunctionRegistry) {
    registry.register("first", Arc::new(Pick { position: Position::First }));
    registry.register("last", Arc::new(Pick { position: Position::Last }));
    registry.register("index", Arc::new(Index));
    registry.register("append", Arc::new(Append));
    registry.register("keys", Arc::new(Keys));
}
