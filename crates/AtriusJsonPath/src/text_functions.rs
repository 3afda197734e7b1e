//! # Text and Size Functions
//!
//! - `concat(...)`: the model's string form followed by every string its
//!   parameters resolve to
//! - `length()` / `size()`: element count of an array or object, character
//!   count of a string, `null` for anything else

use std::sync::Arc;

use atrius_jsonpath_support::{ElementType, EvaluationError, stringify};
use serde_json::Value;

use crate::context::{EvaluationContext, PathRef};
use crate::function_registry::{FunctionRegistry, PathFunction};
use crate::parameter::Parameter;

#[derive(Debug)]
struct Concatenate;

impl PathFunction for Concatenate {
    fn invoke(
        &self,
        _current_path: &str,
        _parent: &PathRef,
        model: &Value,
        ctx: &EvaluationContext,
        parameters: &[Parameter],
    ) -> Result<Value, EvaluationError> {
        let mut result = String::new();
        if ctx.is_array(model) {
            for element in ctx.iterate(model).filter(|e| !e.is_null()) {
                result.push_str(&stringify(element));
            }
        } else if model.is_string() || model.is_number() {
            result.push_str(&stringify(model));
        }

        for value in Parameter::to_sequence(ElementType::String, ctx, parameters)? {
            result.push_str(&stringify(&value));
        }
        Ok(Value::String(result))
    }
}

#[derive(Debug)]
struct Length;

impl PathFunction for Length {
    fn invoke(
        &self,
        _current_path: &str,
        _parent: &PathRef,
        model: &Value,
        ctx: &EvaluationContext,
        _parameters: &[Parameter],
    ) -> Result<Value, EvaluationError> {
        Ok(ctx
            .json_provider()
            .length(model)
            .map(Value::from)
            .unwrap_or(Value::Null))
    }
}

pub(crate) fn register(registry: &mut FunctionRegistry) {
    registry.register("concat", Arc::new(Concatenate));
    registry.register("length", Arc::new(Length));
    registry.register("size", Arc::new(Length));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiled_path::CompiledPath;
    use crate::configuration::Configuration;
    use serde_json::json;

    fn read(path: &str, document: Value) -> Value {
        CompiledPath::compile(path)
            .unwrap()
            .read(&document, &Configuration::default())
            .unwrap()
    }

    #[test]
    fn test_concat_model_and_parameters() {
        let document = json!({"words": ["a", 1, null, "b"], "name": "x", "n": 7});
        assert_eq!(read("$.words.concat()", document.clone()), json!("a1b"));
        assert_eq!(read("$.name.concat('-', 'y')", document.clone()), json!("x-y"));
        assert_eq!(read("$.n.concat('!')", document.clone()), json!("7!"));
        // arrays in parameters are flattened and stringified
        assert_eq!(read("$.name.concat([1, true])", document.clone()), json!("x1true"));
        // scalar non-strings in parameters are dropped
        assert_eq!(read("$.name.concat(1)", document), json!("x"));
    }

    #[test]
    fn test_concat_with_sub_path() {
        let document = json!({"first": "Ada", "last": "Lovelace"});
        assert_eq!(
            read("$.first.concat(' ', $.last)", document),
            json!("Ada Lovelace")
        );
    }

    #[test]
    fn test_length_and_size() {
        let document = json!({"list": [1, 2, 3], "map": {"a": 1}, "text": "héllo", "n": 5});
        assert_eq!(read("$.list.length()", document.clone()), json!(3));
        assert_eq!(read("$.map.size()", document.clone()), json!(1));
        assert_eq!(read("$.text.length()", document.clone()), json!(5));
        assert_eq!(read("$.n.length()", document), Value::Null);
    }
}
