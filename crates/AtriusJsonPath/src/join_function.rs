//! # Join Function
//!
//! `join([delimiter[, path]])` joins the elements of the current model into
//! one string.
//!
//! - `delimiter` defaults to `", "`.
//! - `path`, when given, is evaluated once per element and element `i` is
//!   replaced by item `i` of its result. This is what makes
//!   `$.ids.join('|', $.labels)` produce the labels in the order of the ids.
//!
//! Elements that end up `null` are skipped. A scalar model is joined as a
//! single element.

use std::sync::Arc;

use atrius_jsonpath_support::{EvaluationError, stringify};
use serde_json::Value;
use tracing::trace;

use crate::context::{EvaluationContext, PathRef};
use crate::function_registry::{FunctionRegistry, PathFunction, bind_parameters_default};
use crate::parameter::Parameter;

#[derive(Debug)]
struct Join;

impl PathFunction for Join {
    /// Binds like every other function, then turns the path argument into
    /// an indexed binding so it can be re-targeted per element.
    fn bind_parameters(
        &self,
        _current_path: &str,
        _parent: &PathRef,
        model: &Value,
        parameters: &mut [Parameter],
        ctx: &EvaluationContext,
    ) -> Result<(), EvaluationError> {
        bind_parameters_default(model, parameters, ctx);
        if let Some(path) = parameters.get_mut(1) {
            if let Some(binding) = path.late_binding().cloned() {
                trace!("Binding join path argument as indexed");
                path.set_late_binding(binding.into_indexed());
            }
        }
        Ok(())
    }

    fn invoke(
        &self,
        _current_path: &str,
        _parent: &PathRef,
        model: &Value,
        ctx: &EvaluationContext,
        parameters: &[Parameter],
    ) -> Result<Value, EvaluationError> {
        let delimiter = Parameter::to_delimiter(ctx, parameters)?;
        let path = Parameter::to_path_join(parameters);

        let elements: Vec<&Value> = if ctx.is_array(model) {
            ctx.iterate(model).collect()
        } else {
            vec![model]
        };

        let mut parts = Vec::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            let value = Parameter::to_convert_join_value(element, index, ctx, path)?;
            if !value.is_null() {
                parts.push(stringify(&value));
            }
        }
        Ok(Value::String(parts.join(&delimiter)))
    }
}

pub(crate) fn register(registry: &mut FunctionRegistry) {
    registry.register("join", Arc::new(Join));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiled_path::CompiledPath;
    use crate::configuration::Configuration;
    use crate::late_binding::LateBinding;
    use serde_json::json;

    fn read(path: &str, document: &Value) -> Result<Value, EvaluationError> {
        CompiledPath::compile(path)?.read(document, &Configuration::default())
    }

    #[test]
    fn test_default_and_custom_delimiter() {
        let document = json!({"names": ["a", "b", "c"], "n": [1, null, 2.5]});
        assert_eq!(read("$.names.join()", &document).unwrap(), json!("a, b, c"));
        assert_eq!(read("$.names.join('|')", &document).unwrap(), json!("a|b|c"));
        assert_eq!(read("$.n.join('+')", &document).unwrap(), json!("1+2.5"));
        assert_eq!(read("$.names.join(null)", &document).unwrap(), json!("a, b, c"));
    }

    #[test]
    fn test_scalar_model() {
        let document = json!({"name": "solo", "nothing": null});
        assert_eq!(read("$.name.join('|')", &document).unwrap(), json!("solo"));
        assert_eq!(read("$.nothing.join('|')", &document).unwrap(), json!(""));
    }

    #[test]
    fn test_path_argument_is_indexed_per_element() {
        let document = json!({
            "ids": [10, 20, 30],
            "labels": ["ten", "twenty"]
        });
        assert_eq!(
            read("$.ids.join(' / ', $.labels)", &document).unwrap(),
            json!("ten / twenty")
        );
    }

    #[test]
    fn test_literal_path_argument() {
        // a literal second argument is not indexed; array elements get the whole sequence
        let document = json!({"grid": [[1], [2]]});
        assert_eq!(
            read("$.grid.join(';', ['x', 'y'])", &document).unwrap(),
            json!("[\"x\",\"y\"];[\"x\",\"y\"]")
        );
    }

    #[test]
    fn test_bind_parameters_indexes_only_the_path_argument() {
        let document = Arc::new(json!({"labels": ["a", "b"]}));
        let ctx = EvaluationContext::new(document, Configuration::default(), true);
        let mut parameters = vec![
            Parameter::literal("\"|\""),
            Parameter::sub_path(Arc::new(CompiledPath::compile("$.labels").unwrap())),
        ];
        Join.bind_parameters("$", &PathRef::Root, &json!([]), &mut parameters, &ctx)
            .unwrap();

        assert!(!parameters[0].late_binding().is_some_and(LateBinding::is_indexed));
        assert!(parameters[1].late_binding().is_some_and(LateBinding::is_indexed));
        assert_eq!(parameters[1].value().unwrap(), json!("a"));
    }

    #[test]
    fn test_unbound_delimiter_fails() {
        let ctx = EvaluationContext::new(Arc::new(json!({})), Configuration::default(), true);
        let parameters = [Parameter::unbound()];
        assert!(matches!(
            Join.invoke("$", &PathRef::Root, &json!(["a"]), &ctx, &parameters),
            Err(EvaluationError::UnboundParameter(_))
        ));
    }
}
