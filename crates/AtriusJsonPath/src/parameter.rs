//! # Function Parameters
//!
//! Arguments of a function call in a path, e.g. the `'|'` and `$.ids` in
//! `$.names.join('|', $.ids)`.
//!
//! A [`Parameter`] is built once when the path is compiled and carries either
//! literal JSON text or a compiled sub-path. Before each invocation the
//! function's binder assigns it a [`LateBinding`] closing over the document of
//! that run; [`Parameter::value`] then performs the deferred computation.
//!
//! The associated helpers (`to_sequence`, `to_delimiter`, `to_path_join`,
//! `to_convert_join_value`) are what function implementations use to read
//! their arguments.

use std::sync::Arc;

use atrius_jsonpath_support::{ElementType, EvaluationError, stringify};
use serde_json::Value;

use crate::coercion::consume;
use crate::compiled_path::CompiledPath;
use crate::context::EvaluationContext;
use crate::late_binding::LateBinding;

/// Delimiter used by `join` when no custom delimiter is given.
pub const DEFAULT_DELIMITER: &str = ", ";

/// What a parameter was compiled from.
#[derive(Debug, Clone)]
pub enum ParamKind {
    /// Literal JSON text.
    Literal(String),
    /// A sub-path evaluated against the document.
    SubPath(Arc<CompiledPath>),
    /// No content; only an explicit binding gives it a value.
    Unbound,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    kind: ParamKind,
    late_binding: Option<LateBinding>,
    resolved: bool,
}

impl Default for Parameter {
    fn default() -> Self {
        Self::unbound()
    }
}

impl Parameter {
    pub fn literal(json: impl Into<String>) -> Self {
        Self {
            kind: ParamKind::Literal(json.into()),
            late_binding: None,
            resolved: false,
        }
    }

    pub fn sub_path(path: Arc<CompiledPath>) -> Self {
        Self {
            kind: ParamKind::SubPath(path),
            late_binding: None,
            resolved: false,
        }
    }

    pub fn unbound() -> Self {
        Self {
            kind: ParamKind::Unbound,
            late_binding: None,
            resolved: false,
        }
    }

    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }

    pub fn late_binding(&self) -> Option<&LateBinding> {
        self.late_binding.as_ref()
    }

    pub fn set_late_binding(&mut self, late_binding: LateBinding) {
        self.late_binding = Some(late_binding);
    }

    /// Resolves the parameter through its late binding.
    ///
    /// Fails with `UnboundParameter` when no binding was assigned; that is a
    /// bug in the function's binder, not bad input.
    pub fn value(&self) -> Result<Value, EvaluationError> {
        match &self.late_binding {
            Some(binding) => binding.get(),
            None => Err(EvaluationError::UnboundParameter(format!(
                "{} parameter has no late binding",
                self.kind_name()
            ))),
        }
    }

    /// Advisory flag, never reset automatically.
    pub fn mark_resolved(&mut self, resolved: bool) {
        self.resolved = resolved;
    }

    pub fn has_resolved(&self) -> bool {
        self.resolved
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            ParamKind::Literal(_) => "Literal",
            ParamKind::SubPath(_) => "SubPath",
            ParamKind::Unbound => "Unbound",
        }
    }

    /// Resolves every parameter and coerces the values into one flat sequence
    /// of `element_type`.
    ///
    /// An empty parameter list yields an empty sequence. Values that do not
    /// fit are dropped (see [`consume`]); resolution errors propagate.
    pub fn to_sequence(
        element_type: ElementType,
        ctx: &EvaluationContext,
        parameters: &[Parameter],
    ) -> Result<Vec<Value>, EvaluationError> {
        let mut values = Vec::new();
        for parameter in parameters {
            consume(element_type, ctx, &mut values, &parameter.value()?);
        }
        Ok(values)
    }

    /// The first parameter's value as a string, or [`DEFAULT_DELIMITER`] when
    /// there are no parameters or the first one resolves to nothing.
    pub fn to_delimiter(
        ctx: &EvaluationContext,
        parameters: &[Parameter],
    ) -> Result<String, EvaluationError> {
        let Some(first) = parameters.first() else {
            return Ok(DEFAULT_DELIMITER.to_string());
        };
        let mut values = Vec::new();
        consume(ElementType::Any, ctx, &mut values, &first.value()?);
        Ok(values
            .first()
            .map(stringify)
            .unwrap_or_else(|| DEFAULT_DELIMITER.to_string()))
    }

    /// The second parameter, when there are at least two.
    pub fn to_path_join(parameters: &[Parameter]) -> Option<&Parameter> {
        parameters.get(1)
    }

    /// Computes the value `model` is replaced with when joining element `index`.
    ///
    /// Without a parameter `model` is returned unchanged. Otherwise the
    /// parameter is resolved (through a binding re-targeted at `index` when it
    /// is indexed) and consumed. An array-shaped `model` gets the whole
    /// sequence back as an array; a scalar `model` gets the first element, or
    /// `null` when the sequence is empty.
    pub fn to_convert_join_value(
        model: &Value,
        index: usize,
        ctx: &EvaluationContext,
        parameter: Option<&Parameter>,
    ) -> Result<Value, EvaluationError> {
        let Some(parameter) = parameter else {
            return Ok(model.clone());
        };
        let resolved = match parameter.late_binding().and_then(|b| b.with_index(index)) {
            Some(binding) => binding.get()?,
            None => parameter.value()?,
        };
        let mut values = Vec::new();
        consume(ElementType::Any, ctx, &mut values, &resolved);

        if ctx.is_array(model) {
            Ok(Value::Array(values))
        } else {
            Ok(values.into_iter().next().unwrap_or(Value::Null))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::Configuration;
    use serde_json::json;

    fn ctx_for(document: Value) -> EvaluationContext {
        EvaluationContext::new(Arc::new(document), Configuration::default(), true)
    }

    fn bound_literal(json: &str) -> Parameter {
        let mut parameter = Parameter::literal(json);
        parameter.set_late_binding(LateBinding::json(json, Configuration::default()));
        parameter
    }

    fn bound_indexed(expr: &str, document: &Arc<Value>) -> Parameter {
        let path = Arc::new(CompiledPath::compile(expr).unwrap());
        let mut parameter = Parameter::sub_path(path.clone());
        parameter.set_late_binding(
            LateBinding::path(path, document.clone(), document.clone(), Configuration::default())
                .into_indexed(),
        );
        parameter
    }

    #[test]
    fn test_value_without_binding_fails_fast() {
        for parameter in [
            Parameter::literal("1"),
            Parameter::unbound(),
            Parameter::default(),
        ] {
            assert!(matches!(
                parameter.value(),
                Err(EvaluationError::UnboundParameter(_))
            ));
        }
    }

    #[test]
    fn test_literal_resolves_identically_twice() {
        let parameter = bound_literal("{\"a\": [1, 2]}");
        let first = parameter.value().unwrap();
        let second = parameter.value().unwrap();
        assert_eq!(first, second);
        assert_eq!(first, json!({"a": [1, 2]}));
    }

    #[test]
    fn test_resolved_flag_is_advisory() {
        let mut parameter = bound_literal("1");
        assert!(!parameter.has_resolved());
        parameter.mark_resolved(true);
        assert!(parameter.has_resolved());
        assert_eq!(parameter.value().unwrap(), json!(1));
        parameter.mark_resolved(false);
        assert!(!parameter.has_resolved());
    }

    #[test]
    fn test_to_sequence_empty() {
        let ctx = ctx_for(json!({}));
        assert!(
            Parameter::to_sequence(ElementType::Number, &ctx, &[])
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_to_sequence_string_asymmetry() {
        let ctx = ctx_for(json!({}));
        let array = [bound_literal("[\"1\", \"x\", 3]")];
        assert_eq!(
            Parameter::to_sequence(ElementType::String, &ctx, &array).unwrap(),
            vec![json!("1"), json!("x"), json!("3")]
        );
        let scalar = [bound_literal("3")];
        assert!(
            Parameter::to_sequence(ElementType::String, &ctx, &scalar)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_to_sequence_flattens_across_parameters() {
        let ctx = ctx_for(json!({}));
        let parameters = [
            bound_literal("1"),
            bound_literal("[2, \"skip\", 3]"),
            bound_literal("\"skip\""),
            bound_literal("4.5"),
        ];
        let values = Parameter::to_sequence(ElementType::Number, &ctx, &parameters).unwrap();
        assert_eq!(values, vec![json!(1), json!(2), json!(3), json!(4.5)]);
    }

    #[test]
    fn test_to_sequence_propagates_unbound() {
        let ctx = ctx_for(json!({}));
        let parameters = [bound_literal("1"), Parameter::literal("2")];
        assert!(matches!(
            Parameter::to_sequence(ElementType::Number, &ctx, &parameters),
            Err(EvaluationError::UnboundParameter(_))
        ));
    }

    #[test]
    fn test_to_delimiter() {
        let ctx = ctx_for(json!({}));
        assert_eq!(Parameter::to_delimiter(&ctx, &[]).unwrap(), ", ");
        assert_eq!(
            Parameter::to_delimiter(&ctx, &[bound_literal("\"|\"")]).unwrap(),
            "|"
        );
        assert_eq!(
            Parameter::to_delimiter(&ctx, &[bound_literal("0"), bound_literal("\"x\"")]).unwrap(),
            "0"
        );
        assert_eq!(
            Parameter::to_delimiter(&ctx, &[bound_literal("null")]).unwrap(),
            ", "
        );
    }

    #[test]
    fn test_to_path_join() {
        let first = bound_literal("1");
        let second = bound_literal("2");
        assert!(Parameter::to_path_join(&[]).is_none());
        assert!(Parameter::to_path_join(std::slice::from_ref(&first)).is_none());
        let both = [first, second];
        let joined = Parameter::to_path_join(&both).unwrap();
        assert_eq!(joined.value().unwrap(), json!(2));
    }

    #[test]
    fn test_to_convert_join_value_without_parameter_is_identity() {
        let ctx = ctx_for(json!({}));
        for model in [json!(null), json!(3), json!([1, 2]), json!({"a": "b"})] {
            for index in [0, 7] {
                assert_eq!(
                    Parameter::to_convert_join_value(&model, index, &ctx, None).unwrap(),
                    model
                );
            }
        }
    }

    #[test]
    fn test_to_convert_join_value_array_vs_scalar_model() {
        let ctx = ctx_for(json!({}));
        let parameter = bound_literal("[10, 20]");
        assert_eq!(
            Parameter::to_convert_join_value(&json!([1, 2]), 0, &ctx, Some(&parameter)).unwrap(),
            json!([10, 20])
        );
        assert_eq!(
            Parameter::to_convert_join_value(&json!("a"), 0, &ctx, Some(&parameter)).unwrap(),
            json!(10)
        );
        let empty = bound_literal("[]");
        assert_eq!(
            Parameter::to_convert_join_value(&json!("a"), 0, &ctx, Some(&empty)).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_to_convert_join_value_uses_index_per_element() {
        let document = Arc::new(json!({"labels": ["zero", "one", "two"]}));
        let ctx = EvaluationContext::new(document.clone(), Configuration::default(), true);
        let parameter = bound_indexed("$.labels", &document);

        assert_eq!(
            Parameter::to_convert_join_value(&json!(5), 2, &ctx, Some(&parameter)).unwrap(),
            json!("two")
        );
        assert_eq!(
            Parameter::to_convert_join_value(&json!(5), 1, &ctx, Some(&parameter)).unwrap(),
            json!("one")
        );
        assert_eq!(
            Parameter::to_convert_join_value(&json!(5), 3, &ctx, Some(&parameter)).unwrap(),
            Value::Null
        );
    }
}
