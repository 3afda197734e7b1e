//! # Function Invocation Token
//!
//! The chain node for `.name(...)`. Evaluating it:
//!
//! 1. looks the function up in the configured registry,
//! 2. clones the compiled parameter skeletons and lets the function bind them
//!    against the current run,
//! 3. invokes the function once every parameter carries a binding,
//! 4. records the result at `<current path>.<name>`,
//! 5. forwards the result to the next token, if any.
//!
//! The token itself is never mutated during evaluation, so one compiled path
//! can be evaluated from several threads at once.

use atrius_jsonpath_support::EvaluationError;
use serde_json::Value;
use tracing::debug;

use crate::context::{EvaluationContext, PathRef};
use crate::parameter::Parameter;
use crate::path_token::PathToken;

#[derive(Debug)]
pub struct FunctionPathToken {
    function_name: String,
    path_fragment: String,
    parameters: Vec<Parameter>,
    next: Option<Box<dyn PathToken>>,
}

impl FunctionPathToken {
    pub fn new(function_name: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        let function_name = function_name.into();
        let path_fragment = if parameters.is_empty() {
            format!("{}()", function_name)
        } else {
            format!("{}(...)", function_name)
        };
        Self {
            function_name,
            path_fragment,
            parameters,
            next: None,
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Replaces the parameter list wholesale.
    ///
    /// The display fragment keeps the shape given at construction.
    pub fn set_parameters(&mut self, parameters: Vec<Parameter>) {
        self.parameters = parameters;
    }
}

impl PathToken for FunctionPathToken {
    fn evaluate(
        &self,
        current_path: &str,
        parent: &PathRef,
        model: &Value,
        ctx: &mut EvaluationContext,
    ) -> Result<(), EvaluationError> {
        let function = ctx
            .configuration()
            .function_registry()
            .lookup(&self.function_name)?;

        let mut parameters = self.parameters.clone();
        function.bind_parameters(current_path, parent, model, &mut parameters, ctx)?;
        if let Some(position) = parameters.iter().position(|p| p.late_binding().is_none()) {
            return Err(EvaluationError::UnboundParameter(format!(
                "Parameter {} of '{}' has no late binding",
                position, self.function_name
            )));
        }

        debug!(
            "Invoking '{}' at {} with {} parameter(s)",
            self.function_name,
            current_path,
            parameters.len()
        );
        let result = function.invoke(current_path, parent, model, ctx, &parameters)?;

        ctx.add_result(
            format!("{}.{}", current_path, self.function_name),
            parent.clone(),
            result.clone(),
        );
        match self.next() {
            Some(next) => next.evaluate(current_path, parent, &result, ctx),
            None => Ok(()),
        }
    }

    /// Always true: the function decides whether its output is a collection.
    fn is_token_definite(&self) -> bool {
        true
    }

    fn path_fragment(&self) -> String {
        format!(".{}", self.path_fragment)
    }

    fn next(&self) -> Option<&dyn PathToken> {
        self.next.as_deref()
    }

    fn set_next(&mut self, next: Option<Box<dyn PathToken>>) {
        self.next = next;
    }
}
