//! # Path Functions
//!
//! The [`PathFunction`] trait is the contract between a function token and a
//! function implementation, and [`FunctionRegistry`] maps names to
//! implementations.
//!
//! The registry returned by [`standard_registry`] holds the built-in library:
//!
//! | Name | Module |
//! |------|--------|
//! | `sum`, `min`, `max`, `avg`, `stddev` | `numeric_functions` |
//! | `concat`, `length`, `size` | `text_functions` |
//! | `join` | `join_function` |
//! | `first`, `last`, `index`, `append`, `keys` | `collection_functions` |

use std::collections::HashMap;
use std::sync::Arc;

use atrius_jsonpath_support::EvaluationError;
use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::trace;

use crate::context::{EvaluationContext, PathRef};
use crate::late_binding::LateBinding;
use crate::parameter::{ParamKind, Parameter};

/// A function callable from a path, e.g. `$.prices.sum()`.
pub trait PathFunction: Send + Sync {
    /// Assigns late bindings to the parameters of one invocation.
    ///
    /// The default binds literals to their JSON text and sub-paths to the
    /// current run's documents (see [`bind_parameters_default`]).
    fn bind_parameters(
        &self,
        _current_path: &str,
        _parent: &PathRef,
        model: &Value,
        parameters: &mut [Parameter],
        ctx: &EvaluationContext,
    ) -> Result<(), EvaluationError> {
        bind_parameters_default(model, parameters, ctx);
        Ok(())
    }

    /// Runs the function against `model`, the value the path has reached.
    fn invoke(
        &self,
        current_path: &str,
        parent: &PathRef,
        model: &Value,
        ctx: &EvaluationContext,
        parameters: &[Parameter],
    ) -> Result<Value, EvaluationError>;
}

/// Standard binding pass.
///
/// Every parameter that has not been resolved yet gets a fresh binding:
/// literals parse their JSON text, `$` sub-paths evaluate against the root
/// document, `@` sub-paths against `model`. Unbound parameters are left
/// without a binding so reading them fails.
pub fn bind_parameters_default(model: &Value, parameters: &mut [Parameter], ctx: &EvaluationContext) {
    let mut current: Option<Arc<Value>> = None;
    for parameter in parameters.iter_mut() {
        if parameter.has_resolved() {
            continue;
        }
        let binding = match parameter.kind() {
            ParamKind::Literal(text) => {
                LateBinding::json(text.clone(), ctx.configuration().clone())
            }
            ParamKind::SubPath(path) => {
                let document = if path.is_root_path() {
                    ctx.root_document().clone()
                } else {
                    current
                        .get_or_insert_with(|| Arc::new(model.clone()))
                        .clone()
                };
                LateBinding::path(
                    path.clone(),
                    document,
                    ctx.root_document().clone(),
                    ctx.configuration().clone(),
                )
            }
            ParamKind::Unbound => continue,
        };
        parameter.set_late_binding(binding);
        parameter.mark_resolved(true);
    }
}

/// Function implementations by name.
#[derive(Default, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn PathFunction>>,
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in functions.
    pub fn with_standard_functions() -> Self {
        let mut registry = Self::new();
        crate::numeric_functions::register(&mut registry);
        crate::text_functions::register(&mut registry);
        crate::join_function::register(&mut registry);
        crate::collection_functions::register(&mut registry);
        registry
    }

    /// Registers `function` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, function: Arc<dyn PathFunction>) {
        let name = name.into();
        trace!("Registering path function '{}'", name);
        self.functions.insert(name, function);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<dyn PathFunction>, EvaluationError> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| EvaluationError::UnknownFunction(name.to_string()))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }
}

static STANDARD_REGISTRY: Lazy<Arc<FunctionRegistry>> =
    Lazy::new(|| Arc::new(FunctionRegistry::with_standard_functions()));

/// The shared built-in registry used by `Configuration::default()`.
pub fn standard_registry() -> Arc<FunctionRegistry> {
    STANDARD_REGISTRY.clone()
}
