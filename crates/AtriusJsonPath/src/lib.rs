//! # JSONPath Function Engine
//!
//! Compiles JSONPath expressions with function calls, such as
//! `$.prices.sum()` or `$.ids.join('|', $.labels)`, and evaluates them against
//! `serde_json` documents.
//!
//! ## Overview
//!
//! A path is compiled once into a chain of tokens. Function tokens carry
//! their arguments as [`Parameter`] skeletons: literal JSON text, or a
//! compiled sub-path. Each time the path is evaluated, the function binds
//! fresh copies of its parameters to the current document through
//! [`LateBinding`]s and reads them with the parameter helpers:
//!
//! - [`Parameter::to_sequence`]: every parameter value, coerced into one flat
//!   list of the requested element type
//! - [`Parameter::to_delimiter`]: the first parameter as a string, `", "`
//!   by default
//! - [`Parameter::to_path_join`] / [`Parameter::to_convert_join_value`]: the
//!   per-element substitution used by `join`
//!
//! Compiled paths are never mutated during evaluation and can be shared
//! between threads.
//!
//! ## Architecture
//!
//! - **Parser** (`parser.rs`): path text to AST, built with chumsky
//! - **Compiled paths** (`compiled_path.rs`): token chain construction and
//!   `read` entry points
//! - **Tokens** (`path_token.rs`, `function_token.rs`): navigation and
//!   function invocation
//! - **Parameters** (`parameter.rs`, `late_binding.rs`, `coercion.rs`)
//! - **Functions** (`function_registry.rs` and the `*_functions.rs` modules)
//! - **CLI** (`cli.rs`): the `jsonpath-cli` binary
//!
//! ## Usage Examples
//!
//! ```rust
//! use atrius_json_path::{CompiledPath, Configuration, read};
//! use serde_json::json;
//!
//! let order = json!({"prices": [10, 20.5], "names": ["tea", "cake"]});
//!
//! assert_eq!(read(&order, "$.prices.sum()").unwrap(), json!(30.5));
//! assert_eq!(read(&order, "$.names.join(' + ')").unwrap(), json!("tea + cake"));
//!
//! // Compile once, evaluate many times
//! let path = CompiledPath::compile("$.prices.max(15)").unwrap();
//! assert_eq!(path.read(&order, &Configuration::default()).unwrap(), json!(20.5));
//! ```

pub mod cli;
pub mod coercion;
pub mod collection_functions;
pub mod compiled_path;
pub mod configuration;
pub mod context;
pub mod error;
pub mod function_registry;
pub mod function_token;
pub mod join_function;
pub mod late_binding;
pub mod numeric_functions;
pub mod parameter;
pub mod parser;
pub mod path_token;
pub mod text_functions;

pub use atrius_jsonpath_support::{ElementType, EvaluationError, JsonProvider, SerdeJsonProvider};
pub use compiled_path::CompiledPath;
pub use configuration::{Configuration, ConfigurationBuilder, EvaluationOption};
pub use context::{EvaluationContext, EvaluationHit, PathRef};
pub use function_registry::{FunctionRegistry, PathFunction, bind_parameters_default};
pub use function_token::FunctionPathToken;
pub use late_binding::{LateBinding, PathBinding};
pub use parameter::{DEFAULT_DELIMITER, ParamKind, Parameter};
pub use path_token::PathToken;

use serde_json::Value;

/// Compiles `path` and reads it from `json` with the default configuration.
///
/// # Examples
///
/// ```rust
/// use atrius_json_path::read;
/// use serde_json::json;
///
/// let value = read(&json!({"a": [1, 2, 3]}), "$.a.length()").unwrap();
/// assert_eq!(value, json!(3));
/// ```
pub fn read(json: &Value, path: &str) -> Result<Value, EvaluationError> {
    CompiledPath::compile(path)?.read(json, &Configuration::default())
}
