//! # JSONPath Support Types
//!
//! This crate provides the foundational types shared by the JSONPath evaluator
//! and anything that plugs functions or document access into it.
//!
//! ## Core Types
//!
//! - [`EvaluationError`] - Errors that abort the evaluation of a path
//! - [`JsonProvider`] - Tree access (is-array, iterate, property lookup) used by the evaluator
//! - [`ElementType`] - The closed set of element types function arguments are coerced into
//!
//! ## Usage Example
//!
//! ```rust
//! use atrius_jsonpath_support::{ElementType, JsonProvider, SerdeJsonProvider};
//! use serde_json::json;
//!
//! let provider = SerdeJsonProvider::new();
//! let value = json!([1, "two", 3]);
//! assert!(provider.is_array(&value));
//!
//! let numbers = provider
//!     .to_iterable(&value)
//!     .filter(|item| ElementType::Number.accepts(item))
//!     .count();
//! assert_eq!(numbers, 2);
//! ```

pub mod element_type;
pub mod evaluation_error;
pub mod json_provider;

pub use element_type::{ElementType, stringify};
pub use evaluation_error::EvaluationError;
pub use json_provider::{JsonProvider, SerdeJsonProvider};
