//! Best-effort coercion of resolved parameter values.
//!
//! Function arguments resolve to arbitrary JSON: a scalar, an array, or `null`.
//! [`consume`] turns such a value into elements of the type a function asked for
//! and appends them to an accumulating sequence.
//!
//! A value that does not fit is dropped rather than reported:
//!
//! - arrays are flattened one level; each non-null element is kept when it
//!   matches, stringified when the target is [`ElementType::String`], dropped
//!   otherwise;
//! - scalars are kept when they match and dropped otherwise. Scalars are never
//!   stringified.

use atrius_jsonpath_support::{ElementType, stringify};
use serde_json::Value;
use tracing::trace;

use crate::context::EvaluationContext;

/// Consumes `value` into `collection` as elements of `expected_type`.
pub fn consume(
    expected_type: ElementType,
    ctx: &EvaluationContext,
    collection: &mut Vec<Value>,
    value: &Value,
) {
    if ctx.is_array(value) {
        for element in ctx.iterate(value) {
            if element.is_null() {
                continue;
            }
            if expected_type.accepts(element) {
                collection.push(element.clone());
            } else if expected_type == ElementType::String {
                collection.push(Value::String(stringify(element)));
            } else {
                trace!("Dropping array element {} (expected {})", element, expected_type);
            }
        }
    } else if expected_type.accepts(value) {
        collection.push(value.clone());
    } else {
        trace!("Dropping scalar {} (expected {})", value, expected_type);
    }
}
