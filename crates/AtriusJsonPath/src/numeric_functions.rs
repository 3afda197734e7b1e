//! # Numeric Aggregation Functions
//!
//! Implements `sum()`, `min()`, `max()`, `avg()` and `stddev()`.
//!
//! Each aggregation folds over the numbers of the current model (when it is an
//! array, non-numbers are skipped) followed by every numeric value its
//! parameters resolve to:
//!
//! ```text
//! $.prices.sum()            sum of the prices
//! $.prices.max(100)         largest of the prices and 100
//! $.empty.avg($.fallback)   average of the fallback values
//! ```
//!
//! With no numbers at all the call fails with `InvalidArgument`. Integral
//! results are emitted as JSON integers, and `sum`, `min` and `max` over
//! integers only are computed exactly.

use std::sync::Arc;

use atrius_jsonpath_support::{ElementType, EvaluationError};
use serde_json::{Number, Value};

use crate::context::{EvaluationContext, PathRef};
use crate::function_registry::{FunctionRegistry, PathFunction};
use crate::parameter::Parameter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Aggregation {
    Sum,
    Min,
    Max,
    Average,
    StandardDeviation,
}

/// Running state of an aggregation.
///
/// Integer inputs are also totalled exactly, so `sum`, `min` and `max` over
/// integers keep full precision beyond 2^53.
#[derive(Debug, Default)]
struct Accumulator {
    count: usize,
    sum: f64,
    sum_of_squares: f64,
    min: Option<f64>,
    max: Option<f64>,
    inexact: bool,
    integer_sum: i128,
    integer_min: Option<i128>,
    integer_max: Option<i128>,
}

impl Accumulator {
    fn next(&mut self, number: &Value) {
        let Some(value) = number.as_f64() else {
            return;
        };
        self.count += 1;
        self.sum += value;
        self.sum_of_squares += value * value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));

        let integer = number
            .as_i64()
            .map(i128::from)
            .or_else(|| number.as_u64().map(i128::from));
        match integer.and_then(|i| self.integer_sum.checked_add(i).map(|sum| (i, sum))) {
            Some((i, sum)) => {
                self.integer_sum = sum;
                self.integer_min = Some(self.integer_min.map_or(i, |m| m.min(i)));
                self.integer_max = Some(self.integer_max.map_or(i, |m| m.max(i)));
            }
            None => self.inexact = true,
        }
    }

    fn value(&self, aggregation: Aggregation) -> Option<Value> {
        if self.count == 0 {
            return None;
        }
        if !self.inexact {
            let exact = match aggregation {
                Aggregation::Sum => Some(self.integer_sum),
                Aggregation::Min => self.integer_min,
                Aggregation::Max => self.integer_max,
                Aggregation::Average | Aggregation::StandardDeviation => None,
            };
            if let Some(value) = exact.and_then(integer_value) {
                return Some(value);
            }
        }
        let count = self.count as f64;
        let result = match aggregation {
            Aggregation::Sum => self.sum,
            Aggregation::Min => self.min?,
            Aggregation::Max => self.max?,
            Aggregation::Average => self.sum / count,
            Aggregation::StandardDeviation => {
                let mean = self.sum / count;
                // population variance; clamp rounding noise below zero
                (self.sum_of_squares / count - mean * mean).max(0.0).sqrt()
            }
        };
        Some(number_value(result))
    }
}

fn integer_value(value: i128) -> Option<Value> {
    i64::try_from(value)
        .map(Value::from)
        .or_else(|_| u64::try_from(value).map(Value::from))
        .ok()
}

#[derive(Debug)]
struct NumericAggregate {
    aggregation: Aggregation,
}

impl PathFunction for NumericAggregate {
    fn invoke(
        &self,
        _current_path: &str,
        _parent: &PathRef,
        model: &Value,
        ctx: &EvaluationContext,
        parameters: &[Parameter],
    ) -> Result<Value, EvaluationError> {
        let mut accumulator = Accumulator::default();

        if ctx.is_array(model) {
            ctx.iterate(model).for_each(|n| accumulator.next(n));
        }
        Parameter::to_sequence(ElementType::Number, ctx, parameters)?
            .iter()
            .for_each(|n| accumulator.next(n));

        let result = accumulator.value(self.aggregation).ok_or_else(|| {
            EvaluationError::InvalidArgument(
                "Aggregation function attempted to calculate value using empty array".to_string(),
            )
        })?;
        Ok(result)
    }
}

/// Integral values within `i64` range become JSON integers, others floats.
/// Non-finite results have no JSON form and become `null`.
pub(crate) fn number_value(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::Number(Number::from(value as i64))
    } else {
        Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
    }
}

pub(crate) fn register(registry: &mut FunctionRegistry) {
    for (name, aggregation) in [
        ("sum", Aggregation::Sum),
        ("min", Aggregation::Min),
        ("max", Aggregation::Max),
        ("avg", Aggregation::Average),
        ("stddev", Aggregation::StandardDeviation),
    ] {
        registry.register(name, Arc::new(NumericAggregate { aggregation }));
    }
}
