#![allow(dead_code)]

use std::sync::Arc;

use atrius_json_path::{
    CompiledPath, Configuration, EvaluationContext, EvaluationError, LateBinding, Parameter,
};
use serde_json::{Value, json};

/// A small store document used across the integration tests.
pub fn store() -> Value {
    json!({
        "store": {
            "name": "Corner Books",
            "books": [
                {"title": "Sayings of the Century", "author": "Nigel Rees", "price": 8.95},
                {"title": "Sword of Honour", "author": "Evelyn Waugh", "price": 12.99},
                {"title": "Moby Dick", "author": "Herman Melville", "price": 8.99},
                {"title": "The Lord of the Rings", "author": "J. R. R. Tolkien", "price": 22.99}
            ],
            "titles": ["Sayings of the Century", "Sword of Honour", "Moby Dick", "The Lord of the Rings"],
            "prices": [8.95, 12.99, 8.99, 22.99],
            "ids": [1, 2, 3, 4],
            "tags": {"genre": "mixed", "open": true}
        },
        "discount": 2,
        "separator": " | "
    })
}

pub fn read(path: &str, document: &Value) -> Result<Value, EvaluationError> {
    CompiledPath::compile(path)?.read(document, &Configuration::default())
}

pub fn context_for(document: Value) -> EvaluationContext {
    EvaluationContext::new(Arc::new(document), Configuration::default(), true)
}

/// A literal parameter that already carries its JSON binding.
pub fn bound_literal(json: &str) -> Parameter {
    let mut parameter = Parameter::literal(json);
    parameter.set_late_binding(LateBinding::json(json, Configuration::default()));
    parameter
}

/// A sub-path parameter bound against `document`.
pub fn bound_path(path: &str, document: &Arc<Value>) -> Parameter {
    let compiled = Arc::new(CompiledPath::compile(path).unwrap());
    let mut parameter = Parameter::sub_path(compiled.clone());
    parameter.set_late_binding(LateBinding::path(
        compiled,
        document.clone(),
        document.clone(),
        Configuration::default(),
    ));
    parameter
}

pub fn assert_close(actual: &Value, expected: f64) {
    let actual = actual
        .as_f64()
        .unwrap_or_else(|| panic!("Expected a number, got: {:?}", actual));
    assert!(
        (actual - expected).abs() < 1e-9,
        "Expected {}, got {}",
        expected,
        actual
    );
}
