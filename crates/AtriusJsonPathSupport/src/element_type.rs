use serde_json::Value;

/// Element types a function can ask its parameters to be coerced into.
///
/// The set is closed: a function picks the tag it wants and coercion checks
/// values against it by pattern matching, never by inspecting runtime types.
/// `Any` accepts every non-null value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Number,
    String,
    Boolean,
    Any,
}

impl ElementType {
    /// Returns true when `value` is an instance of this element type.
    ///
    /// `null` is never an instance of anything, including `Any`.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => false,
            (ElementType::Number, Value::Number(_)) => true,
            (ElementType::String, Value::String(_)) => true,
            (ElementType::Boolean, Value::Bool(_)) => true,
            (ElementType::Any, _) => true,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Number => "Number",
            ElementType::String => "String",
            ElementType::Boolean => "Boolean",
            ElementType::Any => "Any",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// String form of a value: strings verbatim, everything else as JSON text.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
