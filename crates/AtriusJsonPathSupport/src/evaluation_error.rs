/// Error type for JSONPath evaluation failures.
///
/// Covers the failures that abort the evaluation of a path against one document:
/// parameter binding mistakes, unknown functions, malformed literal arguments,
/// path compilation problems and definite paths that select nothing.
///
/// Coercion drops argument values it cannot use, so type mismatches in
/// function arguments have no variant of their own.
///
/// # Examples
///
/// ```rust
/// use atrius_jsonpath_support::EvaluationError;
///
/// let error = EvaluationError::UnknownFunction("median".to_string());
/// assert_eq!(error.to_string(), "Unknown Function: median");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// A parameter's value was requested before any late binding was assigned.
    ///
    /// This is a programming error in a function's binder, never a user input error.
    ///
    /// Example: "Parameter 0 of 'sum' has no late binding"
    UnboundParameter(String),
    /// No function is registered under the requested name.
    ///
    /// Example: "median"
    UnknownFunction(String),
    /// A function received arguments it cannot work with.
    ///
    /// Example: "Function 'index' expects an integer argument"
    InvalidArgument(String),
    /// A literal parameter could not be parsed as JSON.
    ///
    /// Example: "expected value at line 1 column 1"
    InvalidJson(String),
    /// The path expression could not be compiled.
    ///
    /// Example: "found ')' expected ... at 7..8"
    InvalidPath(String),
    /// A definite path selected nothing in the document.
    ///
    /// Example: "No results for path: $['store']['owner']"
    PathNotFound(String),
}

impl std::error::Error for EvaluationError {}

impl std::fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationError::UnboundParameter(msg) => write!(f, "Unbound Parameter: {}", msg),
            EvaluationError::UnknownFunction(name) => write!(f, "Unknown Function: {}", name),
            EvaluationError::InvalidArgument(msg) => write!(f, "Invalid Argument: {}", msg),
            EvaluationError::InvalidJson(msg) => write!(f, "Invalid JSON: {}", msg),
            EvaluationError::InvalidPath(msg) => write!(f, "Invalid Path: {}", msg),
            EvaluationError::PathNotFound(msg) => write!(f, "Path Not Found: {}", msg),
        }
    }
}

impl From<serde_json::Error> for EvaluationError {
    fn from(err: serde_json::Error) -> Self {
        EvaluationError::InvalidJson(err.to_string())
    }
}
