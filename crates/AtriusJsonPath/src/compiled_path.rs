//! # Compiled Paths
//!
//! [`CompiledPath`] is the immutable result of compiling path text: a
//! [`RootPathToken`] followed by a chain of navigation and function tokens.
//! Function parameters inside the chain are skeletons that are cloned and
//! bound per evaluation, so one compiled path can be shared across threads
//! and evaluated against any number of documents.

use std::fmt;
use std::sync::Arc;

use atrius_jsonpath_support::EvaluationError;
use chumsky::Parser;
use rayon::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::configuration::{Configuration, EvaluationOption};
use crate::context::{EvaluationContext, PathRef};
use crate::function_token::FunctionPathToken;
use crate::parameter::Parameter;
use crate::parser::{Argument, PathExpr, RootKind, Segment, parser};
use crate::path_token::{ArrayIndexPathToken, PathToken, PropertyPathToken, RootPathToken};

#[derive(Debug)]
pub struct CompiledPath {
    root: RootPathToken,
}

impl CompiledPath {
    /// Compiles path text such as `$.prices.sum()` or `@.names.join('|')`.
    pub fn compile(path: &str) -> Result<Self, EvaluationError> {
        let expr = parser().parse(path).into_result().map_err(|errs| {
            let msg = errs
                .into_iter()
                .map(|e| format!("{:?}", e))
                .collect::<Vec<_>>()
                .join("; ");
            EvaluationError::InvalidPath(format!("{path}. {msg}"))
        })?;
        let compiled = Self::from_expr(expr);
        debug!("Compiled path {} into {}", path, compiled);
        Ok(compiled)
    }

    fn from_expr(expr: PathExpr) -> Self {
        let mut tokens: Vec<Box<dyn PathToken>> = expr
            .segments
            .into_iter()
            .map(|segment| -> Box<dyn PathToken> {
                match segment {
                    Segment::Property(name) => Box::new(PropertyPathToken::new(name)),
                    Segment::Index(index) => Box::new(ArrayIndexPathToken::new(index)),
                    Segment::Function(name, args) => {
                        let parameters = args.into_iter().map(Self::parameter_for).collect();
                        Box::new(FunctionPathToken::new(name, parameters))
                    }
                }
            })
            .collect();

        // Link from the tail so each token owns its successor
        let mut next: Option<Box<dyn PathToken>> = None;
        while let Some(mut token) = tokens.pop() {
            token.set_next(next);
            next = Some(token);
        }
        let mut root = RootPathToken::new(expr.root.symbol());
        root.set_next(next);
        Self { root }
    }

    fn parameter_for(argument: Argument) -> Parameter {
        match argument {
            Argument::Literal(value) => Parameter::literal(value.to_string()),
            Argument::Path(expr) => Parameter::sub_path(Arc::new(Self::from_expr(expr))),
        }
    }

    /// True for paths starting at the document root (`$`).
    pub fn is_root_path(&self) -> bool {
        self.root.path_fragment() == RootKind::Document.symbol().to_string()
    }

    /// True when every token selects at most one value.
    pub fn is_definite(&self) -> bool {
        let mut token: Option<&dyn PathToken> = Some(&self.root);
        while let Some(current) = token {
            if !current.is_token_definite() {
                return false;
            }
            token = current.next();
        }
        true
    }

    /// True when the last token is a function call.
    pub fn is_function_path(&self) -> bool {
        self.root.is_function_path()
    }

    /// Runs the token chain against `document`.
    ///
    /// `root` is the document `$` sub-paths in function parameters resolve
    /// against; for a top-level evaluation it is `document` itself.
    pub fn evaluate(
        &self,
        document: &Value,
        root: &Arc<Value>,
        configuration: &Configuration,
    ) -> Result<EvaluationContext, EvaluationError> {
        let mut ctx =
            EvaluationContext::new(root.clone(), configuration.clone(), self.is_definite());
        self.root.evaluate("", &PathRef::NoOp, document, &mut ctx)?;
        Ok(ctx)
    }

    /// Evaluates the path and shapes the result according to the
    /// configuration's options.
    pub fn read(
        &self,
        document: &Value,
        configuration: &Configuration,
    ) -> Result<Value, EvaluationError> {
        let root = Arc::new(document.clone());
        self.read_shared(&root, configuration)
    }

    /// Evaluates the path over every document in parallel.
    ///
    /// Results come back in document order, one per document.
    pub fn read_all(
        &self,
        documents: &[Value],
        configuration: &Configuration,
    ) -> Vec<Result<Value, EvaluationError>> {
        documents
            .par_iter()
            .map(|document| self.read(document, configuration))
            .collect()
    }

    fn read_shared(
        &self,
        root: &Arc<Value>,
        configuration: &Configuration,
    ) -> Result<Value, EvaluationError> {
        let as_path_list = configuration.contains_option(EvaluationOption::AsPathList);
        let always_list = configuration.contains_option(EvaluationOption::AlwaysReturnList);

        let result = self
            .evaluate(root, root, configuration)
            .and_then(|ctx| {
                if as_path_list {
                    let paths: Vec<String> = if ctx.path_is_definite() {
                        ctx.path_list().into_iter().last().into_iter().collect()
                    } else {
                        ctx.path_list()
                    };
                    return Ok(Value::Array(paths.into_iter().map(Value::String).collect()));
                }
                let value = ctx.value_result()?;
                if always_list && ctx.path_is_definite() {
                    Ok(Value::Array(vec![value]))
                } else {
                    Ok(value)
                }
            });

        match result {
            Err(err) if configuration.contains_option(EvaluationOption::SuppressExceptions) => {
                debug!("Suppressed error while reading {}: {}", self, err);
                if as_path_list || always_list {
                    Ok(Value::Array(Vec::new()))
                } else {
                    Ok(Value::Null)
                }
            }
            other => other,
        }
    }
}

impl fmt::Display for CompiledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut token: Option<&dyn PathToken> = Some(&self.root);
        while let Some(current) = token {
            write!(f, "{}", current.path_fragment())?;
            token = current.next();
        }
        Ok(())
    }
}
