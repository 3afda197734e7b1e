//! # JSONPath CLI Tool
//!
//! Evaluates a path, including function calls, against a JSON document and
//! prints the result as JSON.
//!
//! ## Command Line Options
//!
//! ```text
//! -p, --path <PATH>            Path to evaluate
//! -i, --input <INPUT>          JSON document file, '-' for stdin [default: -]
//! -o, --output <OUTPUT>        Output file path (defaults to stdout)
//!     --pretty                 Pretty-print the result
//!     --always-list            Wrap the result in an array
//!     --path-list              Print the matched paths instead of values
//!     --suppress-errors        Print null instead of failing
//!     --hits                   Print every recorded hit (path, parent, value)
//!     --log-level <LEVEL>      Log level [env: JSONPATH_LOG_LEVEL] [default: warn]
//! -h, --help                   Print help
//! ```
//!
//! ## Usage Examples
//!
//! ```bash
//! jsonpath-cli -p '$.prices.sum()' -i order.json
//! cat order.json | jsonpath-cli -p "$.items.join(', ', \$.labels)"
//! jsonpath-cli -p '$.a.length()' -i doc.json --path-list
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde_json::Value;
use tracing::debug;

use crate::compiled_path::CompiledPath;
use crate::configuration::{Configuration, EvaluationOption};
use crate::error::JsonPathResult;

#[derive(Parser, Debug)]
#[command(name = "jsonpath-cli")]
#[command(about = "JSONPath CLI tool for evaluating paths against JSON documents")]
#[command(
    long_about = "Evaluate JSONPath expressions, including function calls such as sum(), join() and concat(), against a JSON document"
)]
pub struct Args {
    /// Path to evaluate
    #[arg(short, long)]
    pub path: String,

    /// JSON document file (use '-' for stdin)
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the result
    #[arg(long)]
    pub pretty: bool,

    /// Wrap single results in an array
    #[arg(long)]
    pub always_list: bool,

    /// Print the matched paths instead of the values
    #[arg(long)]
    pub path_list: bool,

    /// Print null (or an empty list) instead of failing
    #[arg(long)]
    pub suppress_errors: bool,

    /// Print every recorded hit instead of the result
    #[arg(long)]
    pub hits: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "JSONPATH_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Args {
    /// The evaluation configuration selected by the flags.
    pub fn configuration(&self) -> Configuration {
        let mut builder = Configuration::builder();
        if self.always_list {
            builder = builder.option(EvaluationOption::AlwaysReturnList);
        }
        if self.path_list {
            builder = builder.option(EvaluationOption::AsPathList);
        }
        if self.suppress_errors {
            builder = builder.option(EvaluationOption::SuppressExceptions);
        }
        builder.build()
    }
}

/// Installs the global `tracing` subscriber, logging to stderr.
///
/// `RUST_LOG` takes precedence over `log_level`.
pub fn init_tracing(log_level: &str) {
    let filter = format!("atrius_json_path={},jsonpath_cli={}", log_level, log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with_writer(io::stderr)
        .init();
}

/// Main CLI execution function
pub fn run_cli(args: Args) -> JsonPathResult<()> {
    let output = evaluate_args(&args)?;
    write_output(&args.output, &output)
}

/// Reads the input, evaluates the path and renders the result.
pub fn evaluate_args(args: &Args) -> JsonPathResult<String> {
    let content = read_input(&args.input)?;
    let document: Value = serde_json::from_str(&content)?;

    let path = CompiledPath::compile(&args.path)?;
    debug!("Evaluating {} against {}", path, args.input.display());
    let result = if args.hits {
        let root = Arc::new(document);
        let ctx = path.evaluate(&root, &root, &args.configuration())?;
        serde_json::to_value(ctx.hits())?
    } else {
        path.read(&document, &args.configuration())?
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    Ok(rendered)
}

/// Read input from file or stdin
fn read_input(path: &PathBuf) -> JsonPathResult<String> {
    if path.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

/// Write output to file or stdout
fn write_output(path: &Option<PathBuf>, content: &str) -> JsonPathResult<()> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(content.as_bytes())?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JsonPathError;
    use tempfile::NamedTempFile;

    fn document_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn args(path: &str, input: &NamedTempFile, extra: &[&str]) -> Args {
        let input = input.path().to_str().unwrap().to_string();
        let mut argv = vec!["jsonpath-cli", "-p", path, "-i", input.as_str()];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_parse_arguments() {
        let args = Args::parse_from(["jsonpath-cli", "--path", "$.a", "--always-list", "--pretty"]);
        assert_eq!(args.path, "$.a");
        assert_eq!(args.input, PathBuf::from("-"));
        assert!(args.always_list && args.pretty);
        assert!(!args.path_list && !args.suppress_errors);
        assert!(
            args.configuration()
                .contains_option(EvaluationOption::AlwaysReturnList)
        );
    }

    #[test]
    fn test_evaluate_function_path() {
        let file = document_file(r#"{"prices": [1, 2, 3]}"#);
        assert_eq!(evaluate_args(&args("$.prices.sum()", &file, &[])).unwrap(), "6");
        assert_eq!(
            evaluate_args(&args("$.prices.max()", &file, &["--always-list"])).unwrap(),
            "[3]"
        );
        assert_eq!(
            evaluate_args(&args("$.prices.avg()", &file, &["--path-list"])).unwrap(),
            r#"["$['prices'].avg"]"#
        );
    }

    #[test]
    fn test_hits_output() {
        let file = document_file(r#"{"a": {"b": [1, 2]}}"#);
        let rendered = evaluate_args(&args("$.a.b.sum()", &file, &["--hits"])).unwrap();
        let hits: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            hits,
            serde_json::json!([
                {"path": "$['a']['b'].sum", "parent": {"Property": "b"}, "value": 3}
            ])
        );
    }

    #[test]
    fn test_errors() {
        let file = document_file(r#"{"a": 1}"#);
        assert!(matches!(
            evaluate_args(&args("$.a.", &file, &[])),
            Err(JsonPathError::ParseError(_))
        ));
        assert!(matches!(
            evaluate_args(&args("$.b", &file, &[])),
            Err(JsonPathError::EvaluationError(_))
        ));
        assert_eq!(
            evaluate_args(&args("$.b", &file, &["--suppress-errors"])).unwrap(),
            "null"
        );

        let broken = document_file("{not json");
        assert!(matches!(
            evaluate_args(&args("$", &broken, &[])),
            Err(JsonPathError::JsonError(_))
        ));
    }

    #[test]
    fn test_run_cli_writes_output_file() {
        let file = document_file(r#"{"names": ["a", "b"]}"#);
        let output = NamedTempFile::new().unwrap();
        let output_path = output.path().to_str().unwrap().to_string();
        let args = args("$.names.join('|')", &file, &["-o", output_path.as_str()]);
        run_cli(args).unwrap();
        assert_eq!(fs::read_to_string(output.path()).unwrap(), "\"a|b\"");
    }
}
