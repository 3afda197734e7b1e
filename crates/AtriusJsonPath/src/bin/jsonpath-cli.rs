//! JSONPath CLI executable
//!
//! Evaluates a JSONPath expression against a JSON document and prints the
//! result. See the cli module documentation for detailed usage information.

use atrius_json_path::cli::{Args, init_tracing, run_cli};
use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);
    run_cli(args)?;
    Ok(())
}
