//! tsbuild — run one TypeScript compilation build step from the shell.
//!
//! Resolves the project configuration, applies command-line overrides,
//! drives the `tsc` binary, and exits non-zero with the aggregated
//! diagnostics on failure.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use tsbuild_core::{init_tracing, BuildRequest, BuildStep, TracingLog};
use tsbuild_engine::{OptionValue, TscEngine};

#[derive(Parser)]
#[command(name = "tsbuild")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "TypeScript compilation build step", long_about = None)]
struct Cli {
    /// Path to the project configuration file
    #[arg(default_value = "tsconfig.json")]
    config: PathBuf,

    /// Output directory override (dominates any configured outDir)
    #[arg(short, long)]
    out_dir: Option<String>,

    /// Explicit input file, repeatable; replaces the configuration's
    /// file selection entirely
    #[arg(short = 'f', long = "file")]
    files: Vec<PathBuf>,

    /// Compiler option override as key=value, repeatable
    #[arg(short = 'D', long = "define", value_parser = parse_override)]
    defines: Vec<(String, OptionValue)>,

    /// Path to the tsc binary
    #[arg(long, default_value = "tsc")]
    tsc: String,

    /// Per-pass timeout in seconds (0 disables the timeout)
    #[arg(long, default_value_t = 0)]
    timeout_secs: u64,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,
}

/// Parse a `key=value` override. Values are interpreted as boolean,
/// number, comma-separated list, or plain string, in that order.
fn parse_override(raw: &str) -> std::result::Result<(String, OptionValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("expected key=value, got '{raw}'"));
    }
    let value = match value {
        "true" => OptionValue::Bool(true),
        "false" => OptionValue::Bool(false),
        other => {
            if let Ok(n) = other.parse::<f64>() {
                OptionValue::Number(n)
            } else if other.contains(',') {
                OptionValue::TextList(other.split(',').map(str::to_string).collect())
            } else {
                OptionValue::Text(other.to_string())
            }
        }
    };
    Ok((key.to_string(), value))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json, cli.verbose);

    let engine = TscEngine::new(cli.tsc).with_timeout(cli.timeout_secs);
    let step = BuildStep::new(Arc::new(engine), Arc::new(TracingLog));

    let mut request = BuildRequest::for_config(cli.config);
    if let Some(out_dir) = cli.out_dir {
        request = request.with_output_location(out_dir);
    }
    if !cli.files.is_empty() {
        request = request.with_input_files(cli.files);
    }
    for (key, value) in cli.defines {
        request = request.with_override(key, value);
    }

    if let Err(e) = step.run(&request).await {
        bail!("{}", e.failure_message());
    }
    Ok(())
}
