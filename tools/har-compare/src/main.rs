//! har-compare: rank per-request latency deltas between two HAR captures
//!
//! Usage:
//!   har-compare <baseline.har> <candidate.har>                 # top 10, write CSV/JSON/SVG to .
//!   har-compare a.har b.har -n 5 --domain api.example.com     # filter, top 5
//!   har-compare a.har b.har --status 404 --no-export          # report only
//!
//! Exit status: 0 on success, 1 on any load/compare/write error, 2 on usage errors.

mod cli;
mod report;
mod sink;

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use delta_engine::{rank, Capture, Engine};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::sink::{RunInputs, Sink};

/// Initialize tracing subscriber; logs go to stderr so stdout stays the report
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_capture(engine: &Engine, path: &Path) -> Result<Capture> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let capture = engine
        .load(&raw)
        .with_context(|| format!("cannot load {}", path.display()))?;
    info!(
        path = %path.display(),
        records = capture.len(),
        issues = capture.issues.len(),
        "loaded capture"
    );
    Ok(capture)
}

fn run(cli: &Cli) -> Result<()> {
    let engine = Engine::new(cli.config());
    let selection = cli.selection(engine.config());
    rank::validate(&selection)?;

    let baseline = load_capture(&engine, &cli.baseline)?;
    let candidate = load_capture(&engine, &cli.candidate)?;
    let issues = baseline.issues.len() + candidate.issues.len();

    let result = engine.compare_captures(baseline, candidate, &selection)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::print(&mut out, &result, issues)?;

    if !result.has_ranked() || cli.no_export {
        return Ok(());
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("cannot create {}", cli.out_dir.display()))?;
    let inputs = RunInputs {
        baseline: cli.baseline.display().to_string(),
        candidate: cli.candidate.display().to_string(),
    };
    for output in sink::for_run(&cli.out_dir, inputs, !cli.no_chart) {
        output.write(&result)?;
        writeln!(out, "Wrote {}", output.path().display())?;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("har-compare: {:#}", e);
        process::exit(1);
    }
}
