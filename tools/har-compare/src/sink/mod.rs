//! Output sinks for a finished comparison
//!
//! Each sink renders the in-memory result itself and owns its I/O errors.

mod chart;
mod csv;
mod json;

use std::path::Path;

use anyhow::Result;
use delta_engine::ComparisonResult;

pub use chart::ChartSink;
pub use csv::CsvSink;
pub use json::{JsonSink, RunInputs};

pub const CSV_FILE: &str = "slowest_requests.csv";
pub const JSON_FILE: &str = "slowest_requests.json";
pub const CHART_FILE: &str = "latency_deltas.svg";

/// A destination for ranked results
pub trait Sink {
    /// Path written by this sink, for log and console messages
    fn path(&self) -> &Path;

    fn write(&self, result: &ComparisonResult) -> Result<()>;
}

/// The sinks enabled for one run, all under `out_dir`
pub fn for_run(out_dir: &Path, inputs: RunInputs, chart: bool) -> Vec<Box<dyn Sink>> {
    let mut sinks: Vec<Box<dyn Sink>> = vec![
        Box::new(CsvSink::new(out_dir.join(CSV_FILE))),
        Box::new(JsonSink::new(out_dir.join(JSON_FILE), inputs)),
    ];
    if chart {
        sinks.push(Box::new(ChartSink::new(out_dir.join(CHART_FILE))));
    }
    sinks
}
