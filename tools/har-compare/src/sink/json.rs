//! JSON output: the full comparison result plus the inputs that produced it

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use delta_engine::ComparisonResult;
use serde::Serialize;

use super::Sink;

/// Capture paths recorded alongside the result
#[derive(Debug, Clone, Serialize)]
pub struct RunInputs {
    pub baseline: String,
    pub candidate: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    inputs: &'a RunInputs,
    #[serde(flatten)]
    result: &'a ComparisonResult,
}

#[derive(Debug)]
pub struct JsonSink {
    path: PathBuf,
    inputs: RunInputs,
}

impl JsonSink {
    pub fn new(path: PathBuf, inputs: RunInputs) -> Self {
        Self { path, inputs }
    }

    pub fn render(&self, result: &ComparisonResult) -> Result<String> {
        let report = JsonReport {
            inputs: &self.inputs,
            result,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

impl Sink for JsonSink {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, result: &ComparisonResult) -> Result<()> {
        let mut text = self.render(result)?;
        text.push('\n');
        fs::write(&self.path, text).with_context(|| format!("writing {}", self.path.display()))
    }
}
