//! CSV output for spreadsheet analysis
//!
//! One row per ranked pair; incomparable phase deltas are empty cells.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use delta_engine::{ComparisonResult, MatchedPair, Phase};

use super::Sink;

#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Header row: fixed columns plus one `<phase>_delta` per phase
    fn header() -> String {
        let mut headers = vec![
            "rank".to_string(),
            "id".to_string(),
            "identity".to_string(),
            "baseline_status".to_string(),
            "candidate_status".to_string(),
        ];
        headers.extend(Phase::ALL.iter().map(|p| format!("{}_delta", p)));
        headers.extend(
            ["baseline_total", "candidate_total", "total_delta"]
                .iter()
                .map(|s| s.to_string()),
        );
        headers.join(",")
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn number(value: Option<f64>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    fn status(value: Option<u16>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    fn format_pair(rank: usize, pair: &MatchedPair) -> String {
        let baseline = pair.baseline();
        let candidate = pair.candidate();
        let mut fields = vec![
            rank.to_string(),
            pair.id.clone(),
            Self::escape_field(&pair.identity),
            Self::status(baseline.and_then(|r| r.status())),
            Self::status(candidate.and_then(|r| r.status())),
        ];
        fields.extend(Phase::ALL.iter().map(|&p| Self::number(pair.deltas[p])));
        fields.push(Self::number(baseline.map(|r| r.total())));
        fields.push(Self::number(candidate.map(|r| r.total())));
        fields.push(Self::number(pair.total_delta));
        fields.join(",")
    }

    /// Render the ranked pairs as CSV text
    pub fn render(result: &ComparisonResult) -> String {
        let mut output = Self::header();
        output.push('\n');
        for (i, pair) in result.ranked.iter().enumerate() {
            output.push_str(&Self::format_pair(i + 1, pair));
            output.push('\n');
        }
        output
    }
}

impl Sink for CsvSink {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, result: &ComparisonResult) -> Result<()> {
        fs::write(&self.path, Self::render(result))
            .with_context(|| format!("writing {}", self.path.display()))
    }
}
