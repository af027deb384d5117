//! Command-line arguments for har-compare

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use delta_engine::{Config, IdentityMode, Selection, StatusMatch};

/// Which side(s) of a matched pair must carry the `--status` code
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusMatchArg {
    /// Baseline or candidate (default)
    Either,
    /// Baseline and candidate
    Both,
    /// The baseline side only
    Present,
}

impl From<StatusMatchArg> for StatusMatch {
    fn from(arg: StatusMatchArg) -> Self {
        match arg {
            StatusMatchArg::Either => StatusMatch::Either,
            StatusMatchArg::Both => StatusMatch::Both,
            StatusMatchArg::Present => StatusMatch::Present,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "har-compare")]
#[command(version)]
#[command(about = "Compare two HAR captures and rank per-request latency deltas", long_about = None)]
pub struct Cli {
    /// Baseline HAR capture
    #[arg(value_name = "BASELINE")]
    pub baseline: PathBuf,

    /// Candidate HAR capture
    #[arg(value_name = "CANDIDATE")]
    pub candidate: PathBuf,

    /// Number of requests to rank (default: 10)
    #[arg(short = 'n', long = "top", value_name = "N")]
    pub top: Option<usize>,

    /// Only keep requests whose URL contains this string (case-sensitive)
    #[arg(short = 'd', long = "domain", value_name = "SUBSTRING")]
    pub domain: Option<String>,

    /// Only keep requests with this HTTP status code
    #[arg(
        short = 's',
        long = "status",
        value_name = "CODE",
        value_parser = clap::value_parser!(u16).range(0..=999)
    )]
    pub status: Option<u16>,

    /// How --status treats pairs whose status changed
    #[arg(long = "status-match", value_enum, default_value = "either")]
    pub status_match: StatusMatchArg,

    /// Key requests on "METHOD url" instead of the URL alone
    #[arg(long = "match-method")]
    pub match_method: bool,

    /// Fail on entries with missing timing or status fields
    #[arg(long)]
    pub strict: bool,

    /// Directory for slowest_requests.csv/.json and latency_deltas.svg
    #[arg(short = 'o', long = "out-dir", value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Print the report only; write no files
    #[arg(long = "no-export")]
    pub no_export: bool,

    /// Skip the bar chart
    #[arg(long = "no-chart")]
    pub no_chart: bool,

    /// Debug logging to stderr (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            identity: if self.match_method {
                IdentityMode::MethodAndUrl
            } else {
                IdentityMode::Url
            },
            status_match: self.status_match.into(),
            strict: self.strict,
            ..Config::default()
        }
    }

    pub fn selection(&self, config: &Config) -> Selection {
        Selection {
            domain: self.domain.clone(),
            status: self.status,
            top_n: self.top.unwrap_or(config.default_top_n),
        }
    }
}
