//! Core engine: validates parameters, then runs match -> delta -> filter/rank.

use tracing::{debug, info};

use crate::capture::{self, Capture};
use crate::config::Config;
use crate::delta;
use crate::error::EngineError;
use crate::matcher;
use crate::rank;
use crate::types::*;

/// The comparison engine. Holds configuration only; every run is independent.
pub struct Engine {
  config: Config,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// A selection with no filters and the configured default top-N.
  pub fn default_selection(&self) -> Selection {
    Selection::top(self.config.default_top_n)
  }

  /// Load one raw HAR document using this engine's identity and strictness settings.
  pub fn load(&self, raw: &str) -> Result<Capture, EngineError> {
    capture::load(raw, &self.config)
  }

  /// Compare two record sequences.
  ///
  /// Either the whole pipeline completes or an error is returned before any
  /// matching work; there are no partial results.
  pub fn compare(
    &self,
    baseline: Vec<TimingRecord>,
    candidate: Vec<TimingRecord>,
    selection: &Selection,
  ) -> Result<ComparisonResult, EngineError> {
    rank::validate(selection)?;

    let baseline_records = baseline.len();
    let candidate_records = candidate.len();

    let pairs = delta::compute_all(matcher::match_records(baseline, candidate));
    let matched_pairs = pairs.iter().filter(|p| p.is_matched()).count();
    debug!(pairs = pairs.len(), matched_pairs, "matched");

    let selected = rank::select(pairs, selection, self.config.status_match)?;

    // Counted after filtering so they agree with `unmatched`.
    let baseline_only = selected
      .unmatched
      .iter()
      .filter(|p| matches!(p.sides, Sides::BaselineOnly(_)))
      .count();
    let candidate_only = selected.unmatched.len() - baseline_only;

    let summary = Summary {
      baseline_records,
      candidate_records,
      matched_pairs,
      baseline_only,
      candidate_only,
      eligible: selected.eligible,
      ranked: selected.ranked.len(),
      net_total_delta: selected.net_total_delta,
    };
    info!(
      baseline_records,
      candidate_records,
      matched_pairs,
      ranked = summary.ranked,
      "comparison complete"
    );

    Ok(ComparisonResult {
      selection: selection.clone(),
      ranked: selected.ranked,
      unmatched: selected.unmatched,
      summary,
    })
  }

  /// Compare two loaded captures. Loader issues are not carried into the result.
  pub fn compare_captures(
    &self,
    baseline: Capture,
    candidate: Capture,
    selection: &Selection,
  ) -> Result<ComparisonResult, EngineError> {
    self.compare(baseline.records, candidate.records, selection)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::StatusMatch;

  fn rec(identity: &str, status: u16, dns: f64, wait: f64) -> TimingRecord {
    TimingRecord::new(
      identity,
      Timings::from_raw([0.0, dns, 0.0, 0.0, wait, 0.0]),
    )
    .with_status(Some(status))
  }

  #[test]
  fn single_regression_end_to_end() {
    let engine = Engine::with_defaults();
    let result = engine
      .compare(
        vec![rec("/a", 200, 10.0, 100.0)],
        vec![rec("/a", 200, 50.0, 100.0)],
        &engine.default_selection(),
      )
      .unwrap();
    assert_eq!(result.ranked.len(), 1);
    let pair = &result.ranked[0];
    assert_eq!(pair.deltas[Phase::Dns], Some(40.0));
    assert_eq!(pair.total_delta, Some(40.0));
    assert_eq!(result.summary.matched_pairs, 1);
    assert_eq!(result.summary.net_total_delta, 40.0);
  }

  #[test]
  fn summary_counts_every_side() {
    let engine = Engine::with_defaults();
    let result = engine
      .compare(
        vec![rec("/b", 200, 1.0, 1.0), rec("/b", 200, 1.0, 1.0), rec("/old", 200, 1.0, 1.0)],
        vec![rec("/b", 200, 2.0, 2.0), rec("/new", 200, 1.0, 1.0)],
        &Selection::top(10),
      )
      .unwrap();
    let s = &result.summary;
    assert_eq!((s.baseline_records, s.candidate_records), (3, 2));
    assert_eq!((s.matched_pairs, s.baseline_only, s.candidate_only), (1, 2, 1));
    assert_eq!(result.unmatched.len(), 3);
    assert_eq!(s.ranked, 1);
  }

  #[test]
  fn unmatched_counts_follow_the_filters() {
    let engine = Engine::with_defaults();
    let result = engine
      .compare(
        vec![rec("/a", 200, 1.0, 1.0), rec("/gone", 500, 1.0, 1.0)],
        vec![rec("/a", 200, 1.0, 2.0)],
        &Selection::top(10).with_status(200),
      )
      .unwrap();
    assert!(result.unmatched.is_empty());
    assert_eq!((result.summary.baseline_only, result.summary.candidate_only), (0, 0));
    assert_eq!(result.summary.matched_pairs, 1);

    let result = engine
      .compare(
        vec![rec("/a", 200, 1.0, 1.0), rec("/gone", 500, 1.0, 1.0)],
        vec![rec("/a", 200, 1.0, 2.0)],
        &Selection::top(10).with_status(500),
      )
      .unwrap();
    assert_eq!(result.unmatched.len(), 1);
    assert_eq!((result.summary.baseline_only, result.summary.candidate_only), (1, 0));
  }

  #[test]
  fn invalid_selection_fails_before_matching() {
    let engine = Engine::with_defaults();
    let err = engine
      .compare(vec![rec("/a", 200, 1.0, 1.0)], vec![], &Selection::top(0))
      .unwrap_err();
    assert!(matches!(err, EngineError::InvalidFilter { .. }));
  }

  #[test]
  fn configured_status_policy_is_used() {
    let engine = Engine::new(Config {
      status_match: StatusMatch::Both,
      ..Config::default()
    });
    let result = engine
      .compare(
        vec![rec("/flip", 200, 1.0, 1.0)],
        vec![rec("/flip", 500, 1.0, 9.0)],
        &Selection::top(5).with_status(500),
      )
      .unwrap();
    assert!(result.ranked.is_empty());
  }

  #[test]
  fn default_selection_uses_config() {
    let engine = Engine::new(Config {
      default_top_n: 3,
      ..Config::default()
    });
    assert_eq!(engine.default_selection(), Selection::top(3));
  }
}
