//! Filter pairs by domain/status and rank them by regression magnitude.
//!
//! Ranking: descending `|total_delta|`, ties keep matcher order (stable sort).

use tracing::debug;

use crate::config::StatusMatch;
use crate::error::EngineError;
use crate::types::{MatchedPair, Selection, Sides};

/// Highest status code accepted by the status filter.
const MAX_STATUS: u16 = 999;

/// Output of [`select`]: ranked pairs and the one-sided pairs set aside.
#[derive(Debug, Clone, Default)]
pub struct Selected {
  /// Fully matched pairs that passed the filters, biggest `|total_delta|` first, truncated.
  pub ranked: Vec<MatchedPair>,
  /// Matched pairs that passed the filters, before truncation.
  pub eligible: usize,
  /// Sum of `total_delta` over every eligible pair.
  pub net_total_delta: f64,
  /// One-sided pairs that passed the filters, in matcher order.
  pub unmatched: Vec<MatchedPair>,
}

/// Reject parameters outside their documented bounds.
pub fn validate(selection: &Selection) -> Result<(), EngineError> {
  if selection.top_n == 0 {
    return Err(EngineError::invalid_filter("top_n", "must be a positive integer"));
  }
  if let Some(domain) = &selection.domain {
    if domain.is_empty() {
      return Err(EngineError::invalid_filter("domain", "must not be empty"));
    }
  }
  if let Some(status) = selection.status {
    if status > MAX_STATUS {
      return Err(EngineError::invalid_filter(
        "status",
        &format!("expected 0..={}, got {}", MAX_STATUS, status),
      ));
    }
  }
  Ok(())
}

/// Filter, rank and truncate.
pub fn select(
  pairs: Vec<MatchedPair>,
  selection: &Selection,
  policy: StatusMatch,
) -> Result<Selected, EngineError> {
  validate(selection)?;

  let (mut ranked, unmatched): (Vec<_>, Vec<_>) = pairs
    .into_iter()
    .filter(|p| passes_domain(p, selection.domain.as_deref()))
    .filter(|p| passes_status(p, selection.status, policy))
    .partition(|p| p.total_delta.is_some());

  let eligible = ranked.len();
  let net_total_delta: f64 = ranked.iter().filter_map(|p| p.total_delta).sum();

  // `sort_by` is stable, which keeps matcher order for equal magnitudes.
  ranked.sort_by(|a, b| magnitude(b).total_cmp(&magnitude(a)));
  ranked.truncate(selection.top_n);

  debug!(
    eligible,
    ranked = ranked.len(),
    unmatched = unmatched.len(),
    "selection complete"
  );

  Ok(Selected {
    ranked,
    eligible,
    net_total_delta,
    unmatched,
  })
}

fn magnitude(pair: &MatchedPair) -> f64 {
  pair.total_delta.map(f64::abs).unwrap_or(0.0)
}

/// Substring test on the present side's identity, baseline preferred.
fn passes_domain(pair: &MatchedPair, domain: Option<&str>) -> bool {
  match domain {
    Some(d) => pair.sides.present().identity().contains(d),
    None => true,
  }
}

fn passes_status(pair: &MatchedPair, status: Option<u16>, policy: StatusMatch) -> bool {
  let Some(wanted) = status else {
    return true;
  };
  let is = |s: Option<u16>| s == Some(wanted);
  match (&pair.sides, policy) {
    (Sides::Both { baseline, candidate }, StatusMatch::Either) => {
      is(baseline.status()) || is(candidate.status())
    }
    (Sides::Both { baseline, candidate }, StatusMatch::Both) => {
      is(baseline.status()) && is(candidate.status())
    }
    (sides, _) => is(sides.present().status()),
  }
}
