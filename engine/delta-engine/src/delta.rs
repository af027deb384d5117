//! Per-phase and total timing deltas for matched pairs.

use crate::fingerprint;
use crate::types::{MatchedPair, PhaseMap, RecordPair, Sides};

/// Populate deltas for one pair. Pure; never fails.
///
/// A phase delta exists only when both sides measured that phase. `total_delta`
/// exists whenever both sides are present, whatever the phase comparability.
pub fn compute(pair: RecordPair) -> MatchedPair {
  let (deltas, total_delta) = match &pair.sides {
    Sides::Both { baseline, candidate } => {
      let deltas = PhaseMap::from_fn(|phase| match (baseline.phase(phase), candidate.phase(phase)) {
        (Some(b), Some(c)) => Some(c - b),
        _ => None,
      });
      (deltas, Some(candidate.total() - baseline.total()))
    }
    Sides::BaselineOnly(_) | Sides::CandidateOnly(_) => (PhaseMap::default(), None),
  };

  MatchedPair {
    id: fingerprint::pair_id(&pair.identity, pair.occurrence),
    identity: pair.identity,
    occurrence: pair.occurrence,
    sides: pair.sides,
    deltas,
    total_delta,
  }
}

/// Populate deltas for every pair, keeping matcher order.
pub fn compute_all(pairs: Vec<RecordPair>) -> Vec<MatchedPair> {
  pairs.into_iter().map(compute).collect()
}
