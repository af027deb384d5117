//! Pair baseline and candidate records by identity.
//!
//! The k-th baseline occurrence of an identity pairs with the k-th candidate
//! occurrence; whatever is left over on the longer side becomes a one-sided pair.

use std::collections::{HashMap, VecDeque};

use crate::types::{RecordPair, Sides, TimingRecord};

#[derive(Default)]
struct Group {
  baseline: VecDeque<TimingRecord>,
  candidate: VecDeque<TimingRecord>,
}

/// Pair every record from both captures exactly once.
///
/// Output is ordered by each identity's first appearance in baseline-then-candidate,
/// then by occurrence within the identity.
pub fn match_records(baseline: Vec<TimingRecord>, candidate: Vec<TimingRecord>) -> Vec<RecordPair> {
  let mut order: Vec<String> = Vec::new();
  let mut groups: HashMap<String, Group> = HashMap::new();

  for record in baseline {
    group_for(&mut groups, &mut order, record.identity())
      .baseline
      .push_back(record);
  }
  for record in candidate {
    group_for(&mut groups, &mut order, record.identity())
      .candidate
      .push_back(record);
  }

  let capacity: usize = groups
    .values()
    .map(|g| g.baseline.len().max(g.candidate.len()))
    .sum();
  let mut pairs = Vec::with_capacity(capacity);
  for identity in order {
    let Some(mut group) = groups.remove(&identity) else {
      continue;
    };
    let mut occurrence = 0;
    loop {
      let sides = match (group.baseline.pop_front(), group.candidate.pop_front()) {
        (Some(baseline), Some(candidate)) => Sides::Both { baseline, candidate },
        (Some(baseline), None) => Sides::BaselineOnly(baseline),
        (None, Some(candidate)) => Sides::CandidateOnly(candidate),
        (None, None) => break,
      };
      pairs.push(RecordPair {
        identity: identity.clone(),
        occurrence,
        sides,
      });
      occurrence += 1;
    }
  }
  pairs
}

fn group_for<'a>(
  groups: &'a mut HashMap<String, Group>,
  order: &mut Vec<String>,
  identity: &str,
) -> &'a mut Group {
  if !groups.contains_key(identity) {
    order.push(identity.to_string());
  }
  groups.entry(identity.to_string()).or_default()
}
