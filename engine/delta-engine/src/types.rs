//! Core types for the delta engine (HAR contract + normalized models + results).

use std::fmt;
use std::ops::Index;

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

/// Raw marker for "phase not applicable/measured" in HAR timings.
pub const SENTINEL: f64 = -1.0;

// ---------------------------------------------------------------------------
// Inbound types (HAR contract read by the loader)
// ---------------------------------------------------------------------------

/// Top-level HAR document. Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct HarDocument {
  pub log: HarLog,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarLog {
  pub entries: Vec<HarEntry>,
}

/// One `log.entries[]` element. Everything is optional here; the loader
/// decides what is fatal and what degrades to a sentinel.
#[derive(Debug, Clone, Deserialize)]
pub struct HarEntry {
  #[serde(default, rename = "startedDateTime")]
  pub started_date_time: Option<String>,
  #[serde(default)]
  pub request: Option<HarRequest>,
  #[serde(default)]
  pub response: Option<HarResponse>,
  #[serde(default)]
  pub timings: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarRequest {
  #[serde(default)]
  pub url: Option<String>,
  #[serde(default)]
  pub method: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarResponse {
  #[serde(default)]
  pub status: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
  Blocked,
  Dns,
  Connect,
  Send,
  Wait,
  Receive,
}

impl Phase {
  /// Every recognized phase, in HAR order.
  pub const ALL: [Phase; 6] = [
    Phase::Blocked,
    Phase::Dns,
    Phase::Connect,
    Phase::Send,
    Phase::Wait,
    Phase::Receive,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Blocked => "blocked",
      Self::Dns => "dns",
      Self::Connect => "connect",
      Self::Send => "send",
      Self::Wait => "wait",
      Self::Receive => "receive",
    }
  }

  fn index(self) -> usize {
    self as usize
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.as_str())
  }
}

/// A value for each of the six phases. Never has missing keys.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseMap<T>([T; 6]);

impl<T> PhaseMap<T> {
  pub fn from_fn(f: impl FnMut(Phase) -> T) -> Self {
    Self(Phase::ALL.map(f))
  }

  pub fn get(&self, phase: Phase) -> &T {
    &self.0[phase.index()]
  }

  pub fn iter(&self) -> impl Iterator<Item = (Phase, &T)> {
    Phase::ALL.into_iter().zip(self.0.iter())
  }

  pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PhaseMap<U> {
    PhaseMap::from_fn(|p| f(self.get(p)))
  }
}

impl<T> Index<Phase> for PhaseMap<T> {
  type Output = T;

  fn index(&self, phase: Phase) -> &T {
    self.get(phase)
  }
}

impl<T: Serialize> Serialize for PhaseMap<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(Phase::ALL.len()))?;
    for (phase, value) in self.iter() {
      map.serialize_entry(phase.as_str(), value)?;
    }
    map.end()
  }
}

/// Phase durations in milliseconds; `None` is the sentinel.
pub type Timings = PhaseMap<Option<f64>>;

impl PhaseMap<Option<f64>> {
  /// All six phases set to the sentinel.
  pub fn unmeasured() -> Self {
    Self([None; 6])
  }

  /// Build from raw HAR values, where any negative number is the sentinel.
  pub fn from_raw(raw: [f64; 6]) -> Self {
    Self(raw.map(measured))
  }

  pub fn with(mut self, phase: Phase, ms: f64) -> Self {
    self.0[phase.index()] = measured(ms);
    self
  }

  /// Sum of the measured phases; sentinels are skipped, not counted as zero.
  pub fn measured_sum(&self) -> f64 {
    self.0.iter().flatten().sum()
  }
}

/// `Some(ms)` for a real measurement, `None` for a sentinel or non-finite value.
fn measured(ms: f64) -> Option<f64> {
  if ms.is_finite() && ms >= 0.0 {
    Some(ms)
  } else {
    None
  }
}

fn serialize_har_timings<S: Serializer>(timings: &Timings, serializer: S) -> Result<S::Ok, S::Error> {
  timings.map(|v| v.unwrap_or(SENTINEL)).serialize(serializer)
}

// ---------------------------------------------------------------------------
// Timing record (normalized, immutable)
// ---------------------------------------------------------------------------

/// One request's identity and phase timings, as produced by the loader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingRecord {
  identity: String,
  url: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  method: Option<String>,
  status: Option<u16>,
  #[serde(skip_serializing_if = "Option::is_none")]
  started_at: Option<DateTime<Utc>>,
  #[serde(serialize_with = "serialize_har_timings")]
  phases: Timings,
  total: f64,
}

impl TimingRecord {
  /// A record keyed on `identity`, which doubles as its URL until
  /// [`with_url`](Self::with_url) says otherwise.
  pub fn new(identity: impl Into<String>, phases: Timings) -> Self {
    let identity = identity.into();
    Self {
      url: identity.clone(),
      identity,
      method: None,
      status: None,
      started_at: None,
      total: phases.measured_sum(),
      phases,
    }
  }

  pub fn with_url(mut self, url: impl Into<String>) -> Self {
    self.url = url.into();
    self
  }

  pub fn with_method(mut self, method: Option<String>) -> Self {
    self.method = method;
    self
  }

  pub fn with_status(mut self, status: Option<u16>) -> Self {
    self.status = status;
    self
  }

  pub fn with_started_at(mut self, started_at: Option<DateTime<Utc>>) -> Self {
    self.started_at = started_at;
    self
  }

  pub fn identity(&self) -> &str {
    &self.identity
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  pub fn method(&self) -> Option<&str> {
    self.method.as_deref()
  }

  pub fn status(&self) -> Option<u16> {
    self.status
  }

  pub fn started_at(&self) -> Option<DateTime<Utc>> {
    self.started_at
  }

  pub fn phases(&self) -> &Timings {
    &self.phases
  }

  pub fn phase(&self, phase: Phase) -> Option<f64> {
    self.phases[phase]
  }

  pub fn total(&self) -> f64 {
    self.total
  }
}

// ---------------------------------------------------------------------------
// Pairs
// ---------------------------------------------------------------------------

/// The records on each side of a pair. At least one side is always present.
#[derive(Debug, Clone, PartialEq)]
pub enum Sides {
  Both {
    baseline: TimingRecord,
    candidate: TimingRecord,
  },
  BaselineOnly(TimingRecord),
  CandidateOnly(TimingRecord),
}

impl Sides {
  pub fn baseline(&self) -> Option<&TimingRecord> {
    match self {
      Self::Both { baseline, .. } | Self::BaselineOnly(baseline) => Some(baseline),
      Self::CandidateOnly(_) => None,
    }
  }

  pub fn candidate(&self) -> Option<&TimingRecord> {
    match self {
      Self::Both { candidate, .. } | Self::CandidateOnly(candidate) => Some(candidate),
      Self::BaselineOnly(_) => None,
    }
  }

  /// The baseline if present, otherwise the candidate.
  pub fn present(&self) -> &TimingRecord {
    match self {
      Self::Both { baseline, .. } | Self::BaselineOnly(baseline) => baseline,
      Self::CandidateOnly(candidate) => candidate,
    }
  }
}

/// Matcher output: records paired by identity and occurrence, no deltas yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPair {
  pub identity: String,
  /// Zero-based occurrence of `identity` on each side.
  pub occurrence: usize,
  pub sides: Sides,
}

/// A pair with its deltas populated.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedPair {
  /// Stable id derived from identity + occurrence.
  pub id: String,
  pub identity: String,
  pub occurrence: usize,
  pub sides: Sides,
  /// `None` marks an incomparable phase (sentinel on either side, or a missing side).
  pub deltas: PhaseMap<Option<f64>>,
  /// Defined only when both sides are present.
  pub total_delta: Option<f64>,
}

impl MatchedPair {
  pub fn baseline(&self) -> Option<&TimingRecord> {
    self.sides.baseline()
  }

  pub fn candidate(&self) -> Option<&TimingRecord> {
    self.sides.candidate()
  }

  pub fn is_matched(&self) -> bool {
    matches!(self.sides, Sides::Both { .. })
  }

  pub fn status_changed(&self) -> bool {
    match &self.sides {
      Sides::Both { baseline, candidate } => baseline.status() != candidate.status(),
      _ => false,
    }
  }
}

impl Serialize for MatchedPair {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut s = serializer.serialize_struct("MatchedPair", 7)?;
    s.serialize_field("id", &self.id)?;
    s.serialize_field("identity", &self.identity)?;
    s.serialize_field("occurrence", &self.occurrence)?;
    s.serialize_field("baseline", &self.baseline())?;
    s.serialize_field("candidate", &self.candidate())?;
    s.serialize_field("deltas", &self.deltas)?;
    s.serialize_field("total_delta", &self.total_delta)?;
    s.end()
  }
}

// ---------------------------------------------------------------------------
// Selection + results (what the exporter consumes)
// ---------------------------------------------------------------------------

/// Filter and top-N parameters for one comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
  /// Case-sensitive substring the identity must contain.
  pub domain: Option<String>,
  /// Exact status code to keep.
  pub status: Option<u16>,
  pub top_n: usize,
}

impl Selection {
  pub fn top(top_n: usize) -> Self {
    Self {
      domain: None,
      status: None,
      top_n,
    }
  }

  pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
    self.domain = Some(domain.into());
    self
  }

  pub fn with_status(mut self, status: u16) -> Self {
    self.status = Some(status);
    self
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
  pub baseline_records: usize,
  pub candidate_records: usize,
  pub matched_pairs: usize,
  /// One-sided pairs surviving the filters; these match `ComparisonResult::unmatched`.
  pub baseline_only: usize,
  pub candidate_only: usize,
  /// Matched pairs surviving the filters, before truncation.
  pub eligible: usize,
  pub ranked: usize,
  /// Sum of `total_delta` over eligible pairs.
  pub net_total_delta: f64,
}

/// Complete output of one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
  pub selection: Selection,
  /// Fully matched pairs, biggest `|total_delta|` first.
  pub ranked: Vec<MatchedPair>,
  /// Pairs missing one side, in matcher order, after filtering.
  pub unmatched: Vec<MatchedPair>,
  pub summary: Summary,
}

impl ComparisonResult {
  pub fn has_ranked(&self) -> bool {
    !self.ranked.is_empty()
  }
}
