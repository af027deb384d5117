//! Load raw HAR captures into normalized timing records.
//!
//! This is the only place that looks at loosely structured input. A document
//! without `log.entries[]`, or an entry without `request.url`, is malformed and
//! aborts the load. Anything else that is missing degrades to a sentinel and is
//! recorded as an issue on the returned [`Capture`].

use std::io::Read;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{Config, IdentityMode};
use crate::error::EngineError;
use crate::types::*;

/// Records loaded from one capture, plus the non-fatal issues hit on the way.
#[derive(Debug, Clone, Default)]
pub struct Capture {
  pub records: Vec<TimingRecord>,
  /// Always `EngineError::MissingField`.
  pub issues: Vec<EngineError>,
}

impl Capture {
  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }
}

/// Parse a HAR document held in memory.
pub fn load(raw: &str, config: &Config) -> Result<Capture, EngineError> {
  let doc: HarDocument =
    serde_json::from_str(raw).map_err(|e| EngineError::malformed(e.to_string()))?;
  from_document(&doc, config)
}

/// Parse a HAR document from any reader.
pub fn load_reader<R: Read>(reader: R, config: &Config) -> Result<Capture, EngineError> {
  let doc: HarDocument =
    serde_json::from_reader(reader).map_err(|e| EngineError::malformed(e.to_string()))?;
  from_document(&doc, config)
}

/// Normalize an already-deserialized document.
pub fn from_document(doc: &HarDocument, config: &Config) -> Result<Capture, EngineError> {
  let mut capture = Capture {
    records: Vec::with_capacity(doc.log.entries.len()),
    issues: Vec::new(),
  };

  for (index, entry) in doc.log.entries.iter().enumerate() {
    let record = normalize_entry(index, entry, config.identity, &mut capture.issues)?;
    if config.strict {
      if let Some(first) = capture.issues.first() {
        return Err(first.clone());
      }
    }
    capture.records.push(record);
  }

  if !capture.issues.is_empty() {
    warn!(
      entries = capture.records.len(),
      issues = capture.issues.len(),
      "capture has entries with missing fields; degraded to sentinel"
    );
  }
  Ok(capture)
}

fn normalize_entry(
  index: usize,
  entry: &HarEntry,
  mode: IdentityMode,
  issues: &mut Vec<EngineError>,
) -> Result<TimingRecord, EngineError> {
  let url = entry
    .request
    .as_ref()
    .and_then(|r| r.url.as_deref())
    .ok_or_else(|| EngineError::malformed(format!("entry {}: missing request.url", index)))?;
  if url.is_empty() {
    debug!(entry = index, "empty request.url kept as identity");
  }

  let method = entry
    .request
    .as_ref()
    .and_then(|r| r.method.clone())
    .filter(|m| !m.is_empty());

  let identity = match (mode, &method) {
    (IdentityMode::MethodAndUrl, Some(m)) => format!("{} {}", m, url),
    _ => url.to_string(),
  };

  let status = parse_status(index, entry.response.as_ref(), issues);
  let phases = parse_timings(index, entry.timings.as_ref(), issues);

  // Not part of the matching contract; an unparseable timestamp is just dropped.
  let started_at = entry.started_date_time.as_deref().and_then(|s| {
    DateTime::parse_from_rfc3339(s)
      .map_err(|e| debug!(entry = index, error = %e, "ignoring invalid startedDateTime"))
      .ok()
      .map(|t| t.with_timezone(&Utc))
  });

  Ok(
    TimingRecord::new(identity, phases)
      .with_url(url)
      .with_method(method)
      .with_status(status)
      .with_started_at(started_at),
  )
}

fn parse_status(
  index: usize,
  response: Option<&HarResponse>,
  issues: &mut Vec<EngineError>,
) -> Option<u16> {
  let status = response
    .and_then(|r| r.status.as_ref())
    .and_then(Value::as_u64)
    .and_then(|s| u16::try_from(s).ok());
  if status.is_none() {
    record_issue(index, "response.status", issues);
  }
  status
}

fn parse_timings(
  index: usize,
  timings: Option<&Value>,
  issues: &mut Vec<EngineError>,
) -> Timings {
  let Some(obj) = timings.and_then(Value::as_object) else {
    record_issue(index, "timings", issues);
    return Timings::unmeasured();
  };

  let mut phases = Timings::unmeasured();
  for phase in Phase::ALL {
    match obj.get(phase.as_str()).and_then(Value::as_f64) {
      Some(ms) => phases = phases.with(phase, ms),
      None => record_issue(index, &format!("timings.{}", phase), issues),
    }
  }
  phases
}

fn record_issue(index: usize, field: &str, issues: &mut Vec<EngineError>) {
  debug!(entry = index, field, "missing field; using sentinel");
  issues.push(EngineError::missing_field(index, field));
}
