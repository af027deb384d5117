//! Engine configuration with sane defaults.

use serde::{Deserialize, Serialize};

/// How a record's comparison key is built from the captured request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityMode {
  /// The request URL exactly as captured.
  #[default]
  Url,
  /// `"METHOD url"` when the entry carries a method, otherwise the URL alone.
  MethodAndUrl,
}

/// Which side(s) of a fully matched pair must satisfy a status filter.
///
/// Unmatched pairs always test their one present side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMatch {
  /// Baseline or candidate status equals the filter.
  #[default]
  Either,
  /// Both statuses equal the filter.
  Both,
  /// The present side, baseline preferred.
  Present,
}

/// Process-wide settings, passed into the engine rather than held globally.
#[derive(Debug, Clone)]
pub struct Config {
  /// Ranked pairs to keep when the caller does not ask for a count.
  pub default_top_n: usize,
  pub identity: IdentityMode,
  pub status_match: StatusMatch,
  /// Treat missing entry fields as fatal instead of degrading to sentinel.
  pub strict: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      default_top_n: 10,
      identity: IdentityMode::Url,
      status_match: StatusMatch::Either,
      strict: false,
    }
  }
}
