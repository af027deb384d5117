//! Structured error types for the delta engine.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
  /// The raw capture is not the expected structured document. Always fatal.
  #[error("malformed capture: {0}")]
  MalformedCapture(String),

  /// An entry lacks an expected field. Recovered as a sentinel unless strict.
  #[error("missing field: entry {entry}: {field}")]
  MissingField { entry: usize, field: String },

  #[error("invalid filter: {param}: {reason}")]
  InvalidFilter { param: String, reason: String },
}

impl EngineError {
  pub fn malformed(msg: impl Into<String>) -> Self {
    Self::MalformedCapture(msg.into())
  }

  pub fn missing_field(entry: usize, field: &str) -> Self {
    Self::MissingField {
      entry,
      field: field.to_string(),
    }
  }

  pub fn invalid_filter(param: &str, reason: &str) -> Self {
    Self::InvalidFilter {
      param: param.to_string(),
      reason: reason.to_string(),
    }
  }

  /// True for errors that abort the whole comparison.
  pub fn is_fatal(&self) -> bool {
    !matches!(self, Self::MissingField { .. })
  }
}
