//! HAR Timing Delta Engine: deterministic comparison of two captures.
//!
//! Loads baseline and candidate HAR documents into typed timing records, pairs
//! requests by identity (positionally for duplicates), computes per-phase and
//! total deltas, filters by domain/status and ranks by `|total_delta|`.
//!
//! No DB, no network, no file I/O; pure computation over in-memory inputs.

pub mod capture;
pub mod config;
pub mod delta;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod matcher;
pub mod rank;
pub mod types;

pub use capture::Capture;
pub use config::{Config, IdentityMode, StatusMatch};
pub use engine::Engine;
pub use error::EngineError;
pub use types::{ComparisonResult, MatchedPair, Phase, Selection, TimingRecord, Timings};
