//! Validation errors shared across Verdict crates.
//!
//! Storage and aggregation failures live in their own crates
//! (`DatabaseError`, `AggregationError`); the `vrd` binary converges
//! everything into `anyhow`.

use thiserror::Error;

/// Boundary contract violations for inbound evidence, submissions and feedback.
///
/// These are raised before anything reaches storage or the decision policy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The source is not one of the enumerated evidence producers.
    #[error("Unknown evidence source '{0}'")]
    UnknownSource(String),

    /// The verdict is not `true`, `false` or `unknown`.
    #[error("Unknown verdict '{0}'")]
    UnknownVerdict(String),

    /// Confidence is NaN, infinite, or outside `[0, 1]`.
    #[error("Confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    /// A required reference (submission id) is missing or blank.
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    /// A latency measurement below zero.
    #[error("Latency {0}ms is negative")]
    NegativeLatency(i64),
}
