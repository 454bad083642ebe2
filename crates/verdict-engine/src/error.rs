//! Aggregation error types.

use std::sync::Arc;

use thiserror::Error;
use verdict_core::errors::ValidationError;
use verdict_db::error::DatabaseError;

/// Errors surfaced to callers awaiting a recomputation.
///
/// Cloneable because one recomputation can answer several coalesced callers.
#[derive(Debug, Clone, Error)]
pub enum AggregationError {
    /// The submission does not exist. Never retried.
    #[error("Unknown submission: {0}")]
    UnknownSubmission(String),

    /// Evidence rejected before it reached storage.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage kept failing after every retry. The previous decision is
    /// unchanged and the worker keeps recomputing until storage recovers.
    #[error("Storage failure: {0}")]
    Storage(#[source] Arc<DatabaseError>),

    /// The worker for this submission stopped before replying.
    #[error("Aggregation worker for {0} stopped before replying")]
    WorkerGone(String),
}

impl From<DatabaseError> for AggregationError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::UnknownSubmission(id) => Self::UnknownSubmission(id),
            DatabaseError::Validation(v) => Self::Validation(v),
            other => Self::Storage(Arc::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_classified() {
        let unknown = AggregationError::from(DatabaseError::UnknownSubmission("sub-1".into()));
        assert!(matches!(unknown, AggregationError::UnknownSubmission(ref id) if id == "sub-1"));

        let invalid = AggregationError::from(DatabaseError::Validation(
            ValidationError::ConfidenceOutOfRange(2.0),
        ));
        assert!(matches!(invalid, AggregationError::Validation(_)));

        let busy = AggregationError::from(DatabaseError::Query("database is locked".into()));
        assert!(matches!(busy, AggregationError::Storage(_)));
        assert!(busy.to_string().contains("database is locked"));
    }
}
