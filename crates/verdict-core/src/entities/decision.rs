use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Source, Verdict};

/// The current authoritative verdict for a submission.
///
/// Derived from the full evidence set by the decision policy and overwritten
/// on every recomputation. Never edited by hand.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FinalDecision {
    pub submission_id: String,
    pub source: Source,
    pub verdict: Verdict,
    pub confidence: Option<f64>,
    pub explanation: Option<String>,
    pub decided_at: DateTime<Utc>,
}

impl FinalDecision {
    /// Whether both decisions carry the same tuple, ignoring `decided_at`.
    #[must_use]
    pub fn same_tuple(&self, other: &Self) -> bool {
        self.source == other.source
            && self.verdict == other.verdict
            && self.confidence == other.confidence
            && self.explanation == other.explanation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(verdict: Verdict, decided_at: DateTime<Utc>) -> FinalDecision {
        FinalDecision {
            submission_id: "sub-00000001".into(),
            source: Source::FactCheckApi,
            verdict,
            confidence: Some(0.9),
            explanation: None,
            decided_at,
        }
    }

    #[test]
    fn same_tuple_ignores_timestamp() {
        let now = Utc::now();
        let earlier = decision(Verdict::True, now - chrono::Duration::hours(1));
        assert!(decision(Verdict::True, now).same_tuple(&earlier));
        assert!(!decision(Verdict::False, now).same_tuple(&earlier));
    }
}
