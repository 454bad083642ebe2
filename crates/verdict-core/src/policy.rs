//! The decision policy: one verdict out of competing evidence.
//!
//! A fixed priority cascade, evaluated in order (first satisfied branch wins):
//!
//! 1. **Fact-check API**: authoritative. A missing confidence ranks as `1.0`.
//! 2. **In-house model**: only when its confidence (missing ranks as `0.0`)
//!    is at least [`IN_HOUSE_CONFIDENCE_THRESHOLD`]; otherwise fall through.
//! 3. **Generative model**: missing confidence stays `None`.
//! 4. **Fallback**: `generative_model` / `unknown` with no confidence and no
//!    explanation.
//!
//! Ranking values are used only to choose between rows of the same source.
//! The emitted tuple always carries the chosen row's stored confidence.
//!
//! A low-confidence in-house opinion is discarded even when no generative row
//! exists, so that case lands on the fallback tuple.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Evidence, FinalDecision};
use crate::enums::{DecisionBranch, Source, Verdict};

/// Minimum in-house model confidence for its opinion to be used.
pub const IN_HOUSE_CONFIDENCE_THRESHOLD: f64 = 0.60;

/// Output of the decision policy for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub source: Source,
    pub verdict: Verdict,
    pub confidence: Option<f64>,
    pub explanation: Option<String>,
    pub branch: DecisionBranch,
}

impl DecisionOutcome {
    /// The tuple emitted when no usable evidence exists.
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            source: Source::GenerativeModel,
            verdict: Verdict::Unknown,
            confidence: None,
            explanation: None,
            branch: DecisionBranch::Fallback,
        }
    }

    fn from_row(row: &Evidence, branch: DecisionBranch) -> Self {
        Self {
            source: row.source,
            verdict: row.verdict,
            confidence: row.confidence,
            explanation: row.explanation.clone(),
            branch,
        }
    }

    /// Stamp the outcome into a storable decision.
    #[must_use]
    pub fn into_decision(self, submission_id: &str, decided_at: DateTime<Utc>) -> FinalDecision {
        FinalDecision {
            submission_id: submission_id.to_string(),
            source: self.source,
            verdict: self.verdict,
            confidence: self.confidence,
            explanation: self.explanation,
            decided_at,
        }
    }
}

/// Run the cascade over the complete, current evidence set of one submission.
///
/// Total over every input, including the empty set.
#[must_use]
pub fn decide(evidence: &[Evidence]) -> DecisionOutcome {
    if let Some(row) = best_of(evidence, Source::FactCheckApi, |c| c.unwrap_or(1.0)) {
        return DecisionOutcome::from_row(row, DecisionBranch::Authoritative);
    }

    let in_house_rank = |c: Option<f64>| c.unwrap_or(0.0);
    if let Some(row) = best_of(evidence, Source::InHouseModel, in_house_rank)
        .filter(|row| in_house_rank(row.confidence) >= IN_HOUSE_CONFIDENCE_THRESHOLD)
    {
        return DecisionOutcome::from_row(row, DecisionBranch::Confident);
    }

    if let Some(row) = best_of(evidence, Source::GenerativeModel, |c| {
        c.unwrap_or(f64::NEG_INFINITY)
    }) {
        return DecisionOutcome::from_row(row, DecisionBranch::Generative);
    }

    DecisionOutcome::fallback()
}

/// Highest-ranked row for `source`. Ties keep the earliest row.
fn best_of(
    evidence: &[Evidence],
    source: Source,
    rank: impl Fn(Option<f64>) -> f64,
) -> Option<&Evidence> {
    evidence
        .iter()
        .filter(|row| row.source == source)
        .fold(None, |best, row| match best {
            Some(current) if rank(current.confidence) >= rank(row.confidence) => Some(current),
            _ => Some(row),
        })
}
