//! Final decision repository.
//!
//! One row per submission, always written as a full tuple. Only
//! [`VerdictService::recompute_decision`] writes here, so the stored row is
//! always the policy applied to some committed evidence set.

use verdict_core::entities::FinalDecision;
use verdict_core::enums::DecisionBranch;
use verdict_core::policy::{DecisionOutcome, decide};

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, now, parse_datetime, parse_enum};
use crate::repos::evidence::list_for_submission;
use crate::repos::submission::require_submission;
use crate::service::VerdictService;

/// Outcome of one recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct Recomputation {
    /// The decision now stored.
    pub decision: FinalDecision,
    /// Which policy branch produced it.
    pub branch: DecisionBranch,
    /// The decision that was replaced, if any.
    pub previous: Option<FinalDecision>,
}

impl Recomputation {
    /// Whether the stored tuple differs from the previous one (timestamp ignored).
    #[must_use]
    pub fn changed(&self) -> bool {
        self.previous
            .as_ref()
            .is_none_or(|prev| !prev.same_tuple(&self.decision))
    }
}

fn row_to_decision(row: &libsql::Row) -> Result<FinalDecision, DatabaseError> {
    Ok(FinalDecision {
        submission_id: row.get::<String>(0)?,
        source: parse_enum(&row.get::<String>(1)?)?,
        verdict: parse_enum(&row.get::<String>(2)?)?,
        confidence: row.get::<Option<f64>>(3)?,
        explanation: get_opt_string(row, 4)?,
        decided_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

pub(crate) async fn find_decision(
    conn: &libsql::Connection,
    submission_id: &str,
) -> Result<Option<FinalDecision>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT submission_id, source, verdict, confidence, explanation, decided_at
             FROM final_decisions WHERE submission_id = ?1",
            [submission_id],
        )
        .await?;
    rows.next()
        .await?
        .map(|row| row_to_decision(&row))
        .transpose()
}

/// Replace the full decision tuple for a submission.
pub(crate) async fn upsert_decision(
    conn: &libsql::Connection,
    submission_id: &str,
    outcome: &DecisionOutcome,
) -> Result<FinalDecision, DatabaseError> {
    let decision = outcome.clone().into_decision(submission_id, now());
    conn.execute(
        "INSERT INTO final_decisions (submission_id, source, verdict, confidence, explanation, decided_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (submission_id) DO UPDATE SET
             source = excluded.source,
             verdict = excluded.verdict,
             confidence = excluded.confidence,
             explanation = excluded.explanation,
             decided_at = excluded.decided_at",
        libsql::params![
            submission_id,
            decision.source.as_str(),
            decision.verdict.as_str(),
            decision.confidence,
            decision.explanation.as_deref(),
            format_datetime(&decision.decided_at)
        ],
    )
    .await?;
    Ok(decision)
}

async fn recompute_in(
    conn: &libsql::Connection,
    submission_id: &str,
) -> Result<Recomputation, DatabaseError> {
    require_submission(conn, submission_id).await?;
    let previous = find_decision(conn, submission_id).await?;
    let evidence = list_for_submission(conn, submission_id).await?;
    let outcome = decide(&evidence);
    let branch = outcome.branch;
    let decision = upsert_decision(conn, submission_id, &outcome).await?;
    Ok(Recomputation {
        decision,
        branch,
        previous,
    })
}

impl VerdictService {
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_decision(
        &self,
        submission_id: &str,
    ) -> Result<Option<FinalDecision>, DatabaseError> {
        let conn = self.db().lock().await;
        find_decision(&conn, submission_id).await
    }

    /// Re-derive the final decision from the current evidence set.
    ///
    /// Reads the evidence, applies the policy and writes the decision inside
    /// one immediate transaction. A failure leaves the previous decision in place.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::UnknownSubmission` if the submission does not exist.
    pub async fn recompute_decision(
        &self,
        submission_id: &str,
    ) -> Result<Recomputation, DatabaseError> {
        let txn = self.db().transaction().await?;
        let result = recompute_in(&txn, submission_id).await;
        txn.finish(result).await
    }
}
