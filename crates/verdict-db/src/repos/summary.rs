//! Read-only summaries for display and export.

use verdict_core::responses::{DecisionSummaryRow, SubmissionSummary};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::repos::decision::find_decision;
use crate::repos::feedback::count_for_submission;
use crate::service::VerdictService;

fn row_to_summary(row: &libsql::Row) -> Result<DecisionSummaryRow, DatabaseError> {
    Ok(DecisionSummaryRow {
        submission_id: row.get::<String>(0)?,
        modality: parse_enum(&row.get::<String>(1)?)?,
        language: get_opt_string(row, 2)?,
        submitted_at: parse_datetime(&row.get::<String>(3)?)?,
        source: parse_enum(&row.get::<String>(4)?)?,
        verdict: parse_enum(&row.get::<String>(5)?)?,
        confidence: row.get::<Option<f64>>(6)?,
        decided_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl VerdictService {
    /// A submission with its decision, visible evidence and feedback count.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the submission does not exist.
    pub async fn submission_summary(
        &self,
        submission_id: &str,
    ) -> Result<SubmissionSummary, DatabaseError> {
        let submission = self.get_submission(submission_id).await?;
        let evidence = self.list_visible_evidence(submission_id).await?;
        let conn = self.db().lock().await;
        let decision = find_decision(&conn, submission_id).await?;
        let feedback_count = count_for_submission(&conn, submission_id).await?;
        Ok(SubmissionSummary {
            submission,
            decision,
            evidence,
            feedback_count,
        })
    }

    /// Rows of the `decision_summary` view, most recently decided first.
    ///
    /// Submissions without a decision yet are not listed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_decision_summaries(
        &self,
        limit: u32,
    ) -> Result<Vec<DecisionSummaryRow>, DatabaseError> {
        let conn = self.db().lock().await;
        let mut rows = conn
            .query(
                "SELECT submission_id, modality, language, submitted_at, source, verdict, confidence, decided_at
                 FROM decision_summary ORDER BY decided_at DESC, submission_id LIMIT ?1",
                [i64::from(limit)],
            )
            .await?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next().await? {
            summaries.push(row_to_summary(&row)?);
        }
        Ok(summaries)
    }
}
