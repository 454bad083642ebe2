//! Feedback repository.
//!
//! Correction labels from users or external reviewers. Stored for later
//! analysis; the decision policy never reads them.

use verdict_core::entities::Feedback;
use verdict_core::ids::PREFIX_FEEDBACK;
use verdict_core::input::NewFeedback;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, now, parse_datetime, parse_enum};
use crate::repos::submission::require_submission;
use crate::service::VerdictService;

fn row_to_feedback(row: &libsql::Row) -> Result<Feedback, DatabaseError> {
    Ok(Feedback {
        id: row.get::<String>(0)?,
        submission_id: row.get::<String>(1)?,
        label: parse_enum(&row.get::<String>(2)?)?,
        comment: get_opt_string(row, 3)?,
        provider: parse_enum(&row.get::<String>(4)?)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

async fn insert_feedback(
    conn: &libsql::Connection,
    new: &NewFeedback,
) -> Result<Feedback, DatabaseError> {
    require_submission(conn, &new.submission_id).await?;
    let created_at = now();
    let id = crate::generate_id(conn, PREFIX_FEEDBACK).await?;
    let comment = new.comment.as_deref().filter(|c| !c.trim().is_empty());
    conn.execute(
        "INSERT INTO feedback (id, submission_id, label, comment, provider, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            id.as_str(),
            new.submission_id.as_str(),
            new.label.as_str(),
            comment,
            new.provider.as_str(),
            format_datetime(&created_at)
        ],
    )
    .await?;

    Ok(Feedback {
        id,
        submission_id: new.submission_id.clone(),
        label: new.label,
        comment: comment.map(String::from),
        provider: new.provider,
        created_at,
    })
}

/// Number of feedback rows for a submission.
pub(crate) async fn count_for_submission(
    conn: &libsql::Connection,
    submission_id: &str,
) -> Result<u32, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT COUNT(*) FROM feedback WHERE submission_id = ?1",
            [submission_id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let count = row.get::<i64>(0)?;
    u32::try_from(count).map_err(|e| DatabaseError::Other(e.into()))
}

impl VerdictService {
    /// # Errors
    ///
    /// Returns `DatabaseError::UnknownSubmission` if the submission does not exist.
    pub async fn record_feedback(&self, new: &NewFeedback) -> Result<Feedback, DatabaseError> {
        let txn = self.db().transaction().await?;
        let result = insert_feedback(&txn, new).await;
        let feedback = txn.finish(result).await?;
        tracing::debug!(
            id = %feedback.id,
            submission_id = %feedback.submission_id,
            label = %feedback.label,
            "feedback recorded"
        );
        Ok(feedback)
    }

    /// Feedback for a submission, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_feedback(&self, submission_id: &str) -> Result<Vec<Feedback>, DatabaseError> {
        let conn = self.db().lock().await;
        let mut rows = conn
            .query(
                "SELECT id, submission_id, label, comment, provider, created_at
                 FROM feedback WHERE submission_id = ?1 ORDER BY created_at, id",
                [submission_id],
            )
            .await?;
        let mut feedback = Vec::new();
        while let Some(row) = rows.next().await? {
            feedback.push(row_to_feedback(&row)?);
        }
        Ok(feedback)
    }
}
