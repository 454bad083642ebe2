//! Submission repository.
//!
//! Submissions are immutable once stored. The fingerprint is unique and only
//! used to detect re-submission of the same content.

use verdict_core::entities::Submission;
use verdict_core::ids::PREFIX_SUBMISSION;
use verdict_core::input::NewSubmission;

use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_string, is_unique_violation, now, parse_datetime, parse_enum,
};
use crate::service::VerdictService;

const SELECT_SUBMISSION: &str = "SELECT id, modality, content, fingerprint, language, submitter_id, created_at
     FROM submissions";

fn row_to_submission(row: &libsql::Row) -> Result<Submission, DatabaseError> {
    Ok(Submission {
        id: row.get::<String>(0)?,
        modality: parse_enum(&row.get::<String>(1)?)?,
        content: row.get::<String>(2)?,
        fingerprint: row.get::<String>(3)?,
        language: get_opt_string(row, 4)?,
        submitter_id: get_opt_string(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

async fn collect(mut rows: libsql::Rows) -> Result<Vec<Submission>, DatabaseError> {
    let mut submissions = Vec::new();
    while let Some(row) = rows.next().await? {
        submissions.push(row_to_submission(&row)?);
    }
    Ok(submissions)
}

/// Whether a submission row exists.
pub(crate) async fn submission_exists(
    conn: &libsql::Connection,
    submission_id: &str,
) -> Result<bool, DatabaseError> {
    let mut rows = conn
        .query("SELECT 1 FROM submissions WHERE id = ?1", [submission_id])
        .await?;
    Ok(rows.next().await?.is_some())
}

/// Fail with `UnknownSubmission` unless the submission exists.
pub(crate) async fn require_submission(
    conn: &libsql::Connection,
    submission_id: &str,
) -> Result<(), DatabaseError> {
    if submission_exists(conn, submission_id).await? {
        Ok(())
    } else {
        Err(DatabaseError::UnknownSubmission(submission_id.to_string()))
    }
}

async fn find_by_fingerprint(
    conn: &libsql::Connection,
    fingerprint: &str,
) -> Result<Option<Submission>, DatabaseError> {
    let mut rows = conn
        .query(&format!("{SELECT_SUBMISSION} WHERE fingerprint = ?1"), [fingerprint])
        .await?;
    rows.next()
        .await?
        .map(|row| row_to_submission(&row))
        .transpose()
}

async fn insert_submission(
    conn: &libsql::Connection,
    new: &NewSubmission,
) -> Result<Submission, DatabaseError> {
    if find_by_fingerprint(conn, &new.fingerprint).await?.is_some() {
        return Err(DatabaseError::Duplicate {
            entity: "submission",
            key: new.fingerprint.clone(),
        });
    }

    let created_at = now();
    let id = crate::generate_id(conn, PREFIX_SUBMISSION).await?;
    conn.execute(
        "INSERT INTO submissions (id, modality, content, fingerprint, language, submitter_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        libsql::params![
            id.as_str(),
            new.modality.as_str(),
            new.content.as_str(),
            new.fingerprint.as_str(),
            new.language.as_deref(),
            new.submitter_id.as_deref(),
            format_datetime(&created_at)
        ],
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            DatabaseError::Duplicate {
                entity: "submission",
                key: new.fingerprint.clone(),
            }
        } else {
            e.into()
        }
    })?;

    Ok(Submission {
        id,
        modality: new.modality,
        content: new.content.clone(),
        fingerprint: new.fingerprint.clone(),
        language: new.language.clone(),
        submitter_id: new.submitter_id.clone(),
        created_at,
    })
}

impl VerdictService {
    /// Store a new submission.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for blank content or fingerprint,
    /// `DatabaseError::Duplicate` if the fingerprint is already stored.
    pub async fn create_submission(
        &self,
        new: &NewSubmission,
    ) -> Result<Submission, DatabaseError> {
        new.validate()?;
        let txn = self.db().transaction().await?;
        let result = insert_submission(&txn, new).await;
        let submission = txn.finish(result).await?;
        tracing::debug!(id = %submission.id, modality = %submission.modality, "submission created");
        Ok(submission)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no submission has this id.
    pub async fn get_submission(&self, id: &str) -> Result<Submission, DatabaseError> {
        let conn = self.db().lock().await;
        let mut rows = conn
            .query(&format!("{SELECT_SUBMISSION} WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_submission(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_submission_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<Submission>, DatabaseError> {
        let conn = self.db().lock().await;
        find_by_fingerprint(&conn, fingerprint).await
    }

    /// Most recent submissions first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_submissions(&self, limit: u32) -> Result<Vec<Submission>, DatabaseError> {
        let conn = self.db().lock().await;
        let rows = conn
            .query(
                &format!("{SELECT_SUBMISSION} ORDER BY created_at DESC, id DESC LIMIT ?1"),
                [i64::from(limit)],
            )
            .await?;
        collect(rows).await
    }

    /// A submitter's history, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_submissions_by_submitter(
        &self,
        submitter_id: &str,
        limit: u32,
    ) -> Result<Vec<Submission>, DatabaseError> {
        let conn = self.db().lock().await;
        let rows = conn
            .query(
                &format!(
                    "{SELECT_SUBMISSION} WHERE submitter_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2"
                ),
                libsql::params![submitter_id, i64::from(limit)],
            )
            .await?;
        collect(rows).await
    }

    /// Delete a submission together with its evidence, decision and feedback.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::UnknownSubmission` if nothing was deleted.
    pub async fn delete_submission(&self, id: &str) -> Result<(), DatabaseError> {
        let conn = self.db().lock().await;
        let deleted = conn
            .execute("DELETE FROM submissions WHERE id = ?1", [id])
            .await?;
        if deleted == 0 {
            return Err(DatabaseError::UnknownSubmission(id.to_string()));
        }
        tracing::debug!(%id, "submission deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{create_test_submission, test_service};
    use pretty_assertions::assert_eq;
    use verdict_core::enums::InputModality;

    fn new_submission(fingerprint: &str, submitter: Option<&str>) -> NewSubmission {
        NewSubmission {
            modality: InputModality::Text,
            content: "The moon is made of cheese".into(),
            fingerprint: fingerprint.into(),
            language: None,
            submitter_id: submitter.map(String::from),
        }
    }

    #[tokio::test]
    async fn create_submission_roundtrip() {
        let svc = test_service().await;
        let created = svc
            .create_submission(&new_submission("fp-1", Some("user-7")))
            .await
            .unwrap();

        assert!(created.id.starts_with("sub-"));
        let fetched = svc.get_submission(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn duplicate_fingerprint_rejected() {
        let svc = test_service().await;
        svc.create_submission(&new_submission("fp-1", None))
            .await
            .unwrap();

        let err = svc
            .create_submission(&new_submission("fp-1", None))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate { entity: "submission", .. }));
        assert_eq!(svc.list_submissions(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_content_rejected() {
        let svc = test_service().await;
        let mut new = new_submission("fp-1", None);
        new.content = "   ".into();
        let err = svc.create_submission(&new).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[tokio::test]
    async fn find_by_fingerprint() {
        let svc = test_service().await;
        let created = create_test_submission(&svc, "claim").await;

        let found = svc
            .find_submission_by_fingerprint("fp:claim")
            .await
            .unwrap();
        assert_eq!(found.map(|s| s.id), Some(created.id));
        assert!(svc
            .find_submission_by_fingerprint("fp:other")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn list_newest_first_with_limit() {
        let svc = test_service().await;
        let first = create_test_submission(&svc, "one").await;
        let second = create_test_submission(&svc, "two").await;
        let third = create_test_submission(&svc, "three").await;

        let listed = svc.list_submissions(2).await.unwrap();
        let ids: Vec<_> = listed.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![third.id, second.id]);
        assert_eq!(svc.list_submissions(10).await.unwrap().len(), 3);
        assert!(svc.get_submission(&first.id).await.is_ok());
    }

    #[tokio::test]
    async fn list_by_submitter_filters() {
        let svc = test_service().await;
        let a1 = svc
            .create_submission(&new_submission("fp-a1", Some("alice")))
            .await
            .unwrap();
        svc.create_submission(&new_submission("fp-b1", Some("bob")))
            .await
            .unwrap();
        let a2 = svc
            .create_submission(&new_submission("fp-a2", Some("alice")))
            .await
            .unwrap();

        let history = svc
            .list_submissions_by_submitter("alice", 10)
            .await
            .unwrap();
        let ids: Vec<_> = history.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a2.id, a1.id]);
    }

    #[tokio::test]
    async fn delete_submission_and_missing() {
        let svc = test_service().await;
        let created = create_test_submission(&svc, "claim").await;

        svc.delete_submission(&created.id).await.unwrap();
        assert!(matches!(
            svc.get_submission(&created.id).await,
            Err(DatabaseError::NoResult)
        ));
        assert!(matches!(
            svc.delete_submission(&created.id).await,
            Err(DatabaseError::UnknownSubmission(_))
        ));
    }

    #[tokio::test]
    async fn get_missing_submission() {
        let svc = test_service().await;
        let result = svc.get_submission("sub-00000000").await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }
}
