//! Evidence repository.
//!
//! At most one row per (submission, source). A write for an existing pair
//! replaces every opinion field; `id` and `created_at` survive, `updated_at`
//! is refreshed.

use serde::Serialize;

use verdict_core::entities::{Citation, Evidence};
use verdict_core::enums::Source;
use verdict_core::ids::PREFIX_EVIDENCE;
use verdict_core::input::EvidenceUpsert;

use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_string, now, parse_datetime, parse_enum, parse_optional_json,
    to_optional_json,
};
use crate::repos::submission::require_submission;
use crate::service::VerdictService;

const SELECT_EVIDENCE: &str = "SELECT id, submission_id, source, verdict, confidence, explanation, citations,
            raw_payload, model_version, latency_ms, visible, created_at, updated_at
     FROM evidence";

/// Result of an evidence upsert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceWrite {
    /// The row as stored after the write.
    pub evidence: Evidence,
    /// `true` when an earlier opinion from the same source was overwritten.
    pub replaced: bool,
}

fn row_to_evidence(row: &libsql::Row) -> Result<Evidence, DatabaseError> {
    let citations: Option<Vec<Citation>> = parse_optional_json(get_opt_string(row, 6)?.as_deref())?;
    let raw_payload: Option<serde_json::Value> =
        parse_optional_json(get_opt_string(row, 7)?.as_deref())?;
    Ok(Evidence {
        id: row.get::<String>(0)?,
        submission_id: row.get::<String>(1)?,
        source: parse_enum(&row.get::<String>(2)?)?,
        verdict: parse_enum(&row.get::<String>(3)?)?,
        confidence: row.get::<Option<f64>>(4)?,
        explanation: get_opt_string(row, 5)?,
        citations,
        raw_payload,
        model_version: get_opt_string(row, 8)?,
        latency_ms: row.get::<Option<i64>>(9)?,
        visible: row.get::<i64>(10)? != 0,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
        updated_at: parse_datetime(&row.get::<String>(12)?)?,
    })
}

async fn collect(mut rows: libsql::Rows) -> Result<Vec<Evidence>, DatabaseError> {
    let mut evidence = Vec::new();
    while let Some(row) = rows.next().await? {
        evidence.push(row_to_evidence(&row)?);
    }
    Ok(evidence)
}

async fn find_pair(
    conn: &libsql::Connection,
    submission_id: &str,
    source: Source,
) -> Result<Option<Evidence>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("{SELECT_EVIDENCE} WHERE submission_id = ?1 AND source = ?2"),
            libsql::params![submission_id, source.as_str()],
        )
        .await?;
    rows.next()
        .await?
        .map(|row| row_to_evidence(&row))
        .transpose()
}

/// Every evidence row for a submission, oldest first (`created_at`, then `id`).
///
/// This ordering is what the decision policy sees, so ties resolve stably.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn list_for_submission(
    conn: &libsql::Connection,
    submission_id: &str,
) -> Result<Vec<Evidence>, DatabaseError> {
    let rows = conn
        .query(
            &format!("{SELECT_EVIDENCE} WHERE submission_id = ?1 ORDER BY created_at, id"),
            [submission_id],
        )
        .await?;
    collect(rows).await
}

async fn write_evidence(
    conn: &libsql::Connection,
    upsert: &EvidenceUpsert,
) -> Result<EvidenceWrite, DatabaseError> {
    require_submission(conn, &upsert.submission_id).await?;
    let replaced = find_pair(conn, &upsert.submission_id, upsert.source)
        .await?
        .is_some();

    let stamp = format_datetime(&now());
    let id = crate::generate_id(conn, PREFIX_EVIDENCE).await?;
    let citations = to_optional_json(upsert.citations.as_ref())?;
    let raw_payload = to_optional_json(upsert.raw_payload.as_ref())?;

    conn.execute(
        "INSERT INTO evidence (id, submission_id, source, verdict, confidence, explanation, citations,
                               raw_payload, model_version, latency_ms, visible, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
         ON CONFLICT (submission_id, source) DO UPDATE SET
             verdict = excluded.verdict,
             confidence = excluded.confidence,
             explanation = excluded.explanation,
             citations = excluded.citations,
             raw_payload = excluded.raw_payload,
             model_version = excluded.model_version,
             latency_ms = excluded.latency_ms,
             visible = excluded.visible,
             updated_at = excluded.updated_at",
        libsql::params![
            id.as_str(),
            upsert.submission_id.as_str(),
            upsert.source.as_str(),
            upsert.verdict.as_str(),
            upsert.confidence,
            upsert.explanation.as_deref(),
            citations,
            raw_payload,
            upsert.model_version.as_deref(),
            upsert.latency_ms,
            i64::from(upsert.visible),
            stamp
        ],
    )
    .await?;

    let evidence = find_pair(conn, &upsert.submission_id, upsert.source)
        .await?
        .ok_or(DatabaseError::NoResult)?;
    Ok(EvidenceWrite { evidence, replaced })
}

impl VerdictService {
    /// Insert or replace the opinion of `upsert.source` about a submission.
    ///
    /// The write is committed before this returns; callers notify the
    /// aggregator afterwards.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for malformed values and
    /// `DatabaseError::UnknownSubmission` if the submission does not exist.
    pub async fn upsert_evidence(
        &self,
        upsert: &EvidenceUpsert,
    ) -> Result<EvidenceWrite, DatabaseError> {
        upsert.check()?;
        let txn = self.db().transaction().await?;
        let result = write_evidence(&txn, upsert).await;
        let write = txn.finish(result).await?;
        tracing::debug!(
            submission_id = %upsert.submission_id,
            source = %upsert.source,
            verdict = %upsert.verdict,
            replaced = write.replaced,
            "evidence stored"
        );
        Ok(write)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_evidence(
        &self,
        submission_id: &str,
        source: Source,
    ) -> Result<Option<Evidence>, DatabaseError> {
        let conn = self.db().lock().await;
        find_pair(&conn, submission_id, source).await
    }

    /// All evidence for a submission, hidden rows included.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_evidence(&self, submission_id: &str) -> Result<Vec<Evidence>, DatabaseError> {
        let conn = self.db().lock().await;
        list_for_submission(&conn, submission_id).await
    }

    /// Evidence flagged for display.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_visible_evidence(
        &self,
        submission_id: &str,
    ) -> Result<Vec<Evidence>, DatabaseError> {
        let conn = self.db().lock().await;
        let rows = conn
            .query(
                &format!(
                    "{SELECT_EVIDENCE} WHERE submission_id = ?1 AND visible = 1 ORDER BY created_at, id"
                ),
                [submission_id],
            )
            .await?;
        collect(rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{create_test_submission, test_service};
    use pretty_assertions::assert_eq;
    use verdict_core::enums::Verdict;

    #[tokio::test]
    async fn insert_then_replace_same_source() {
        let svc = test_service().await;
        let sub = create_test_submission(&svc, "claim").await;

        let first = svc
            .upsert_evidence(
                &EvidenceUpsert::opinion(&sub.id, Source::InHouseModel, Verdict::True, Some(0.4))
                    .with_explanation("weak signal"),
            )
            .await
            .unwrap();
        assert!(!first.replaced);
        assert!(first.evidence.id.starts_with("res-"));

        let second = svc
            .upsert_evidence(&EvidenceUpsert::opinion(
                &sub.id,
                Source::InHouseModel,
                Verdict::False,
                Some(0.9),
            ))
            .await
            .unwrap();
        assert!(second.replaced);
        assert_eq!(second.evidence.id, first.evidence.id);
        assert_eq!(second.evidence.created_at, first.evidence.created_at);
        assert!(second.evidence.updated_at >= first.evidence.updated_at);
        assert_eq!(second.evidence.verdict, Verdict::False);
        assert_eq!(second.evidence.confidence, Some(0.9));
        // every opinion field is replaced, including ones now absent
        assert_eq!(second.evidence.explanation, None);

        assert_eq!(svc.list_evidence(&sub.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn metadata_roundtrips() {
        let svc = test_service().await;
        let sub = create_test_submission(&svc, "claim").await;

        let mut upsert =
            EvidenceUpsert::opinion(&sub.id, Source::FactCheckApi, Verdict::False, None);
        upsert.citations = Some(vec![Citation {
            title: Some("Snopes".into()),
            url: "https://example.org/check".into(),
            snippet: None,
        }]);
        upsert.raw_payload = Some(serde_json::json!({"rating": "False"}));
        upsert.model_version = Some("api-v3".into());
        upsert.latency_ms = Some(812);
        upsert.visible = false;

        svc.upsert_evidence(&upsert).await.unwrap();
        let stored = svc
            .get_evidence(&sub.id, Source::FactCheckApi)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(stored.confidence, None);
        assert_eq!(stored.citations, upsert.citations);
        assert_eq!(stored.raw_payload, upsert.raw_payload);
        assert_eq!(stored.model_version.as_deref(), Some("api-v3"));
        assert_eq!(stored.latency_ms, Some(812));
        assert!(!stored.visible);
    }

    #[tokio::test]
    async fn unknown_submission_rejected() {
        let svc = test_service().await;
        let err = svc
            .upsert_evidence(&EvidenceUpsert::opinion(
                "sub-deadbeef",
                Source::GenerativeModel,
                Verdict::True,
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::UnknownSubmission(ref id) if id == "sub-deadbeef"));
    }

    #[tokio::test]
    async fn out_of_range_confidence_rejected() {
        let svc = test_service().await;
        let sub = create_test_submission(&svc, "claim").await;
        let err = svc
            .upsert_evidence(&EvidenceUpsert::opinion(
                &sub.id,
                Source::GenerativeModel,
                Verdict::True,
                Some(1.2),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
        assert!(svc.list_evidence(&sub.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn visible_listing_skips_hidden_rows() {
        let svc = test_service().await;
        let sub = create_test_submission(&svc, "claim").await;

        svc.upsert_evidence(&EvidenceUpsert::opinion(
            &sub.id,
            Source::GenerativeModel,
            Verdict::True,
            Some(0.5),
        ))
        .await
        .unwrap();
        let mut hidden =
            EvidenceUpsert::opinion(&sub.id, Source::InHouseModel, Verdict::False, Some(0.3));
        hidden.visible = false;
        svc.upsert_evidence(&hidden).await.unwrap();

        let all = svc.list_evidence(&sub.id).await.unwrap();
        let visible = svc.list_visible_evidence(&sub.id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].source, Source::GenerativeModel);
    }

    #[tokio::test]
    async fn listing_is_ordered_by_arrival() {
        let svc = test_service().await;
        let sub = create_test_submission(&svc, "claim").await;
        for source in [Source::InHouseModel, Source::FactCheckApi, Source::GenerativeModel] {
            svc.upsert_evidence(&EvidenceUpsert::opinion(&sub.id, source, Verdict::Unknown, None))
                .await
                .unwrap();
        }
        let sources: Vec<_> = svc
            .list_evidence(&sub.id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.source)
            .collect();
        assert_eq!(
            sources,
            vec![Source::InHouseModel, Source::FactCheckApi, Source::GenerativeModel]
        );
    }
}
