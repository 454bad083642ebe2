//! Shared test utilities for verdict-db unit tests.

pub(crate) mod helpers {
    use verdict_core::entities::Submission;
    use verdict_core::enums::InputModality;
    use verdict_core::input::NewSubmission;

    use crate::VerdictDb;
    use crate::service::VerdictService;

    /// Create an in-memory `VerdictService`.
    pub async fn test_service() -> VerdictService {
        let db = VerdictDb::open_local(":memory:").await.unwrap();
        VerdictService::from_db(db)
    }

    /// Create a text submission whose fingerprint is derived from `content`.
    pub async fn create_test_submission(svc: &VerdictService, content: &str) -> Submission {
        svc.create_submission(&NewSubmission {
            modality: InputModality::Text,
            content: content.to_string(),
            fingerprint: format!("fp:{content}"),
            language: Some("en".into()),
            submitter_id: None,
        })
        .await
        .unwrap()
    }
}
