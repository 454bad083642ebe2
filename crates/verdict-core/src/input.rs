//! Inbound payloads and their boundary validation.
//!
//! Producers hand the engine loosely typed `EvidenceInput` records (source
//! and verdict as plain strings, as they arrive over the wire). Validation
//! turns them into `EvidenceUpsert`, the only shape storage accepts, so no
//! malformed value is ever coerced into the decision policy.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Citation;
use crate::enums::{FeedbackProvider, InputModality, Source, Verdict};
use crate::errors::ValidationError;

/// Raw evidence upsert event as produced by an evidence integration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EvidenceInput {
    pub submission_id: String,
    /// One of `fact_check_api`, `generative_model`, `in_house_model`.
    pub source: String,
    /// One of `true`, `false`, `unknown`.
    pub verdict: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub citations: Option<Vec<Citation>>,
    #[serde(default)]
    pub raw_payload: Option<serde_json::Value>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub latency_ms: Option<i64>,
    pub visible: bool,
}

/// A validated evidence write, ready for the evidence store.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvidenceUpsert {
    pub submission_id: String,
    pub source: Source,
    pub verdict: Verdict,
    pub confidence: Option<f64>,
    pub explanation: Option<String>,
    pub citations: Option<Vec<Citation>>,
    pub raw_payload: Option<serde_json::Value>,
    pub model_version: Option<String>,
    pub latency_ms: Option<i64>,
    pub visible: bool,
}

impl EvidenceInput {
    /// Check the boundary contract and convert to a typed upsert.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a blank submission id, unknown source or
    /// verdict, confidence outside `[0, 1]` (including NaN), or negative latency.
    pub fn validate(self) -> Result<EvidenceUpsert, ValidationError> {
        let submission_id = self.submission_id.trim();
        if submission_id.is_empty() {
            return Err(ValidationError::MissingField("submission_id"));
        }
        let source: Source = self.source.trim().parse()?;
        let verdict: Verdict = self.verdict.trim().parse()?;
        let confidence = self.confidence.map(check_confidence).transpose()?;
        if let Some(latency) = self.latency_ms.filter(|l| *l < 0) {
            return Err(ValidationError::NegativeLatency(latency));
        }

        Ok(EvidenceUpsert {
            submission_id: submission_id.to_string(),
            source,
            verdict,
            confidence,
            explanation: self.explanation.filter(|e| !e.is_empty()),
            citations: self.citations,
            raw_payload: self.raw_payload,
            model_version: self.model_version.filter(|v| !v.is_empty()),
            latency_ms: self.latency_ms,
            visible: self.visible,
        })
    }
}

impl EvidenceUpsert {
    /// Minimal opinion with no metadata. Mostly useful for tests and tooling.
    #[must_use]
    pub fn opinion(
        submission_id: impl Into<String>,
        source: Source,
        verdict: Verdict,
        confidence: Option<f64>,
    ) -> Self {
        Self {
            submission_id: submission_id.into(),
            source,
            verdict,
            confidence,
            explanation: None,
            citations: None,
            raw_payload: None,
            model_version: None,
            latency_ms: None,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Re-check the invariants `EvidenceInput::validate` establishes, for
    /// upserts built directly in code.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.submission_id.trim().is_empty() {
            return Err(ValidationError::MissingField("submission_id"));
        }
        if let Some(confidence) = self.confidence {
            check_confidence(confidence)?;
        }
        match self.latency_ms {
            Some(latency) if latency < 0 => Err(ValidationError::NegativeLatency(latency)),
            _ => Ok(()),
        }
    }
}

/// Confidence must be a finite number in `[0, 1]`.
///
/// # Errors
///
/// Returns `ValidationError::ConfidenceOutOfRange` otherwise.
pub fn check_confidence(value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::ConfidenceOutOfRange(value))
    }
}

/// A claim handed over by the ingestion side.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewSubmission {
    pub modality: InputModality,
    pub content: String,
    pub fingerprint: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub submitter_id: Option<String>,
}

impl NewSubmission {
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` for blank content or fingerprint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::MissingField("content"));
        }
        if self.fingerprint.trim().is_empty() {
            return Err(ValidationError::MissingField("fingerprint"));
        }
        Ok(())
    }
}

/// A correction label for an existing submission.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewFeedback {
    pub submission_id: String,
    pub label: Verdict,
    #[serde(default)]
    pub comment: Option<String>,
    pub provider: FeedbackProvider,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(source: &str, verdict: &str, confidence: Option<f64>) -> EvidenceInput {
        EvidenceInput {
            submission_id: "sub-00000001".into(),
            source: source.into(),
            verdict: verdict.into(),
            confidence,
            explanation: Some("matched three outlets".into()),
            citations: None,
            raw_payload: None,
            model_version: Some("v2".into()),
            latency_ms: Some(120),
            visible: true,
        }
    }

    #[test]
    fn valid_input_converts() {
        let upsert = input("fact_check_api", "false", Some(0.95))
            .validate()
            .unwrap();
        assert_eq!(upsert.source, Source::FactCheckApi);
        assert_eq!(upsert.verdict, Verdict::False);
        assert_eq!(upsert.confidence, Some(0.95));
        assert_eq!(upsert.model_version.as_deref(), Some("v2"));
    }

    #[test]
    fn unknown_source_is_rejected() {
        let err = input("wikipedia", "true", None).validate().unwrap_err();
        assert_eq!(err, ValidationError::UnknownSource("wikipedia".into()));
    }

    #[test]
    fn unknown_verdict_is_rejected() {
        let err = input("in_house_model", "misleading", None)
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::UnknownVerdict("misleading".into()));
    }

    #[test]
    fn confidence_bounds_are_inclusive() {
        assert!(input("in_house_model", "true", Some(0.0)).validate().is_ok());
        assert!(input("in_house_model", "true", Some(1.0)).validate().is_ok());
        for bad in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            let err = input("in_house_model", "true", Some(bad))
                .validate()
                .unwrap_err();
            assert!(matches!(err, ValidationError::ConfidenceOutOfRange(_)));
        }
    }

    #[test]
    fn blank_submission_is_rejected() {
        let mut raw = input("generative_model", "unknown", None);
        raw.submission_id = "   ".into();
        assert_eq!(
            raw.validate().unwrap_err(),
            ValidationError::MissingField("submission_id")
        );
    }

    #[test]
    fn direct_upsert_is_checked() {
        let ok = EvidenceUpsert::opinion("sub-1", Source::InHouseModel, Verdict::True, Some(0.7));
        assert_eq!(ok.check(), Ok(()));

        let bad = EvidenceUpsert::opinion("sub-1", Source::InHouseModel, Verdict::True, Some(f64::NAN));
        assert!(matches!(bad.check(), Err(ValidationError::ConfidenceOutOfRange(_))));

        let blank = EvidenceUpsert::opinion(" ", Source::InHouseModel, Verdict::True, None);
        assert_eq!(blank.check(), Err(ValidationError::MissingField("submission_id")));
    }

    #[test]
    fn negative_latency_is_rejected() {
        let mut raw = input("generative_model", "true", Some(0.5));
        raw.latency_ms = Some(-3);
        assert_eq!(raw.validate().unwrap_err(), ValidationError::NegativeLatency(-3));
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let raw: EvidenceInput = serde_json::from_str(
            r#"{"submission_id":"sub-1","source":"generative_model","verdict":"true","visible":false}"#,
        )
        .unwrap();
        let upsert = raw.validate().unwrap();
        assert!(upsert.confidence.is_none());
        assert!(!upsert.visible);
    }

    #[test]
    fn new_submission_requires_content_and_fingerprint() {
        let mut sub = NewSubmission {
            modality: InputModality::Text,
            content: "The moon is made of cheese".into(),
            fingerprint: "abc123".into(),
            language: Some("en".into()),
            submitter_id: None,
        };
        assert!(sub.validate().is_ok());
        sub.fingerprint = String::new();
        assert_eq!(
            sub.validate().unwrap_err(),
            ValidationError::MissingField("fingerprint")
        );
    }
}
