//! Read-side projections consumed by reporting and export collaborators.
//!
//! These join submission metadata, evidence and the final decision. They are
//! also the JSON output of `vrd summary get` and `vrd summary list`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Evidence, FinalDecision, Submission};
use crate::enums::{InputModality, Source, Verdict};

/// Everything known about one submission, restricted to visible evidence.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SubmissionSummary {
    pub submission: Submission,
    pub decision: Option<FinalDecision>,
    pub evidence: Vec<Evidence>,
    pub feedback_count: u32,
}

/// One row of the `decision_summary` view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DecisionSummaryRow {
    pub submission_id: String,
    pub modality: InputModality,
    pub language: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub source: Source,
    pub verdict: Verdict,
    pub confidence: Option<f64>,
    pub decided_at: DateTime<Utc>,
}

/// Response from `vrd evidence ingest`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct IngestReport {
    pub accepted: u32,
    pub rejected: Vec<IngestRejection>,
    pub decisions: Vec<FinalDecision>,
}

/// A single evidence record refused at the boundary or by storage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IngestRejection {
    /// 1-based position in the input batch.
    pub line: u32,
    pub reason: String,
}
