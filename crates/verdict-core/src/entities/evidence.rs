use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Source, Verdict};

/// One supporting reference attached to an opinion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Citation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// One source's opinion about a submission.
///
/// At most one row exists per `(submission_id, source)`; a later write from
/// the same source replaces the opinion fields in place.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Evidence {
    pub id: String,
    pub submission_id: String,
    pub source: Source,
    pub verdict: Verdict,
    pub confidence: Option<f64>,
    pub explanation: Option<String>,
    pub citations: Option<Vec<Citation>>,
    pub raw_payload: Option<serde_json::Value>,
    pub model_version: Option<String>,
    pub latency_ms: Option<i64>,
    /// Whether this source may be surfaced to end users.
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
