use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::InputModality;

/// An immutable claim under evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Submission {
    pub id: String,
    pub modality: InputModality,
    /// Raw text, or a reference (path/URL) for image and audio inputs.
    pub content: String,
    /// Content hash supplied by the ingestion side. Unique; used for dedup only.
    pub fingerprint: String,
    pub language: Option<String>,
    pub submitter_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
