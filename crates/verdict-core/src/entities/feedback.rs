use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{FeedbackProvider, Verdict};

/// A correction label for a submission. Not read by the decision policy.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Feedback {
    pub id: String,
    pub submission_id: String,
    pub label: Verdict,
    pub comment: Option<String>,
    pub provider: FeedbackProvider,
    pub created_at: DateTime<Utc>,
}
