//! Submission Record
//!
//! One filled-in response to a form, produced by the renderer and never written back into
//! the form definition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{FormId, Responses};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: String,
    pub form_id: FormId,
    pub responses: Responses,
    #[serde(default)]
    pub metadata: SubmissionMetadata,
}

impl SubmissionRecord {
    pub fn create(form_id: FormId, responses: Responses, metadata: SubmissionMetadata) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            form_id,
            responses,
            metadata,
        }
    }
}

/// Caller-supplied context; every field is optional
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmissionMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Where the submission came from (`"embed"`, `"preview"`, a landing page slug, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

impl SubmissionMetadata {
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
