//! Data Transfer Objects (DTOs)
//!
//! Wire shapes exchanged with the submission endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{SubmissionMetadata, SubmissionRecord};
use crate::domain::value_objects::{FormId, Responses};

/// Body of `POST /forms/submit`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub form_id: FormId,
    pub data: Responses,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SubmissionMetadata>,
}

impl SubmitPayload {
    pub fn from_record(record: &SubmissionRecord, captcha_token: Option<String>) -> Self {
        Self {
            form_id: record.form_id.clone(),
            data: record.responses.clone(),
            captcha_token,
            metadata: (!record.metadata.is_empty()).then(|| record.metadata.clone()),
        }
    }
}

/// What the submission endpoint answers with
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub submission_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_wire_shape() {
        let record = SubmissionRecord::create(
            "form_1".into(),
            Responses::new().with("email", "a@b.com"),
            SubmissionMetadata::default(),
        );
        let payload = SubmitPayload::from_record(&record, Some("tok".into()));
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"formId": "form_1", "data": {"email": "a@b.com"}, "captchaToken": "tok"})
        );
    }
}
