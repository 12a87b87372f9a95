//! Submission assembly
//!
//! Turns raw answers into a [`SubmissionRecord`] ready for the gateway. The form definition
//! is only read here.

use chrono::Utc;
use tracing::debug;

use crate::domain::aggregates::{FormDefinition, FormStatus, SubmissionMetadata, SubmissionRecord};
use crate::domain::services::{kind_for, validate};
use crate::domain::value_objects::Responses;
use crate::error::{FormsError, Result};

/// Responses keyed by field id in canonical stored form.
///
/// Keys that match no field are dropped, text is trimmed, values that end up empty are
/// dropped and numeric text is coerced for number and rating fields.
pub fn canonicalize(form: &FormDefinition, responses: &Responses) -> Responses {
    form.fields()
        .filter_map(|field| {
            let value = responses.answered(&field.id)?.clone();
            let value = kind_for(field.field_type).canonicalize(field, value);
            (!value.is_empty()).then(|| (field.id.clone(), value))
        })
        .collect()
}

/// Check, validate and canonicalize a response set.
///
/// Fails with the complete list of field failures, never just the first.
pub fn assemble(
    form: &FormDefinition,
    responses: &Responses,
    mut metadata: SubmissionMetadata,
    captcha_token: Option<&str>,
) -> Result<SubmissionRecord> {
    if !matches!(form.status, FormStatus::Draft | FormStatus::Published) {
        return Err(FormsError::NotAccepting(form.id.to_string()));
    }

    let violations = form.check_integrity();
    if !violations.is_empty() {
        return Err(FormsError::Schema(violations));
    }

    validate(form, responses).into_result()?;

    if form.settings.captcha_enabled && captcha_token.map_or(true, |t| t.trim().is_empty()) {
        return Err(FormsError::CaptchaRequired);
    }

    metadata.timestamp.get_or_insert_with(Utc::now);
    let data = canonicalize(form, responses);
    debug!(form_id = %form.id, answers = data.len(), "submission assembled");
    Ok(SubmissionRecord::create(form.id.clone(), data, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::FailureKind;
    use crate::domain::value_objects::{FieldDefinition, FieldType, ResponseValue};

    fn form() -> FormDefinition {
        FormDefinition::single_step(
            "Lead",
            vec![
                FieldDefinition::with_id("name", FieldType::Text, "Name").required(true),
                FieldDefinition::with_id("seats", FieldType::Number, "Seats"),
                FieldDefinition::with_id("score", FieldType::Rating, "Score"),
                FieldDefinition::with_id("notes", FieldType::Textarea, "Notes"),
            ],
        )
    }

    #[test]
    fn test_canonicalize() {
        let responses = Responses::new()
            .with("name", "  Ada ")
            .with("seats", "12")
            .with("score", "4")
            .with("notes", "   ")
            .with("ghost", "boo");
        let data = canonicalize(&form(), &responses);

        assert_eq!(data.len(), 3);
        assert_eq!(data.get(&"name".into()), Some(&ResponseValue::Text("Ada".into())));
        assert_eq!(data.get(&"seats".into()), Some(&ResponseValue::Number(12.0)));
        assert_eq!(data.get(&"score".into()), Some(&ResponseValue::Number(4.0)));
        assert!(data.get(&"ghost".into()).is_none());
    }

    #[test]
    fn test_assemble_reports_all_failures() {
        let responses = Responses::new().with("seats", "many").with("score", "9");
        let err = assemble(&form(), &responses, SubmissionMetadata::default(), None).unwrap_err();
        let FormsError::Validation(err) = err else {
            panic!("expected validation error, got {err:?}");
        };
        let kinds: Vec<_> = err.failures.iter().map(|f| f.kind.clone()).collect();
        assert_eq!(
            kinds,
            [
                FailureKind::MissingRequiredField,
                FailureKind::InvalidNumber,
                FailureKind::InvalidRating
            ]
        );
    }

    #[test]
    fn test_assemble_stamps_timestamp() {
        let form = form();
        let record = assemble(
            &form,
            &Responses::new().with("name", "Ada"),
            SubmissionMetadata::from_source("embed"),
            None,
        )
        .unwrap();
        assert!(record.metadata.timestamp.is_some());
        assert_eq!(record.metadata.source.as_deref(), Some("embed"));
        assert_eq!(record.form_id, form.id);
    }

    #[test]
    fn test_captcha_and_status_gates() {
        let mut form = form();
        let responses = Responses::new().with("name", "Ada");
        form.settings.captcha_enabled = true;
        assert!(matches!(
            assemble(&form, &responses, SubmissionMetadata::default(), Some(" ")),
            Err(FormsError::CaptchaRequired)
        ));
        assert!(assemble(&form, &responses, SubmissionMetadata::default(), Some("tok")).is_ok());

        form.status = FormStatus::Closed;
        assert!(matches!(
            assemble(&form, &responses, SubmissionMetadata::default(), Some("tok")),
            Err(FormsError::NotAccepting(_))
        ));
    }

    #[test]
    fn test_broken_schema_blocks_submission() {
        let mut form = form();
        form.steps[0]
            .fields
            .push(FieldDefinition::with_id("name", FieldType::Text, "Again"));
        assert!(matches!(
            assemble(&form, &Responses::new().with("name", "Ada"), SubmissionMetadata::default(), None),
            Err(FormsError::Schema(v)) if v.len() == 1
        ));
    }
}
