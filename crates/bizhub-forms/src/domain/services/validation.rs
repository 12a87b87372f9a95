//! Response validation
//!
//! Checks every field in document order and reports every failure, never just the first,
//! so a UI can highlight all offending fields at once.

use serde::Serialize;

use crate::domain::aggregates::FormDefinition;
use crate::domain::services::field_kinds::kind_for;
use crate::domain::value_objects::{FieldDefinition, FieldId, FormSettings, Responses, ValidationMessages};

pub const DEFAULT_REQUIRED_MESSAGE: &str = "This field is required";
pub const DEFAULT_EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const DEFAULT_NUMBER_MESSAGE: &str = "Please enter a valid number";
pub const DEFAULT_PHONE_MESSAGE: &str = "Please enter a valid phone number";
pub const DEFAULT_DATE_MESSAGE: &str = "Please enter a valid date (YYYY-MM-DD)";
pub const DEFAULT_OPTION_MESSAGE: &str = "Please choose one of the available options";
pub const DEFAULT_RATING_MESSAGE: &str = "Please choose a rating from 1 to 5";
pub const DEFAULT_TYPE_MESSAGE: &str = "This value has the wrong type for this field";

/// What went wrong with one field
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FailureKind {
    MissingRequiredField,
    InvalidEmail,
    InvalidNumber,
    InvalidPhone,
    InvalidDate,
    InvalidOption,
    InvalidRating,
    TypeMismatch { expected: &'static str },
}

impl FailureKind {
    /// Message for this failure, honouring the form's overrides
    pub fn message(&self, overrides: &ValidationMessages) -> String {
        let (custom, fallback) = match self {
            FailureKind::MissingRequiredField => (&overrides.required, DEFAULT_REQUIRED_MESSAGE),
            FailureKind::InvalidEmail => (&overrides.email, DEFAULT_EMAIL_MESSAGE),
            FailureKind::InvalidNumber => (&overrides.number, DEFAULT_NUMBER_MESSAGE),
            FailureKind::InvalidPhone => (&overrides.phone, DEFAULT_PHONE_MESSAGE),
            FailureKind::InvalidDate => (&overrides.date, DEFAULT_DATE_MESSAGE),
            FailureKind::InvalidOption => (&overrides.option, DEFAULT_OPTION_MESSAGE),
            FailureKind::InvalidRating => (&overrides.rating, DEFAULT_RATING_MESSAGE),
            FailureKind::TypeMismatch { .. } => (&None, DEFAULT_TYPE_MESSAGE),
        };
        custom.clone().unwrap_or_else(|| fallback.to_string())
    }
}

/// A failure attached to the field that caused it
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFailure {
    pub field_id: FieldId,
    #[serde(flatten)]
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of validating a set of responses
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    failures: Vec<FieldFailure>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }

    pub fn failure_for(&self, field_id: &FieldId) -> Option<&FieldFailure> {
        self.failures.iter().find(|f| &f.field_id == field_id)
    }

    /// `Ok` when valid, otherwise the full list as a [`ValidationError`]
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidationError {
                failures: self.failures,
            })
        }
    }
}

/// One or more field-level failures, in document order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{} field(s) failed validation", failures.len())]
pub struct ValidationError {
    pub failures: Vec<FieldFailure>,
}

/// Validate responses against every step of a form
pub fn validate(form: &FormDefinition, responses: &Responses) -> ValidationReport {
    validate_fields(form.fields(), &form.settings, responses)
}

/// Validate only the fields of one step (multi-step "next" gating).
///
/// Returns `None` when the step index does not exist.
pub fn validate_step(
    form: &FormDefinition,
    step_index: usize,
    responses: &Responses,
) -> Option<ValidationReport> {
    let step = form.steps.get(step_index)?;
    Some(validate_fields(step.fields.iter(), &form.settings, responses))
}

/// Validate a bare field list
pub fn validate_fields<'a>(
    fields: impl IntoIterator<Item = &'a FieldDefinition>,
    settings: &FormSettings,
    responses: &Responses,
) -> ValidationReport {
    let failures = fields
        .into_iter()
        .filter_map(|field| {
            check_field(field, responses).err().map(|kind| FieldFailure {
                field_id: field.id.clone(),
                message: kind.message(&settings.messages),
                kind,
            })
        })
        .collect();

    ValidationReport { failures }
}

fn check_field(field: &FieldDefinition, responses: &Responses) -> Result<(), FailureKind> {
    match responses.answered(&field.id) {
        None if field.required => Err(FailureKind::MissingRequiredField),
        None => Ok(()),
        Some(value) => kind_for(field.field_type).check(field, value),
    }
}
