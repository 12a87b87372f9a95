//! Domain Events
//!
//! Raised by the builder and the submission flow so integrations (webhooks, contact and
//! deal creation) can react without the form model knowing about them.

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{FieldId, FieldType, FormId, StepId};

/// All domain events in the forms bounded context
#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Form(FormEvent),
    Submission(SubmissionEvent),
}

/// Events raised while editing a form definition
#[derive(Clone, Debug, PartialEq)]
pub enum FormEvent {
    FieldAdded {
        form_id: FormId,
        field_id: FieldId,
        field_type: FieldType,
    },
    FieldUpdated {
        form_id: FormId,
        field_id: FieldId,
    },
    FieldRemoved {
        form_id: FormId,
        field_id: FieldId,
    },
    FieldsReordered {
        form_id: FormId,
        step_id: StepId,
    },
    StepAdded {
        form_id: FormId,
        step_id: StepId,
    },
    StepRemoved {
        form_id: FormId,
        step_id: StepId,
    },
    StepUpdated {
        form_id: FormId,
        step_id: StepId,
    },
    StepsReordered {
        form_id: FormId,
    },
    /// Name or description changed
    DetailsUpdated {
        form_id: FormId,
    },
    SettingsUpdated {
        form_id: FormId,
    },
    Saved {
        form_id: FormId,
        revision: u64,
        saved_at: DateTime<Utc>,
    },
}

/// Events raised when a response is accepted
#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionEvent {
    Received {
        form_id: FormId,
        submission_id: String,
        received_at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// The form this event belongs to
    pub fn form_id(&self) -> &FormId {
        match self {
            DomainEvent::Form(e) => match e {
                FormEvent::FieldAdded { form_id, .. }
                | FormEvent::FieldUpdated { form_id, .. }
                | FormEvent::FieldRemoved { form_id, .. }
                | FormEvent::FieldsReordered { form_id, .. }
                | FormEvent::StepAdded { form_id, .. }
                | FormEvent::StepRemoved { form_id, .. }
                | FormEvent::StepUpdated { form_id, .. }
                | FormEvent::StepsReordered { form_id }
                | FormEvent::DetailsUpdated { form_id }
                | FormEvent::SettingsUpdated { form_id }
                | FormEvent::Saved { form_id, .. } => form_id,
            },
            DomainEvent::Submission(SubmissionEvent::Received { form_id, .. }) => form_id,
        }
    }

    /// Event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::Form(e) => match e {
                FormEvent::FieldAdded { .. } => "form.field_added",
                FormEvent::FieldUpdated { .. } => "form.field_updated",
                FormEvent::FieldRemoved { .. } => "form.field_removed",
                FormEvent::FieldsReordered { .. } => "form.fields_reordered",
                FormEvent::StepAdded { .. } => "form.step_added",
                FormEvent::StepRemoved { .. } => "form.step_removed",
                FormEvent::StepUpdated { .. } => "form.step_updated",
                FormEvent::StepsReordered { .. } => "form.steps_reordered",
                FormEvent::DetailsUpdated { .. } => "form.details_updated",
                FormEvent::SettingsUpdated { .. } => "form.settings_updated",
                FormEvent::Saved { .. } => "form.saved",
            },
            DomainEvent::Submission(SubmissionEvent::Received { .. }) => "submission.received",
        }
    }
}
