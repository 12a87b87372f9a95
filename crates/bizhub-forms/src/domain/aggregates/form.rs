//! Form Aggregate
//!
//! The full schema of a form: metadata, ordered steps of ordered fields and settings.
//! Mutation goes through [`crate::application::FormBuilder`]; the renderer only reads it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::value_objects::{FieldDefinition, FieldId, FormId, FormSettings, StepId};

/// Publication state of a form
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    #[default]
    Draft,
    Published,
    Closed,
    Archived,
}

/// One page of a multi-step form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: StepId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl StepDefinition {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: StepId::generate(),
            title: title.into(),
            description: None,
            fields: vec![],
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.fields = fields;
        self
    }

    pub fn position_of(&self, field_id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|f| &f.id == field_id)
    }
}

/// Partial update for a step's title/description
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StepPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::domain::value_objects::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

/// Full schema for a form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    pub id: FormId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: FormStatus,
    pub steps: Vec<StepDefinition>,
    #[serde(default)]
    pub settings: FormSettings,
    /// Bumped by the persistence collaborator; `0` means never saved
    #[serde(default)]
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FormDefinition {
    /// Empty draft with a single untitled step
    pub fn create(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: FormId::generate(),
            name: name.into(),
            description: String::new(),
            status: FormStatus::Draft,
            steps: vec![StepDefinition::new("Step 1")],
            settings: FormSettings::default(),
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Single-step form built from a bare field list
    pub fn single_step(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        let mut form = Self::create(name);
        form.steps[0].fields = fields;
        form
    }

    pub fn is_multi_step(&self) -> bool {
        self.steps.len() > 1
    }

    /// Fields of every step in document order
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.steps.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field_count(&self) -> usize {
        self.steps.iter().map(|s| s.fields.len()).sum()
    }

    pub fn field(&self, field_id: &FieldId) -> Option<&FieldDefinition> {
        self.fields().find(|f| &f.id == field_id)
    }

    pub(crate) fn field_mut(&mut self, field_id: &FieldId) -> Option<&mut FieldDefinition> {
        self.steps
            .iter_mut()
            .flat_map(|s| s.fields.iter_mut())
            .find(|f| &f.id == field_id)
    }

    /// `(step index, field index)` of a field
    pub fn locate(&self, field_id: &FieldId) -> Option<(usize, usize)> {
        self.steps
            .iter()
            .enumerate()
            .find_map(|(si, step)| step.position_of(field_id).map(|fi| (si, fi)))
    }

    pub fn step_index(&self, step_id: &StepId) -> Option<usize> {
        self.steps.iter().position(|s| &s.id == step_id)
    }

    /// Structural problems that must block save and submit
    pub fn check_integrity(&self) -> Vec<SchemaViolation> {
        let mut violations = vec![];

        if self.steps.is_empty() {
            violations.push(SchemaViolation::NoSteps);
        }

        let mut seen = HashSet::new();
        for field in self.fields() {
            if !seen.insert(&field.id) {
                violations.push(SchemaViolation::DuplicateFieldId {
                    field_id: field.id.clone(),
                });
            }
            if !field.has_valid_options() {
                violations.push(SchemaViolation::MissingOptions {
                    field_id: field.id.clone(),
                });
            }
            if let Some(options) = &field.options {
                let mut values = HashSet::new();
                for option in options {
                    if !values.insert(option.value.as_str()) {
                        violations.push(SchemaViolation::DuplicateOptionValue {
                            field_id: field.id.clone(),
                            value: option.value.clone(),
                        });
                    }
                }
            }
        }

        violations
    }

    pub fn is_structurally_valid(&self) -> bool {
        self.check_integrity().is_empty()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Structural invariant broken by a form definition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SchemaViolation {
    #[error("form has no steps")]
    NoSteps,
    #[error("field id {field_id} is used more than once")]
    DuplicateFieldId { field_id: FieldId },
    #[error("field {field_id} needs at least one option")]
    MissingOptions { field_id: FieldId },
    #[error("field {field_id} repeats option value {value:?}")]
    DuplicateOptionValue { field_id: FieldId, value: String },
}
