//! Form Builder
//!
//! Owns one form definition for the duration of an editing session, together with the
//! selection pointer (selected field, active step) and the events raised by each edit.
//! Every operation runs to completion synchronously; a returned [`BuilderError`] means the
//! definition was left untouched.

use tracing::{debug, warn};

use crate::application::templates::FormTemplate;
use crate::domain::aggregates::{FormDefinition, StepDefinition, StepPatch};
use crate::domain::events::{DomainEvent, FormEvent};
use crate::domain::services::move_item;
use crate::domain::value_objects::{
    FieldDefinition, FieldId, FieldOption, FieldPatch, FieldType, OptionId, OptionPatch, SettingsPatch, StepId,
};
use crate::error::{BuilderError, EntityKind};

type BuildResult<T> = std::result::Result<T, BuilderError>;

#[derive(Clone, Debug)]
pub struct FormBuilder {
    form: FormDefinition,
    selected_field: Option<FieldId>,
    active_step: StepId,
    events: Vec<DomainEvent>,
}

impl FormBuilder {
    /// Start editing an existing definition. A definition without steps gets one.
    pub fn new(mut form: FormDefinition) -> Self {
        if form.steps.is_empty() {
            form.steps.push(StepDefinition::new("Step 1"));
        }
        let active_step = form.steps[0].id.clone();
        Self {
            form,
            selected_field: None,
            active_step,
            events: vec![],
        }
    }

    /// Start from an empty single-step draft
    pub fn create(name: impl Into<String>) -> Self {
        Self::new(FormDefinition::create(name))
    }

    /// Start from a template; the template supplies the first step's fields
    pub fn from_template(name: impl Into<String>, template: FormTemplate) -> Self {
        let mut form = FormDefinition::create(name);
        form.description = template.description().to_string();
        form.steps[0].fields = template.fields();
        Self::new(form)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn into_form(self) -> FormDefinition {
        self.form
    }

    pub fn selected_field_id(&self) -> Option<&FieldId> {
        self.selected_field.as_ref()
    }

    pub fn selected_field(&self) -> Option<&FieldDefinition> {
        self.selected_field.as_ref().and_then(|id| self.form.field(id))
    }

    pub fn active_step_index(&self) -> usize {
        self.form.step_index(&self.active_step).unwrap_or(0)
    }

    pub fn active_step(&self) -> &StepDefinition {
        &self.form.steps[self.active_step_index()]
    }

    /// Get and clear accumulated domain events
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn select_field(&mut self, field_id: Option<&FieldId>) -> BuildResult<()> {
        match field_id {
            Some(id) if self.form.field(id).is_none() => Err(BuilderError::not_found(EntityKind::Field, id)),
            _ => {
                self.selected_field = field_id.cloned();
                Ok(())
            }
        }
    }

    pub fn set_active_step(&mut self, step_index: usize) -> BuildResult<()> {
        let step = self.step(step_index)?;
        self.active_step = step.id.clone();
        Ok(())
    }

    // =========================================================================
    // Fields
    // =========================================================================

    /// Append a new field of `field_type` to a step and select it
    pub fn add_field(&mut self, step_index: usize, field_type: FieldType) -> BuildResult<FieldDefinition> {
        self.step(step_index)?;
        let field = FieldDefinition::new(field_type);
        self.form.steps[step_index].fields.push(field.clone());
        self.selected_field = Some(field.id.clone());

        debug!(form_id = %self.form.id, field_id = %field.id, %field_type, "field added");
        self.raise(FormEvent::FieldAdded {
            form_id: self.form.id.clone(),
            field_id: field.id.clone(),
            field_type,
        });
        Ok(field)
    }

    /// Merge a partial update into a field
    pub fn update_field(&mut self, field_id: &FieldId, patch: FieldPatch) -> BuildResult<&FieldDefinition> {
        let field = self.field_mut(field_id)?;
        field.apply(patch);

        debug!(%field_id, "field updated");
        self.raise(FormEvent::FieldUpdated {
            form_id: self.form.id.clone(),
            field_id: field_id.clone(),
        });
        self.field(field_id)
    }

    /// Remove a field from whichever step holds it
    pub fn remove_field(&mut self, field_id: &FieldId) -> BuildResult<FieldDefinition> {
        let (step_index, field_index) = self.locate(field_id)?;
        let removed = self.form.steps[step_index].fields.remove(field_index);
        if self.selected_field.as_ref() == Some(field_id) {
            self.selected_field = None;
        }

        debug!(%field_id, step_index, "field removed");
        self.raise(FormEvent::FieldRemoved {
            form_id: self.form.id.clone(),
            field_id: field_id.clone(),
        });
        Ok(removed)
    }

    /// Insert a copy right after the original and select it
    pub fn duplicate_field(&mut self, field_id: &FieldId) -> BuildResult<FieldDefinition> {
        let (step_index, field_index) = self.locate(field_id)?;
        let copy = self.form.steps[step_index].fields[field_index].duplicate();
        self.form.steps[step_index]
            .fields
            .insert(field_index + 1, copy.clone());
        self.selected_field = Some(copy.id.clone());

        debug!(source = %field_id, copy = %copy.id, "field duplicated");
        self.raise(FormEvent::FieldAdded {
            form_id: self.form.id.clone(),
            field_id: copy.id.clone(),
            field_type: copy.field_type,
        });
        Ok(copy)
    }

    /// Move one field within a step. `Ok(false)` means nothing moved.
    pub fn reorder_fields(&mut self, step_index: usize, from: usize, to: usize) -> BuildResult<bool> {
        self.step(step_index)?;
        let moved = move_item(&mut self.form.steps[step_index].fields, from, to);
        if moved {
            let step_id = self.form.steps[step_index].id.clone();
            debug!(%step_id, from, to, "fields reordered");
            self.raise(FormEvent::FieldsReordered {
                form_id: self.form.id.clone(),
                step_id,
            });
        }
        Ok(moved)
    }

    /// Move a field to the end of another step
    pub fn move_field_to_step(&mut self, field_id: &FieldId, target_step: usize) -> BuildResult<()> {
        self.step(target_step)?;
        let (step_index, field_index) = self.locate(field_id)?;
        if step_index == target_step {
            return Ok(());
        }
        let field = self.form.steps[step_index].fields.remove(field_index);
        self.form.steps[target_step].fields.push(field);

        debug!(%field_id, from_step = step_index, to_step = target_step, "field moved across steps");
        for index in [step_index, target_step] {
            let step_id = self.form.steps[index].id.clone();
            self.raise(FormEvent::FieldsReordered {
                form_id: self.form.id.clone(),
                step_id,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Options
    // =========================================================================

    /// Append `Option {n+1}` to a choice field
    pub fn add_option(&mut self, field_id: &FieldId) -> BuildResult<FieldOption> {
        let field = self.field_mut(field_id)?;
        if !field.field_type.supports_options() {
            return Err(BuilderError::OptionsNotSupported(field_id.to_string()));
        }
        let options = field.options.get_or_insert_with(Vec::new);
        // Skip numbers whose value is still taken after earlier removals
        let mut n = options.len() + 1;
        let option = loop {
            let candidate = FieldOption::numbered(n);
            if options.iter().all(|o| o.value != candidate.value) {
                break candidate;
            }
            n += 1;
        };
        options.push(option.clone());

        debug!(%field_id, option_id = %option.id, "option added");
        self.field_updated(field_id);
        Ok(option)
    }

    /// Patch an option. A blank value, or one another option already uses, is refused.
    pub fn update_option(
        &mut self,
        field_id: &FieldId,
        option_id: &OptionId,
        patch: OptionPatch,
    ) -> BuildResult<FieldOption> {
        let field = self.field_mut(field_id)?;
        let options = field
            .options
            .as_mut()
            .ok_or_else(|| BuilderError::not_found(EntityKind::Option, option_id))?;
        let index = options
            .iter()
            .position(|o| &o.id == option_id)
            .ok_or_else(|| BuilderError::not_found(EntityKind::Option, option_id))?;
        if let Some(value) = &patch.value {
            let taken = options
                .iter()
                .enumerate()
                .any(|(i, o)| i != index && &o.value == value);
            if value.trim().is_empty() || taken {
                warn!(%field_id, %option_id, value = %value, "refusing option value");
                return Err(BuilderError::InvalidOptionValue {
                    field_id: field_id.to_string(),
                    value: value.clone(),
                });
            }
        }
        options[index].apply(patch);
        let updated = options[index].clone();

        self.field_updated(field_id);
        Ok(updated)
    }

    /// Remove an option; the last remaining option cannot be removed
    pub fn remove_option(&mut self, field_id: &FieldId, option_id: &OptionId) -> BuildResult<FieldOption> {
        let field = self.field_mut(field_id)?;
        let options = field
            .options
            .as_mut()
            .ok_or_else(|| BuilderError::not_found(EntityKind::Option, option_id))?;
        let index = options
            .iter()
            .position(|o| &o.id == option_id)
            .ok_or_else(|| BuilderError::not_found(EntityKind::Option, option_id))?;
        if options.len() == 1 {
            warn!(%field_id, %option_id, "refusing to remove the last option");
            return Err(BuilderError::LastOption(field_id.to_string()));
        }
        let removed = options.remove(index);

        debug!(%field_id, %option_id, "option removed");
        self.field_updated(field_id);
        Ok(removed)
    }

    // =========================================================================
    // Steps
    // =========================================================================

    /// Append `Step {n+1}` and make it active
    pub fn add_step(&mut self) -> StepDefinition {
        let step = StepDefinition::new(format!("Step {}", self.form.steps.len() + 1));
        self.form.steps.push(step.clone());
        self.active_step = step.id.clone();

        debug!(step_id = %step.id, "step added");
        self.raise(FormEvent::StepAdded {
            form_id: self.form.id.clone(),
            step_id: step.id.clone(),
        });
        step
    }

    pub fn update_step(&mut self, step_index: usize, patch: StepPatch) -> BuildResult<&StepDefinition> {
        self.step(step_index)?;
        let step = &mut self.form.steps[step_index];
        if let Some(title) = patch.title {
            step.title = title;
        }
        if let Some(description) = patch.description {
            step.description = description;
        }
        let step_id = step.id.clone();

        debug!(%step_id, "step updated");
        self.raise(FormEvent::StepUpdated {
            form_id: self.form.id.clone(),
            step_id,
        });
        Ok(&self.form.steps[step_index])
    }

    /// Remove a step. The only remaining step cannot be removed.
    ///
    /// When the active step is removed, the nearest remaining step by index becomes active.
    pub fn remove_step(&mut self, step_index: usize) -> BuildResult<StepDefinition> {
        self.step(step_index)?;
        if self.form.steps.len() == 1 {
            warn!(form_id = %self.form.id, "refusing to remove the only step");
            return Err(BuilderError::LastStep);
        }

        let removed = self.form.steps.remove(step_index);
        if removed.id == self.active_step {
            let nearest = step_index.min(self.form.steps.len() - 1);
            self.active_step = self.form.steps[nearest].id.clone();
        }
        if let Some(selected) = &self.selected_field {
            if removed.position_of(selected).is_some() {
                self.selected_field = None;
            }
        }

        debug!(step_id = %removed.id, "step removed");
        self.raise(FormEvent::StepRemoved {
            form_id: self.form.id.clone(),
            step_id: removed.id.clone(),
        });
        Ok(removed)
    }

    /// Move a step. `false` means nothing moved.
    pub fn reorder_steps(&mut self, from: usize, to: usize) -> bool {
        let moved = move_item(&mut self.form.steps, from, to);
        if moved {
            debug!(from, to, "steps reordered");
            self.raise(FormEvent::StepsReordered {
                form_id: self.form.id.clone(),
            });
        }
        moved
    }

    // =========================================================================
    // Form-level
    // =========================================================================

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.form.settings.apply(patch);
        debug!(form_id = %self.form.id, "settings updated");
        self.raise(FormEvent::SettingsUpdated {
            form_id: self.form.id.clone(),
        });
    }

    pub fn update_details(&mut self, name: Option<String>, description: Option<String>) {
        if let Some(name) = name {
            self.form.name = name;
        }
        if let Some(description) = description {
            self.form.description = description;
        }
        debug!(form_id = %self.form.id, "details updated");
        self.raise(FormEvent::DetailsUpdated {
            form_id: self.form.id.clone(),
        });
    }

    /// Adopt the copy returned by the persistence collaborator after a save
    pub fn mark_saved(&mut self, saved: FormDefinition) {
        let active_index = self.active_step_index();
        self.form = saved;
        if self.form.step_index(&self.active_step).is_none() {
            let nearest = active_index.min(self.form.steps.len().saturating_sub(1));
            if let Some(step) = self.form.steps.get(nearest) {
                self.active_step = step.id.clone();
            }
        }
        if let Some(selected) = &self.selected_field {
            if self.form.field(selected).is_none() {
                self.selected_field = None;
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn step(&self, step_index: usize) -> BuildResult<&StepDefinition> {
        self.form
            .steps
            .get(step_index)
            .ok_or_else(|| BuilderError::not_found(EntityKind::Step, step_index))
    }

    fn locate(&self, field_id: &FieldId) -> BuildResult<(usize, usize)> {
        self.form
            .locate(field_id)
            .ok_or_else(|| BuilderError::not_found(EntityKind::Field, field_id))
    }

    fn field(&self, field_id: &FieldId) -> BuildResult<&FieldDefinition> {
        self.form
            .field(field_id)
            .ok_or_else(|| BuilderError::not_found(EntityKind::Field, field_id))
    }

    fn field_mut(&mut self, field_id: &FieldId) -> BuildResult<&mut FieldDefinition> {
        self.form
            .field_mut(field_id)
            .ok_or_else(|| BuilderError::not_found(EntityKind::Field, field_id))
    }

    fn field_updated(&mut self, field_id: &FieldId) {
        self.raise(FormEvent::FieldUpdated {
            form_id: self.form.id.clone(),
            field_id: field_id.clone(),
        });
    }

    fn raise(&mut self, event: FormEvent) {
        self.form.touch();
        self.events.push(DomainEvent::Form(event));
    }
}
