//! Headless form rendering
//!
//! Turns a form definition into a tree of input bindings in document order. The tree is
//! what the preview, embed and hosted pages draw; this module never produces markup or
//! styling itself.

use serde::Serialize;

use crate::domain::aggregates::FormDefinition;
use crate::domain::services::field_kinds::kind_for;
use crate::domain::value_objects::{
    FieldDefinition, FieldId, FieldOption, FieldType, FormId, FormSettings, ResponseValue, Responses, StepId,
};

/// Semantic type of a single-value input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Email,
    Tel,
    Number,
    Date,
}

/// Control used to collect one answer
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "control", rename_all = "camelCase")]
pub enum InputControl {
    Input { input_type: InputType },
    TextArea { rows: u8 },
    /// Single boolean checkbox
    Checkbox,
    /// Multi-select list of checkboxes
    CheckboxGroup { options: Vec<FieldOption> },
    RadioGroup { options: Vec<FieldOption> },
    Select { options: Vec<FieldOption> },
    FileUpload,
    Rating { min: u8, max: u8 },
}

/// Binding for one field
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub field_id: FieldId,
    pub field_type: FieldType,
    /// `None` when labels are hidden
    pub label: Option<String>,
    pub placeholder: Option<String>,
    /// `None` when help text is hidden or absent
    pub help_text: Option<String>,
    pub required: bool,
    pub required_indicator: bool,
    pub control: InputControl,
    pub initial_value: Option<ResponseValue>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedStep {
    pub step_id: StepId,
    pub title: String,
    pub description: Option<String>,
    pub nodes: Vec<RenderNode>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderTree {
    pub form_id: FormId,
    pub title: String,
    pub description: String,
    pub steps: Vec<RenderedStep>,
    pub submit_text: String,
    pub success_message: String,
    pub theme: String,
    pub captcha: bool,
}

impl RenderTree {
    /// Every node across all steps, in document order
    pub fn nodes(&self) -> impl Iterator<Item = &RenderNode> {
        self.steps.iter().flat_map(|s| s.nodes.iter())
    }

    /// Response object pre-filled with each control's untouched value
    pub fn blank_responses(&self) -> Responses {
        self.nodes()
            .filter_map(|n| n.initial_value.clone().map(|v| (n.field_id.clone(), v)))
            .collect()
    }
}

/// Render every step of a form
pub fn render(form: &FormDefinition) -> RenderTree {
    let steps = form
        .steps
        .iter()
        .map(|step| RenderedStep {
            step_id: step.id.clone(),
            title: step.title.clone(),
            description: step.description.clone(),
            nodes: render_fields(&step.fields, &form.settings),
        })
        .collect();

    RenderTree {
        form_id: form.id.clone(),
        title: form.name.clone(),
        description: form.description.clone(),
        steps,
        submit_text: form.settings.submit_button_text.clone(),
        success_message: form.settings.success_message.clone(),
        theme: form.settings.theme.data_attribute().to_string(),
        captcha: form.settings.captcha_enabled,
    }
}

/// Render a bare single-step field list
pub fn render_fields(fields: &[FieldDefinition], settings: &FormSettings) -> Vec<RenderNode> {
    fields.iter().map(|field| render_field(field, settings)).collect()
}

fn render_field(field: &FieldDefinition, settings: &FormSettings) -> RenderNode {
    let kind = kind_for(field.field_type);
    let display = settings.display;
    RenderNode {
        field_id: field.id.clone(),
        field_type: field.field_type,
        label: display.show_labels.then(|| field.label.clone()),
        placeholder: field.placeholder.clone(),
        help_text: field.help_text.clone().filter(|_| display.show_help_text),
        required: field.required,
        required_indicator: field.required && display.show_required_indicator,
        control: kind.control(field),
        initial_value: kind.initial_value(field),
    }
}
