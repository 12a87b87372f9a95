//! Field definitions
//!
//! One form input: its type, label, flags and (for choice types) ordered options.

use serde::{Deserialize, Serialize};

use super::{slugify, FieldId, OptionId};

/// Supported input types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Email,
    Phone,
    Date,
    Checkbox,
    Radio,
    Select,
    File,
    Rating,
}

impl FieldType {
    pub const ALL: [FieldType; 11] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Date,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Select,
        FieldType::File,
        FieldType::Rating,
    ];

    /// Whether the type carries an option list
    pub fn supports_options(&self) -> bool {
        matches!(self, FieldType::Checkbox | FieldType::Radio | FieldType::Select)
    }

    /// Wire name (`"text"`, `"select"`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Date => "date",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Select => "select",
            FieldType::File => "file",
            FieldType::Rating => "rating",
        }
    }

    /// Human name used for default labels
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Textarea => "Textarea",
            FieldType::Number => "Number",
            FieldType::Email => "Email",
            FieldType::Phone => "Phone",
            FieldType::Date => "Date",
            FieldType::Checkbox => "Checkbox",
            FieldType::Radio => "Radio",
            FieldType::Select => "Select",
            FieldType::File => "File",
            FieldType::Rating => "Rating",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown field type: {s}"))
    }
}

/// One selectable choice of a select/radio/checkbox field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub id: OptionId,
    pub label: String,
    pub value: String,
}

impl FieldOption {
    /// Option whose value is the slug of its label
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: OptionId::generate(),
            value: slugify(&label),
            label,
        }
    }

    /// The `n`-th default option (1-based): `Option n` / `option_n`
    pub fn numbered(n: usize) -> Self {
        Self::from_label(format!("Option {n}"))
    }
}

/// Schema for one form input
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// `None` on a checkbox means a single boolean checkbox
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

impl FieldDefinition {
    /// New field with the builder defaults for `field_type`
    pub fn new(field_type: FieldType) -> Self {
        Self {
            id: FieldId::generate(),
            field_type,
            label: format!("New {} Field", field_type.display_name()),
            placeholder: None,
            help_text: None,
            required: false,
            options: field_type.supports_options().then(default_options),
        }
    }

    /// Field with an explicit id and label, no options
    pub fn with_id(id: impl Into<FieldId>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            placeholder: None,
            help_text: None,
            required: false,
            options: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    /// Attach options built from labels
    pub fn options<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(labels.into_iter().map(FieldOption::from_label).collect());
        self
    }

    pub fn option_list(&self) -> &[FieldOption] {
        self.options.as_deref().unwrap_or(&[])
    }

    pub fn option(&self, option_id: &OptionId) -> Option<&FieldOption> {
        self.option_list().iter().find(|o| &o.id == option_id)
    }

    pub fn has_option_value(&self, value: &str) -> bool {
        self.option_list().iter().any(|o| o.value == value)
    }

    /// Checkbox without an option list, collected as a single boolean
    pub fn is_boolean_checkbox(&self) -> bool {
        self.field_type == FieldType::Checkbox && self.options.is_none()
    }

    /// Choice types need at least one option; a checkbox may instead have no list at all.
    pub fn has_valid_options(&self) -> bool {
        match (self.field_type, &self.options) {
            (FieldType::Select | FieldType::Radio, Some(options)) => !options.is_empty(),
            (FieldType::Select | FieldType::Radio, None) => false,
            (FieldType::Checkbox, Some(options)) => !options.is_empty(),
            _ => true,
        }
    }

    /// Copy with fresh field and option ids and a `" (Copy)"` label suffix
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = FieldId::generate();
        copy.label = format!("{} (Copy)", self.label);
        if let Some(options) = copy.options.as_mut() {
            for option in options.iter_mut() {
                option.id = OptionId::generate();
            }
        }
        copy
    }

    /// Merge a partial update. The id is never touched.
    pub fn apply(&mut self, patch: FieldPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(placeholder) = patch.placeholder {
            self.placeholder = placeholder;
        }
        if let Some(help_text) = patch.help_text {
            self.help_text = help_text;
        }
        if let Some(required) = patch.required {
            self.required = required;
        }
        if let Some(field_type) = patch.field_type {
            self.change_type(field_type);
        }
    }

    fn change_type(&mut self, field_type: FieldType) {
        if field_type == self.field_type {
            return;
        }
        self.field_type = field_type;
        if !field_type.supports_options() {
            self.options = None;
        } else if self.options.as_ref().map_or(true, Vec::is_empty) {
            self.options = Some(default_options());
        }
    }
}

fn default_options() -> Vec<FieldOption> {
    vec![FieldOption::numbered(1), FieldOption::numbered(2)]
}

/// Partial update for a field. `Some(None)` clears an optional attribute.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub placeholder: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "super::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub help_text: Option<Option<String>>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default, rename = "type")]
    pub field_type: Option<FieldType>,
}

impl FieldPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn required(required: bool) -> Self {
        Self {
            required: Some(required),
            ..Default::default()
        }
    }
}

/// Partial update for an option
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OptionPatch {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl FieldOption {
    pub fn apply(&mut self, patch: OptionPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_null_clears_absent_keeps() {
        let patch: FieldPatch = serde_json::from_str(r#"{"placeholder": null, "helpText": "Shown below"}"#).unwrap();
        assert_eq!(patch.placeholder, Some(None));
        assert_eq!(patch.help_text, Some(Some("Shown below".into())));
        assert_eq!(patch.label, None);

        let empty: FieldPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.placeholder, None);
        assert_eq!(empty.help_text, None);
    }

    #[test]
    fn test_new_field_defaults() {
        let field = FieldDefinition::new(FieldType::Text);
        assert_eq!(field.label, "New Text Field");
        assert!(!field.required);
        assert!(field.options.is_none());
    }

    #[test]
    fn test_choice_field_seeds_two_options() {
        let field = FieldDefinition::new(FieldType::Select);
        let labels: Vec<_> = field.option_list().iter().map(|o| o.label.as_str()).collect();
        let values: Vec<_> = field.option_list().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(labels, ["Option 1", "Option 2"]);
        assert_eq!(values, ["option_1", "option_2"]);
    }

    #[test]
    fn test_option_validity() {
        let mut select = FieldDefinition::with_id("s", FieldType::Select, "Size");
        assert!(!select.has_valid_options());
        select.options = Some(vec![]);
        assert!(!select.has_valid_options());
        select.options = Some(vec![FieldOption::numbered(1)]);
        assert!(select.has_valid_options());

        let agree = FieldDefinition::with_id("c", FieldType::Checkbox, "I agree");
        assert!(agree.is_boolean_checkbox());
        assert!(agree.has_valid_options());
    }

    #[test]
    fn test_change_type_reshapes_options() {
        let mut field = FieldDefinition::new(FieldType::Text);
        field.apply(FieldPatch {
            field_type: Some(FieldType::Radio),
            ..Default::default()
        });
        assert_eq!(field.option_list().len(), 2);

        field.apply(FieldPatch {
            field_type: Some(FieldType::Number),
            ..Default::default()
        });
        assert!(field.options.is_none());
    }

    #[test]
    fn test_patch_clears_placeholder() {
        let mut field = FieldDefinition::new(FieldType::Email).placeholder("you@example.com");
        field.apply(FieldPatch {
            placeholder: Some(None),
            ..Default::default()
        });
        assert!(field.placeholder.is_none());
    }

    #[test]
    fn test_duplicate_gets_fresh_ids() {
        let original = FieldDefinition::new(FieldType::Checkbox);
        let copy = original.duplicate();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.label, "New Checkbox Field (Copy)");
        assert_ne!(copy.option_list()[0].id, original.option_list()[0].id);
        assert_eq!(copy.option_list()[0].value, original.option_list()[0].value);
    }

    #[test]
    fn test_field_type_wire_format() {
        let field = FieldDefinition::with_id("f1", FieldType::Textarea, "Bio");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "textarea");
        assert_eq!(json["id"], "f1");
        assert_eq!("RATING".parse::<FieldType>().unwrap(), FieldType::Rating);
    }
}
