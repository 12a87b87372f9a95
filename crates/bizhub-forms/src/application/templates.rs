//! Starter templates
//!
//! Field sets a new form can be seeded with instead of starting blank.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{FieldDefinition, FieldId, FieldType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormTemplate {
    ContactUs,
    LeadCapture,
    EventRegistration,
    Feedback,
    Newsletter,
}

impl FormTemplate {
    pub const ALL: [FormTemplate; 5] = [
        FormTemplate::ContactUs,
        FormTemplate::LeadCapture,
        FormTemplate::EventRegistration,
        FormTemplate::Feedback,
        FormTemplate::Newsletter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormTemplate::ContactUs => "contact-us",
            FormTemplate::LeadCapture => "lead-capture",
            FormTemplate::EventRegistration => "event-registration",
            FormTemplate::Feedback => "feedback",
            FormTemplate::Newsletter => "newsletter",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FormTemplate::ContactUs => "Let visitors get in touch with your team",
            FormTemplate::LeadCapture => "Qualify prospects before a sales call",
            FormTemplate::EventRegistration => "Collect attendee details for an event",
            FormTemplate::Feedback => "Ask customers how you are doing",
            FormTemplate::Newsletter => "Grow your mailing list",
        }
    }

    /// Fresh field set; ids are generated on every call
    pub fn fields(&self) -> Vec<FieldDefinition> {
        let field = |field_type, label: &str| FieldDefinition::with_id(FieldId::generate(), field_type, label);

        match self {
            FormTemplate::ContactUs => vec![
                field(FieldType::Text, "Name").required(true),
                field(FieldType::Email, "Email").required(true),
                field(FieldType::Phone, "Phone"),
                field(FieldType::Textarea, "Message").required(true),
            ],
            FormTemplate::LeadCapture => vec![
                field(FieldType::Text, "First name").required(true),
                field(FieldType::Text, "Last name").required(true),
                field(FieldType::Email, "Work email").required(true),
                field(FieldType::Text, "Company"),
                field(FieldType::Select, "Company size").options(["1-10", "11-50", "51-200", "200+"]),
            ],
            FormTemplate::EventRegistration => vec![
                field(FieldType::Text, "Full name").required(true),
                field(FieldType::Email, "Email").required(true),
                field(FieldType::Date, "Preferred date"),
                field(FieldType::Radio, "Ticket type")
                    .options(["General", "VIP"])
                    .required(true),
                field(FieldType::Checkbox, "I agree to the terms").required(true),
            ],
            FormTemplate::Feedback => vec![
                field(FieldType::Rating, "How would you rate us?").required(true),
                field(FieldType::Checkbox, "What did you like?").options(["Product", "Support", "Pricing"]),
                field(FieldType::Textarea, "Anything else?"),
            ],
            FormTemplate::Newsletter => vec![
                field(FieldType::Email, "Email").required(true).placeholder("you@example.com"),
                field(FieldType::Text, "First name"),
            ],
        }
    }
}

impl fmt::Display for FormTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown template: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::FormDefinition;

    #[test]
    fn test_every_template_is_structurally_valid() {
        for template in FormTemplate::ALL {
            let form = FormDefinition::single_step(template.as_str(), template.fields());
            assert!(form.is_structurally_valid(), "{template}");
        }
    }

    #[test]
    fn test_terms_checkbox_is_boolean() {
        let fields = FormTemplate::EventRegistration.fields();
        assert!(fields.last().unwrap().is_boolean_checkbox());
    }

    #[test]
    fn test_parse() {
        assert_eq!("Lead-Capture".parse::<FormTemplate>(), Ok(FormTemplate::LeadCapture));
        assert!("survey".parse::<FormTemplate>().is_err());
    }
}
