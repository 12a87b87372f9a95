//! Per-type field behaviour
//!
//! Each [`FieldType`] maps to one [`FieldKind`] that knows which control renders it, how to
//! check an answer and how to store that answer canonically.

use chrono::NaiveDate;

use crate::domain::services::renderer::{InputControl, InputType};
use crate::domain::services::validation::FailureKind;
use crate::domain::value_objects::{Email, FieldDefinition, FieldType, ResponseValue};

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

pub trait FieldKind: Send + Sync {
    /// Control used to collect the answer
    fn control(&self, field: &FieldDefinition) -> InputControl;

    /// Check a non-empty answer
    fn check(&self, field: &FieldDefinition, value: &ResponseValue) -> Result<(), FailureKind>;

    /// Canonical stored form of an answer that passed [`FieldKind::check`]
    fn canonicalize(&self, _field: &FieldDefinition, value: ResponseValue) -> ResponseValue {
        match value {
            ResponseValue::Text(text) => ResponseValue::Text(text.trim().to_string()),
            other => other,
        }
    }

    /// Value bound to the control before the user touches it
    fn initial_value(&self, _field: &FieldDefinition) -> Option<ResponseValue> {
        None
    }
}

/// Behaviour for a field type
pub fn kind_for(field_type: FieldType) -> &'static dyn FieldKind {
    match field_type {
        FieldType::Text => &TextKind,
        FieldType::Textarea => &TextareaKind,
        FieldType::Number => &NumberKind,
        FieldType::Email => &EmailKind,
        FieldType::Phone => &PhoneKind,
        FieldType::Date => &DateKind,
        FieldType::Checkbox => &CheckboxKind,
        FieldType::Radio => &ChoiceKind { dropdown: false },
        FieldType::Select => &ChoiceKind { dropdown: true },
        FieldType::File => &FileKind,
        FieldType::Rating => &RatingKind,
    }
}

fn expect_text(value: &ResponseValue) -> Result<&str, FailureKind> {
    value.as_text().ok_or(FailureKind::TypeMismatch { expected: "text" })
}

struct TextKind;

impl FieldKind for TextKind {
    fn control(&self, _field: &FieldDefinition) -> InputControl {
        InputControl::Input { input_type: InputType::Text }
    }

    fn check(&self, _field: &FieldDefinition, value: &ResponseValue) -> Result<(), FailureKind> {
        expect_text(value).map(|_| ())
    }
}

struct TextareaKind;

impl FieldKind for TextareaKind {
    fn control(&self, _field: &FieldDefinition) -> InputControl {
        InputControl::TextArea { rows: 4 }
    }

    fn check(&self, _field: &FieldDefinition, value: &ResponseValue) -> Result<(), FailureKind> {
        expect_text(value).map(|_| ())
    }
}

struct NumberKind;

impl FieldKind for NumberKind {
    fn control(&self, _field: &FieldDefinition) -> InputControl {
        InputControl::Input { input_type: InputType::Number }
    }

    fn check(&self, _field: &FieldDefinition, value: &ResponseValue) -> Result<(), FailureKind> {
        value.as_number().map(|_| ()).ok_or(FailureKind::InvalidNumber)
    }

    fn canonicalize(&self, _field: &FieldDefinition, value: ResponseValue) -> ResponseValue {
        value.as_number().map(ResponseValue::Number).unwrap_or(value)
    }
}

struct EmailKind;

impl FieldKind for EmailKind {
    fn control(&self, _field: &FieldDefinition) -> InputControl {
        InputControl::Input { input_type: InputType::Email }
    }

    fn check(&self, _field: &FieldDefinition, value: &ResponseValue) -> Result<(), FailureKind> {
        let text = expect_text(value)?;
        if Email::is_valid_format(text) {
            Ok(())
        } else {
            Err(FailureKind::InvalidEmail)
        }
    }
}

struct PhoneKind;

impl PhoneKind {
    fn is_plausible(text: &str) -> bool {
        let text = text.trim();
        let body = text.strip_prefix('+').unwrap_or(text);
        let mut digits = 0;
        for c in body.chars() {
            match c {
                '0'..='9' => digits += 1,
                ' ' | '-' | '(' | ')' | '.' => {}
                _ => return false,
            }
        }
        (7..=15).contains(&digits)
    }
}

impl FieldKind for PhoneKind {
    fn control(&self, _field: &FieldDefinition) -> InputControl {
        InputControl::Input { input_type: InputType::Tel }
    }

    fn check(&self, _field: &FieldDefinition, value: &ResponseValue) -> Result<(), FailureKind> {
        if Self::is_plausible(expect_text(value)?) {
            Ok(())
        } else {
            Err(FailureKind::InvalidPhone)
        }
    }
}

struct DateKind;

impl FieldKind for DateKind {
    fn control(&self, _field: &FieldDefinition) -> InputControl {
        InputControl::Input { input_type: InputType::Date }
    }

    fn check(&self, _field: &FieldDefinition, value: &ResponseValue) -> Result<(), FailureKind> {
        let text = expect_text(value)?;
        NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| FailureKind::InvalidDate)
    }
}

struct CheckboxKind;

impl FieldKind for CheckboxKind {
    fn control(&self, field: &FieldDefinition) -> InputControl {
        match &field.options {
            Some(options) => InputControl::CheckboxGroup { options: options.clone() },
            None => InputControl::Checkbox,
        }
    }

    fn check(&self, field: &FieldDefinition, value: &ResponseValue) -> Result<(), FailureKind> {
        if field.is_boolean_checkbox() {
            return match value {
                ResponseValue::Bool(_) => Ok(()),
                _ => Err(FailureKind::TypeMismatch { expected: "boolean" }),
            };
        }
        let selected: Vec<&str> = match value {
            ResponseValue::List(items) => items.iter().map(String::as_str).collect(),
            ResponseValue::Text(text) => vec![text.as_str()],
            _ => return Err(FailureKind::TypeMismatch { expected: "list" }),
        };
        if selected.iter().all(|v| field.has_option_value(v.trim())) {
            Ok(())
        } else {
            Err(FailureKind::InvalidOption)
        }
    }

    fn canonicalize(&self, _field: &FieldDefinition, value: ResponseValue) -> ResponseValue {
        let items = match value {
            ResponseValue::List(items) => items,
            ResponseValue::Text(text) => vec![text],
            other => return other,
        };
        let mut unique: Vec<String> = Vec::with_capacity(items.len());
        for item in items {
            let item = item.trim().to_string();
            if !item.is_empty() && !unique.contains(&item) {
                unique.push(item);
            }
        }
        ResponseValue::List(unique)
    }

    fn initial_value(&self, field: &FieldDefinition) -> Option<ResponseValue> {
        if field.is_boolean_checkbox() {
            Some(ResponseValue::Bool(false))
        } else {
            Some(ResponseValue::List(vec![]))
        }
    }
}

struct ChoiceKind {
    dropdown: bool,
}

impl FieldKind for ChoiceKind {
    fn control(&self, field: &FieldDefinition) -> InputControl {
        let options = field.option_list().to_vec();
        if self.dropdown {
            InputControl::Select { options }
        } else {
            InputControl::RadioGroup { options }
        }
    }

    fn check(&self, field: &FieldDefinition, value: &ResponseValue) -> Result<(), FailureKind> {
        let text = expect_text(value)?;
        if field.has_option_value(text.trim()) {
            Ok(())
        } else {
            Err(FailureKind::InvalidOption)
        }
    }
}

struct FileKind;

impl FieldKind for FileKind {
    fn control(&self, _field: &FieldDefinition) -> InputControl {
        InputControl::FileUpload
    }

    // The upload collaborator owns file validation; only the reference shape is checked.
    fn check(&self, _field: &FieldDefinition, value: &ResponseValue) -> Result<(), FailureKind> {
        match value {
            ResponseValue::Text(_) | ResponseValue::List(_) => Ok(()),
            _ => Err(FailureKind::TypeMismatch { expected: "file reference" }),
        }
    }
}

struct RatingKind;

impl RatingKind {
    fn score(value: &ResponseValue) -> Option<u8> {
        let n = value.as_number()?;
        let in_range = n.fract() == 0.0 && n >= RATING_MIN as f64 && n <= RATING_MAX as f64;
        in_range.then_some(n as u8)
    }
}

impl FieldKind for RatingKind {
    fn control(&self, _field: &FieldDefinition) -> InputControl {
        InputControl::Rating {
            min: RATING_MIN,
            max: RATING_MAX,
        }
    }

    fn check(&self, _field: &FieldDefinition, value: &ResponseValue) -> Result<(), FailureKind> {
        Self::score(value).map(|_| ()).ok_or(FailureKind::InvalidRating)
    }

    fn canonicalize(&self, _field: &FieldDefinition, value: ResponseValue) -> ResponseValue {
        match Self::score(&value) {
            Some(score) => ResponseValue::Number(score as f64),
            None => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(field: &FieldDefinition, value: impl Into<ResponseValue>) -> Result<(), FailureKind> {
        kind_for(field.field_type).check(field, &value.into())
    }

    #[test]
    fn test_number_accepts_numeric_text() {
        let field = FieldDefinition::with_id("n", FieldType::Number, "Qty");
        assert!(check(&field, "42").is_ok());
        assert!(check(&field, 3.5).is_ok());
        assert_eq!(check(&field, "forty"), Err(FailureKind::InvalidNumber));
        assert_eq!(
            kind_for(FieldType::Number).canonicalize(&field, "7".into()),
            ResponseValue::Number(7.0)
        );
    }

    #[test]
    fn test_date_must_be_iso_calendar_date() {
        let field = FieldDefinition::with_id("d", FieldType::Date, "When");
        assert!(check(&field, "2024-02-29").is_ok());
        assert_eq!(check(&field, "2023-02-29"), Err(FailureKind::InvalidDate));
        assert_eq!(check(&field, "29/02/2024"), Err(FailureKind::InvalidDate));
    }

    #[test]
    fn test_phone_plausibility() {
        let field = FieldDefinition::with_id("p", FieldType::Phone, "Phone");
        assert!(check(&field, "+1 (555) 010-2030").is_ok());
        assert_eq!(check(&field, "12"), Err(FailureKind::InvalidPhone));
        assert_eq!(check(&field, "call me"), Err(FailureKind::InvalidPhone));
    }

    #[test]
    fn test_rating_bounds() {
        let field = FieldDefinition::with_id("r", FieldType::Rating, "Score");
        assert!(check(&field, 5.0).is_ok());
        assert!(check(&field, "1").is_ok());
        assert_eq!(check(&field, 0.0), Err(FailureKind::InvalidRating));
        assert_eq!(check(&field, 6.0), Err(FailureKind::InvalidRating));
        assert_eq!(check(&field, 2.5), Err(FailureKind::InvalidRating));
    }

    #[test]
    fn test_choice_values_must_exist() {
        let field = FieldDefinition::with_id("s", FieldType::Select, "Size").options(["Small", "Large"]);
        assert!(check(&field, "small").is_ok());
        assert_eq!(check(&field, "medium"), Err(FailureKind::InvalidOption));
        assert_eq!(check(&field, true), Err(FailureKind::TypeMismatch { expected: "text" }));
    }

    #[test]
    fn test_checkbox_group_and_boolean() {
        let group = FieldDefinition::with_id("c", FieldType::Checkbox, "Topics").options(["News", "Offers"]);
        assert!(check(&group, vec!["news".to_string(), "offers".to_string()]).is_ok());
        assert_eq!(check(&group, vec!["spam".to_string()]), Err(FailureKind::InvalidOption));
        assert_eq!(
            kind_for(FieldType::Checkbox).canonicalize(&group, vec![" news".to_string(), "news".to_string()].into()),
            ResponseValue::List(vec!["news".into()])
        );

        let agree = FieldDefinition::with_id("a", FieldType::Checkbox, "I agree");
        assert!(check(&agree, true).is_ok());
        assert_eq!(kind_for(FieldType::Checkbox).initial_value(&agree), Some(ResponseValue::Bool(false)));
    }
}
