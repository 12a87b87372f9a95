//! Response values collected by the renderer
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::FieldId;

/// A single answer. The variant follows the field type: booleans for single checkboxes,
/// lists for checkbox groups, numbers for number/rating, text for everything else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl ResponseValue {
    /// Absent-equivalent: blank text, empty list or an unticked checkbox
    pub fn is_empty(&self) -> bool {
        match self {
            ResponseValue::Bool(checked) => !checked,
            ResponseValue::Number(_) => false,
            ResponseValue::Text(text) => text.trim().is_empty(),
            ResponseValue::List(items) => items.iter().all(|i| i.trim().is_empty()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric view: numbers directly, text when it parses as a finite number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResponseValue::Number(n) if n.is_finite() => Some(*n),
            ResponseValue::Text(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

impl From<&str> for ResponseValue {
    fn from(value: &str) -> Self {
        ResponseValue::Text(value.to_string())
    }
}

impl From<String> for ResponseValue {
    fn from(value: String) -> Self {
        ResponseValue::Text(value)
    }
}

impl From<bool> for ResponseValue {
    fn from(value: bool) -> Self {
        ResponseValue::Bool(value)
    }
}

impl From<f64> for ResponseValue {
    fn from(value: f64) -> Self {
        ResponseValue::Number(value)
    }
}

impl From<Vec<String>> for ResponseValue {
    fn from(value: Vec<String>) -> Self {
        ResponseValue::List(value)
    }
}

/// Responses keyed by field id
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Responses(BTreeMap<FieldId, ResponseValue>);

impl Responses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field_id: impl Into<FieldId>, value: impl Into<ResponseValue>) -> Self {
        self.insert(field_id, value);
        self
    }

    pub fn insert(&mut self, field_id: impl Into<FieldId>, value: impl Into<ResponseValue>) {
        self.0.insert(field_id.into(), value.into());
    }

    pub fn get(&self, field_id: &FieldId) -> Option<&ResponseValue> {
        self.0.get(field_id)
    }

    /// The answer for `field_id` unless it is absent or empty
    pub fn answered(&self, field_id: &FieldId) -> Option<&ResponseValue> {
        self.get(field_id).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &ResponseValue)> {
        self.0.iter()
    }
}

impl FromIterator<(FieldId, ResponseValue)> for Responses {
    fn from_iter<T: IntoIterator<Item = (FieldId, ResponseValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
