//! Row materialization
//!
//! Data rows are zipped against the header row by position. A ragged row that is shorter
//! than the header is padded with empty strings rather than rejected; values beyond the last
//! header are dropped.

use std::collections::BTreeMap;

use bizhub_forms::Email;
use serde::Serialize;

use crate::header::Record;
use crate::mapping::{CanonicalField, MappedSchema};

/// One data row keyed by canonical field
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MappedRow {
    pub line: usize,
    pub values: BTreeMap<CanonicalField, String>,
}

impl MappedRow {
    /// Value for a field; empty when the field is unmapped or the cell is blank
    pub fn get(&self, field: CanonicalField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }
}

pub fn materialize(schema: &MappedSchema, record: &Record) -> MappedRow {
    let values = schema
        .columns
        .iter()
        .enumerate()
        .filter_map(|(index, target)| {
            let field = (*target)?;
            let value = record.values.get(index).cloned().unwrap_or_default();
            Some((field, value))
        })
        .collect();

    MappedRow {
        line: record.line,
        values,
    }
}

/// Contact ready for bulk creation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Why a row will not be imported
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IssueKind {
    MissingName { field: CanonicalField },
    MalformedEmail { value: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    pub line: usize,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl ContactDraft {
    /// Build a contact from a row, or every problem that row has
    pub fn from_row(row: &MappedRow) -> Result<Self, Vec<RowIssue>> {
        let mut issues = vec![];
        let issue = |kind| RowIssue { line: row.line, kind };

        for field in CanonicalField::REQUIRED {
            if row.get(field).is_empty() {
                issues.push(issue(IssueKind::MissingName { field }));
            }
        }

        let raw_email = row.get(CanonicalField::Email);
        let email = if raw_email.is_empty() {
            None
        } else {
            match Email::new(raw_email) {
                Ok(email) => Some(email),
                Err(_) => {
                    issues.push(issue(IssueKind::MalformedEmail {
                        value: raw_email.to_string(),
                    }));
                    None
                }
            }
        };

        if !issues.is_empty() {
            return Err(issues);
        }

        let optional = |field| Some(row.get(field).to_string()).filter(|v| !v.is_empty());
        Ok(Self {
            first_name: row.get(CanonicalField::FirstName).to_string(),
            last_name: row.get(CanonicalField::LastName).to_string(),
            email,
            phone: optional(CanonicalField::Phone),
            company: optional(CanonicalField::Company),
            job_title: optional(CanonicalField::JobTitle),
            address: optional(CanonicalField::Address),
            city: optional(CanonicalField::City),
            state: optional(CanonicalField::State),
            postal_code: optional(CanonicalField::PostalCode),
            country: optional(CanonicalField::Country),
            tags: split_tags(row.get(CanonicalField::Tags)),
            notes: optional(CanonicalField::Notes),
        })
    }
}

/// Tags cell: `;` or `,` separated, blanks and repeats dropped
fn split_tags(cell: &str) -> Vec<String> {
    let mut tags: Vec<String> = vec![];
    for tag in cell.split([';', ',']).map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
