//! Column mapping
//!
//! A mapping is a partial function from CSV header to canonical contact field. Headers left
//! out of the mapping are ignored on import.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

/// Contact attribute a column can feed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    FirstName,
    LastName,
    Email,
    Phone,
    Company,
    JobTitle,
    Address,
    City,
    State,
    PostalCode,
    Country,
    Tags,
    Notes,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 13] = [
        CanonicalField::FirstName,
        CanonicalField::LastName,
        CanonicalField::Email,
        CanonicalField::Phone,
        CanonicalField::Company,
        CanonicalField::JobTitle,
        CanonicalField::Address,
        CanonicalField::City,
        CanonicalField::State,
        CanonicalField::PostalCode,
        CanonicalField::Country,
        CanonicalField::Tags,
        CanonicalField::Notes,
    ];

    /// Fields every mapping must cover
    pub const REQUIRED: [CanonicalField; 2] = [CanonicalField::FirstName, CanonicalField::LastName];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::FirstName => "firstName",
            CanonicalField::LastName => "lastName",
            CanonicalField::Email => "email",
            CanonicalField::Phone => "phone",
            CanonicalField::Company => "company",
            CanonicalField::JobTitle => "jobTitle",
            CanonicalField::Address => "address",
            CanonicalField::City => "city",
            CanonicalField::State => "state",
            CanonicalField::PostalCode => "postalCode",
            CanonicalField::Country => "country",
            CanonicalField::Tags => "tags",
            CanonicalField::Notes => "notes",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::FirstName => "First Name",
            CanonicalField::LastName => "Last Name",
            CanonicalField::Email => "Email",
            CanonicalField::Phone => "Phone",
            CanonicalField::Company => "Company",
            CanonicalField::JobTitle => "Job Title",
            CanonicalField::Address => "Address",
            CanonicalField::City => "City",
            CanonicalField::State => "State",
            CanonicalField::PostalCode => "Postal Code",
            CanonicalField::Country => "Country",
            CanonicalField::Tags => "Tags",
            CanonicalField::Notes => "Notes",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }

    /// Normalized header spellings recognised by [`suggest_mapping`]
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::FirstName => &["firstname", "fname", "first", "givenname", "forename"],
            CanonicalField::LastName => &["lastname", "lname", "last", "surname", "familyname"],
            CanonicalField::Email => &["email", "emailaddress", "mail", "email1"],
            CanonicalField::Phone => &["phone", "phonenumber", "mobile", "tel", "telephone", "cell"],
            CanonicalField::Company => &["company", "companyname", "organization", "organisation", "account"],
            CanonicalField::JobTitle => &["jobtitle", "title", "position", "role"],
            CanonicalField::Address => &["address", "street", "streetaddress", "address1"],
            CanonicalField::City => &["city", "town"],
            CanonicalField::State => &["state", "province", "region"],
            CanonicalField::PostalCode => &["postalcode", "zip", "zipcode", "postcode"],
            CanonicalField::Country => &["country"],
            CanonicalField::Tags => &["tags", "labels"],
            CanonicalField::Notes => &["notes", "note", "comments", "description"],
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown contact field: {s}"))
    }
}

/// Header → canonical field
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<String, CanonicalField>);

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, header: impl Into<String>, field: CanonicalField) -> Self {
        self.0.insert(header.into(), field);
        self
    }

    /// Map a header, or unmap it with `None`
    pub fn set(&mut self, header: impl Into<String>, field: Option<CanonicalField>) {
        let header = header.into();
        match field {
            Some(field) => {
                self.0.insert(header, field);
            }
            None => {
                self.0.remove(&header);
            }
        }
    }

    pub fn get(&self, header: &str) -> Option<CanonicalField> {
        self.0.get(header).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CanonicalField)> {
        self.0.iter().map(|(h, f)| (h.as_str(), *f))
    }

    /// Whether any header feeds `field`
    pub fn covers(&self, field: CanonicalField) -> bool {
        self.0.values().any(|f| *f == field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<H: Into<String>> FromIterator<(H, CanonicalField)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (H, CanonicalField)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(h, f)| (h.into(), f)).collect())
    }
}

/// Check that every required field is covered and no field is fed twice
pub fn validate_mapping(mapping: &ColumnMapping) -> Result<()> {
    let missing: Vec<CanonicalField> = CanonicalField::REQUIRED
        .into_iter()
        .filter(|f| !mapping.covers(*f))
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingRequiredMapping(missing));
    }

    let mut sources: BTreeMap<CanonicalField, Vec<String>> = BTreeMap::new();
    for (header, field) in mapping.iter() {
        sources.entry(field).or_default().push(header.to_string());
    }
    match sources.into_iter().find(|(_, headers)| headers.len() > 1) {
        Some((field, headers)) => Err(ImportError::DuplicateTarget { field, headers }),
        None => Ok(()),
    }
}

/// Guess a mapping from header spellings; each field is claimed by the first matching header
pub fn suggest_mapping(headers: &[String]) -> ColumnMapping {
    let mut mapping = ColumnMapping::new();
    for header in headers {
        let key = normalize(header);
        let guess = CanonicalField::ALL
            .into_iter()
            .find(|f| !mapping.covers(*f) && f.aliases().contains(&key.as_str()));
        if let Some(field) = guess {
            mapping.set(header.clone(), Some(field));
        }
    }
    mapping
}

fn normalize(header: &str) -> String {
    header
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Positional view of a mapping over a concrete header row
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MappedSchema {
    pub headers: Vec<String>,
    /// Target of each column, `None` for ignored columns
    pub columns: Vec<Option<CanonicalField>>,
}

impl MappedSchema {
    pub fn mapped_fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.columns.iter().flatten().copied()
    }
}

/// Resolve a mapping against the header row. Mapping keys must name existing headers.
pub fn map_columns(headers: &[String], mapping: &ColumnMapping) -> Result<MappedSchema> {
    if let Some((unknown, _)) = mapping.iter().find(|(h, _)| !headers.iter().any(|x| x.as_str() == *h)) {
        return Err(ImportError::UnknownColumn(unknown.to_string()));
    }

    Ok(MappedSchema {
        headers: headers.to_vec(),
        columns: headers.iter().map(|h| mapping.get(h)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_last_name_mapping() {
        let mapping = ColumnMapping::new().with("Name", CanonicalField::FirstName);
        assert_eq!(
            validate_mapping(&mapping),
            Err(ImportError::MissingRequiredMapping(vec![CanonicalField::LastName]))
        );

        let schema = map_columns(&headers(&["Name", "Email"]), &mapping).unwrap();
        assert_eq!(schema.columns, [Some(CanonicalField::FirstName), None]);
    }

    #[test]
    fn test_both_names_missing_in_order() {
        let mapping = ColumnMapping::new().with("Email", CanonicalField::Email);
        let err = validate_mapping(&mapping).unwrap_err();
        assert_eq!(
            err,
            ImportError::MissingRequiredMapping(vec![CanonicalField::FirstName, CanonicalField::LastName])
        );
        assert_eq!(err.to_string(), "missing required mapping: firstName, lastName");
    }

    #[test]
    fn test_duplicate_target() {
        let mapping: ColumnMapping = [
            ("First", CanonicalField::FirstName),
            ("Given", CanonicalField::FirstName),
            ("Last", CanonicalField::LastName),
        ]
        .into_iter()
        .collect();
        assert!(matches!(
            validate_mapping(&mapping),
            Err(ImportError::DuplicateTarget { field: CanonicalField::FirstName, .. })
        ));
    }

    #[test]
    fn test_suggest_mapping() {
        let mapping = suggest_mapping(&headers(&[
            "First Name",
            "Surname",
            "E-mail Address",
            "Zip",
            "Favourite colour",
            "Last",
        ]));
        assert_eq!(mapping.get("First Name"), Some(CanonicalField::FirstName));
        assert_eq!(mapping.get("Surname"), Some(CanonicalField::LastName));
        assert_eq!(mapping.get("E-mail Address"), Some(CanonicalField::Email));
        assert_eq!(mapping.get("Zip"), Some(CanonicalField::PostalCode));
        assert_eq!(mapping.get("Favourite colour"), None);
        // lastName was already claimed by "Surname"
        assert_eq!(mapping.get("Last"), None);
        assert!(validate_mapping(&mapping).is_ok());
    }

    #[test]
    fn test_unknown_column() {
        let mapping = ColumnMapping::new().with("Nope", CanonicalField::Notes);
        assert_eq!(
            map_columns(&headers(&["Name"]), &mapping),
            Err(ImportError::UnknownColumn("Nope".into()))
        );
    }

    #[test]
    fn test_field_names_round_trip_through_serde() {
        let mapping = ColumnMapping::new().with("Name", CanonicalField::FirstName);
        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"Name":"firstName"}"#);
        assert_eq!("jobtitle".parse::<CanonicalField>(), Ok(CanonicalField::JobTitle));
    }
}
