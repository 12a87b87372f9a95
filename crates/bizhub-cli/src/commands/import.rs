//! Contact import commands

use std::path::Path;

use anyhow::{anyhow, Context};
use bizhub_contacts_import::{CanonicalField, ImportWizard};
use bizhub_forms::FormsConfig;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::output::OutputFormat;

#[derive(Tabled)]
struct MappingRow {
    column: String,
    field: String,
}

#[derive(Tabled)]
struct IssueRow {
    line: usize,
    issue: String,
}

#[derive(Serialize)]
struct PreviewOutput<'a> {
    mapping: &'a bizhub_contacts_import::ColumnMapping,
    preview: bizhub_contacts_import::ImportPreview,
}

/// Parse `Header=field`; an empty field ignores the column
pub fn parse_override(raw: &str) -> anyhow::Result<(String, Option<CanonicalField>)> {
    let (header, field) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected HEADER=FIELD, got {raw:?}"))?;
    let field = match field.trim() {
        "" => None,
        name => Some(name.parse::<CanonicalField>().map_err(|e| anyhow!(e))?),
    };
    Ok((header.trim().to_string(), field))
}

pub fn preview(file: &Path, overrides: &[String], config: &FormsConfig, format: OutputFormat) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;

    let mut wizard = ImportWizard::from_config(&config.import);
    wizard.upload(&text)?;
    for raw in overrides {
        let (header, field) = parse_override(raw)?;
        wizard.map_column(&header, field)?;
    }
    let preview = wizard.confirm_mapping()?;

    match format {
        OutputFormat::Table => {
            let mapping = wizard.headers().iter().map(|header| MappingRow {
                column: header.clone(),
                field: wizard
                    .mapping()
                    .get(header)
                    .map(|f| f.as_str().to_string())
                    .unwrap_or_else(|| "(ignored)".into()),
            });
            println!("{}", Table::new(mapping));

            if !preview.issues.is_empty() {
                let issues = preview.issues.iter().map(|issue| IssueRow {
                    line: issue.line,
                    issue: format!("{:?}", issue.kind),
                });
                println!("{}", Table::new(issues));
            }

            println!(
                "{} {} of {} rows ready, {} with issues",
                "OK".green(),
                preview.ready,
                preview.total_rows,
                preview.total_rows - preview.ready,
            );
            Ok(())
        }
        _ => format.print(&PreviewOutput {
            mapping: wizard.mapping(),
            preview,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("Given Name = firstName").unwrap(),
            ("Given Name".to_string(), Some(CanonicalField::FirstName))
        );
        assert_eq!(parse_override("Fax=").unwrap(), ("Fax".to_string(), None));
        assert!(parse_override("Fax").is_err());
        assert!(parse_override("Fax=faxNumber").is_err());
    }
}
