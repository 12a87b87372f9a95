//! Form definition commands

use std::path::Path;

use anyhow::Context;
use bizhub_forms::application::{iframe_snippet, script_snippet, EmbedPosition};
use bizhub_forms::{validate_step, FormBuilder, FormDefinition, FormTemplate, FormsConfig, Responses, ValidationReport};
use colored::Colorize;
use tabled::{Table, Tabled};

use super::read_json;
use crate::output::OutputFormat;

#[derive(Tabled)]
struct FailureRow {
    field: String,
    failure: String,
    message: String,
}

#[derive(Tabled)]
struct NodeRow {
    step: usize,
    field: String,
    #[tabled(rename = "type")]
    field_type: String,
    label: String,
    required: bool,
}

pub fn new(
    name: &str,
    template: Option<FormTemplate>,
    output: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let builder = match template {
        Some(template) => FormBuilder::from_template(name, template),
        None => FormBuilder::create(name),
    };
    let form = builder.into_form();

    match output {
        Some(path) => {
            std::fs::write(path, serde_json::to_string_pretty(&form)?)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("{} wrote {} ({} fields)", "OK".green(), path.display(), form.field_count());
            Ok(())
        }
        None => format.print(&form),
    }
}

pub fn validate(
    form_path: &Path,
    responses_path: Option<&Path>,
    step: Option<usize>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let form: FormDefinition = read_json(form_path)?;

    let violations = form.check_integrity();
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("{} {}", "invalid:".red().bold(), violation);
        }
        anyhow::bail!("{} structural problem(s) in {}", violations.len(), form_path.display());
    }

    let Some(responses_path) = responses_path else {
        println!("{} {} is structurally valid", "OK".green(), form.name);
        return Ok(());
    };

    let responses: Responses = read_json(responses_path)?;
    let report = match step {
        Some(index) => validate_step(&form, index, &responses)
            .with_context(|| format!("form has no step {index}"))?,
        None => bizhub_forms::validate(&form, &responses),
    };

    print_report(&report, format)?;
    if report.is_valid() {
        Ok(())
    } else {
        anyhow::bail!("{} field(s) failed validation", report.failures().len())
    }
}

fn print_report(report: &ValidationReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table if report.is_valid() => {
            println!("{} all responses are valid", "OK".green());
            Ok(())
        }
        OutputFormat::Table => {
            let rows = report.failures().iter().map(|f| FailureRow {
                field: f.field_id.to_string(),
                failure: format!("{:?}", f.kind),
                message: f.message.clone(),
            });
            println!("{}", Table::new(rows));
            Ok(())
        }
        _ => format.print(report),
    }
}

pub fn render(form_path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let form: FormDefinition = read_json(form_path)?;
    let tree = bizhub_forms::render(&form);

    match format {
        OutputFormat::Table => {
            let rows = tree.steps.iter().enumerate().flat_map(|(index, step)| {
                step.nodes.iter().map(move |node| NodeRow {
                    step: index,
                    field: node.field_id.to_string(),
                    field_type: node.field_type.to_string(),
                    label: node.label.clone().unwrap_or_default(),
                    required: node.required,
                })
            });
            println!("{}", tree.title.bold());
            println!("{}", Table::new(rows));
            Ok(())
        }
        _ => format.print(&tree),
    }
}

pub fn embed(
    form_path: &Path,
    iframe: bool,
    position: Option<EmbedPosition>,
    config: &FormsConfig,
) -> anyhow::Result<()> {
    let form: FormDefinition = read_json(form_path)?;
    let mut embed = config.embed.clone();
    if let Some(position) = position {
        embed.default_position = position;
    }

    let snippet = if iframe {
        iframe_snippet(&form, &embed)
    } else {
        script_snippet(&form, &embed)
    };
    println!("{snippet}");
    Ok(())
}
