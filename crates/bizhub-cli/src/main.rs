//! BizHub CLI
//!
//! Command-line tools for form definitions and contact imports.
//!
//! # Usage
//!
//! ```bash
//! bizhub new "Contact us" --template contact-us -o contact.json
//! bizhub validate contact.json --responses answers.json
//! bizhub render contact.json --format yaml
//! bizhub embed contact.json --iframe
//! bizhub import-preview contacts.csv --map "Name=firstName"
//! bizhub fetch form_123
//! bizhub submit form_123 --responses answers.json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "bizhub")]
#[command(author = "BizHub")]
#[command(version)]
#[command(about = "BizHub forms command line interface", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.bizhub/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    format: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a form definition, optionally from a template
    New {
        name: String,
        #[arg(long, short)]
        template: Option<bizhub_forms::FormTemplate>,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Check a form definition and, optionally, a set of responses
    Validate {
        form: PathBuf,
        #[arg(long, short)]
        responses: Option<PathBuf>,
        /// Only validate the fields of this step (0-based)
        #[arg(long)]
        step: Option<usize>,
    },
    /// Print the render tree of a form definition
    Render { form: PathBuf },
    /// Print the embed snippet for a form definition
    Embed {
        form: PathBuf,
        #[arg(long)]
        iframe: bool,
        #[arg(long)]
        position: Option<bizhub_forms::application::EmbedPosition>,
    },
    /// Map and review a contacts CSV without importing it
    ImportPreview {
        file: PathBuf,
        /// Override a column mapping: `Header=field`, or `Header=` to ignore the column
        #[arg(long = "map", value_name = "HEADER=FIELD")]
        mappings: Vec<String>,
    },
    /// Fetch a form definition from the API
    Fetch { id: String },
    /// Submit responses to a stored form through the API
    Submit {
        id: String,
        #[arg(long, short)]
        responses: PathBuf,
        #[arg(long)]
        captcha_token: Option<String>,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default configuration file
    Init,
    /// Show the effective configuration
    Show,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::New { name, template, output } => commands::forms::new(&name, template, output.as_deref(), format),
        Commands::Validate { form, responses, step } => {
            commands::forms::validate(&form, responses.as_deref(), step, format)
        }
        Commands::Render { form } => commands::forms::render(&form, format),
        Commands::Embed { form, iframe, position } => {
            let config = config::load(config_path)?;
            commands::forms::embed(&form, iframe, position, &config)
        }
        Commands::ImportPreview { file, mappings } => {
            let config = config::load(config_path)?;
            commands::import::preview(&file, &mappings, &config, format)
        }
        Commands::Fetch { id } => {
            let config = config::load(config_path)?;
            commands::remote::fetch(&id, &config, format).await
        }
        Commands::Submit {
            id,
            responses,
            captcha_token,
        } => {
            let config = config::load(config_path)?;
            commands::remote::submit(&id, &responses, captcha_token, &config, format).await
        }
        Commands::Config { action } => match action {
            ConfigCommands::Init => {
                let path = config::init(config_path)?;
                println!("Configuration initialized at {}", path.display());
                Ok(())
            }
            ConfigCommands::Show => format.print(&config::load(config_path)?),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import_preview_mappings() {
        let cli = Cli::try_parse_from([
            "bizhub",
            "import-preview",
            "contacts.csv",
            "--map",
            "Name=firstName",
            "--map",
            "Surname=lastName",
        ])
        .unwrap();
        match cli.command {
            Commands::ImportPreview { mappings, .. } => assert_eq!(mappings, ["Name=firstName", "Surname=lastName"]),
            _ => panic!("wrong subcommand"),
        }
    }
}
