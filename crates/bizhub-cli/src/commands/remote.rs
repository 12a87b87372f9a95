//! Commands that talk to the BizHub API

use std::path::Path;
use std::sync::Arc;

use bizhub_forms::infrastructure::{HttpFormsApi, NoOpEventPublisher};
use bizhub_forms::{FormId, FormService, FormUseCases, FormsConfig, Responses, SubmissionMetadata};

use super::read_json;
use crate::output::OutputFormat;

fn service(config: &FormsConfig) -> anyhow::Result<FormService> {
    let api = Arc::new(HttpFormsApi::new(&config.api)?);
    Ok(FormService::new(api.clone(), api, Arc::new(NoOpEventPublisher)))
}

pub async fn fetch(id: &str, config: &FormsConfig, format: OutputFormat) -> anyhow::Result<()> {
    let form = service(config)?.load(&FormId::from_string(id)).await?;
    format.print(&form)
}

pub async fn submit(
    id: &str,
    responses_path: &Path,
    captcha_token: Option<String>,
    config: &FormsConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let responses: Responses = read_json(responses_path)?;
    let service = service(config)?;
    let form = service.load(&FormId::from_string(id)).await?;

    let record = service
        .submit(&form, responses, SubmissionMetadata::from_source("cli"), captcha_token)
        .await?;
    format.print(&record)
}
