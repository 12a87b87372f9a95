//! Inbound ports
//!
//! Use cases the application layer offers to the CLI and any host application.

use async_trait::async_trait;

use crate::application::builder::FormBuilder;
use crate::domain::aggregates::{FormDefinition, SubmissionMetadata, SubmissionRecord};
use crate::domain::value_objects::{FormId, Responses};
use crate::error::Result;

/// Form lifecycle use cases
#[async_trait]
pub trait FormUseCases: Send + Sync {
    /// Load a stored form
    async fn load(&self, id: &FormId) -> Result<FormDefinition>;

    /// Open a stored form for editing
    async fn edit(&self, id: &FormId) -> Result<FormBuilder> {
        Ok(FormBuilder::new(self.load(id).await?))
    }

    /// Persist the builder's form. On failure the builder is left exactly as it was.
    async fn save(&self, builder: &mut FormBuilder) -> Result<FormDefinition>;

    /// Validate, canonicalize and hand a response set to the submission gateway
    async fn submit(
        &self,
        form: &FormDefinition,
        responses: Responses,
        metadata: SubmissionMetadata,
        captcha_token: Option<String>,
    ) -> Result<SubmissionRecord>;
}
