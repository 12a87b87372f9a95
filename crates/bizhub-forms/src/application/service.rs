//! Form application service
//!
//! Wires the builder and the submission assembly to the outbound ports.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::application::builder::FormBuilder;
use crate::application::dto::SubmitPayload;
use crate::application::submission::assemble;
use crate::domain::aggregates::{FormDefinition, SubmissionMetadata, SubmissionRecord};
use crate::domain::events::{DomainEvent, FormEvent, SubmissionEvent};
use crate::domain::value_objects::{FormId, Responses};
use crate::error::{FormsError, Result};
use crate::ports::inbound::FormUseCases;
use crate::ports::outbound::{EventPublisher, FormRepository, SubmissionGateway};

pub struct FormService {
    forms: Arc<dyn FormRepository>,
    submissions: Arc<dyn SubmissionGateway>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl FormService {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        submissions: Arc<dyn SubmissionGateway>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            forms,
            submissions,
            event_publisher,
        }
    }

    async fn publish(&self, events: Vec<DomainEvent>) {
        if events.is_empty() {
            return;
        }
        if let Err(e) = self.event_publisher.publish(events).await {
            warn!(error = %e, "failed to publish form events");
        }
    }
}

#[async_trait]
impl FormUseCases for FormService {
    async fn load(&self, id: &FormId) -> Result<FormDefinition> {
        Ok(self.forms.fetch(id).await?)
    }

    async fn save(&self, builder: &mut FormBuilder) -> Result<FormDefinition> {
        let form = builder.form();
        let violations = form.check_integrity();
        if !violations.is_empty() {
            return Err(FormsError::Schema(violations));
        }

        let saved = if form.revision == 0 {
            self.forms.create(form).await?
        } else {
            self.forms.update(form).await?
        };

        builder.mark_saved(saved.clone());
        let mut events = builder.take_events();
        events.push(DomainEvent::Form(FormEvent::Saved {
            form_id: saved.id.clone(),
            revision: saved.revision,
            saved_at: Utc::now(),
        }));
        info!(form_id = %saved.id, revision = saved.revision, "form saved");

        self.publish(events).await;
        Ok(saved)
    }

    async fn submit(
        &self,
        form: &FormDefinition,
        responses: Responses,
        metadata: SubmissionMetadata,
        captcha_token: Option<String>,
    ) -> Result<SubmissionRecord> {
        let mut record = assemble(form, &responses, metadata, captcha_token.as_deref())?;

        let payload = SubmitPayload::from_record(&record, captcha_token);
        let receipt = self.submissions.submit(&payload).await?;
        record.id = receipt.submission_id;
        info!(form_id = %form.id, submission_id = %record.id, "submission accepted");

        self.publish(vec![DomainEvent::Submission(SubmissionEvent::Received {
            form_id: form.id.clone(),
            submission_id: record.id.clone(),
            received_at: Utc::now(),
        })])
        .await;
        Ok(record)
    }
}
