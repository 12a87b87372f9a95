//! In-memory adapters
//!
//! Used by tests, the CLI's offline commands and local previews.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::application::dto::{SubmissionReceipt, SubmitPayload};
use crate::domain::aggregates::FormDefinition;
use crate::domain::value_objects::FormId;
use crate::domain::DomainEvent;
use crate::ports::outbound::{EventPublisher, FormRepository, RepositoryError, SubmissionGateway};

/// Form store keyed by id; bumps `revision` on every write
#[derive(Default)]
pub struct InMemoryFormRepository {
    forms: DashMap<FormId, FormDefinition>,
}

impl InMemoryFormRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn fetch(&self, id: &FormId) -> Result<FormDefinition, RepositoryError> {
        self.forms
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn create(&self, form: &FormDefinition) -> Result<FormDefinition, RepositoryError> {
        let mut stored = form.clone();
        stored.revision = 1;
        stored.updated_at = Utc::now();

        match self.forms.entry(form.id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(RepositoryError::Conflict(format!("form {} already exists", form.id)))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn update(&self, form: &FormDefinition) -> Result<FormDefinition, RepositoryError> {
        let mut entry = self
            .forms
            .get_mut(&form.id)
            .ok_or_else(|| RepositoryError::NotFound(form.id.to_string()))?;

        if entry.revision != form.revision {
            return Err(RepositoryError::Conflict(format!(
                "form {} is at revision {}, not {}",
                form.id, entry.revision, form.revision
            )));
        }

        let mut stored = form.clone();
        stored.revision = form.revision + 1;
        stored.updated_at = Utc::now();
        *entry = stored.clone();
        Ok(stored)
    }
}

/// Accepts every payload and keeps it for inspection
#[derive(Default)]
pub struct InMemorySubmissionGateway {
    received: RwLock<Vec<SubmitPayload>>,
}

impl InMemorySubmissionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn received(&self) -> Vec<SubmitPayload> {
        self.received.read().await.clone()
    }
}

#[async_trait]
impl SubmissionGateway for InMemorySubmissionGateway {
    async fn submit(&self, payload: &SubmitPayload) -> Result<SubmissionReceipt, RepositoryError> {
        self.received.write().await.push(payload.clone());
        Ok(SubmissionReceipt {
            submission_id: uuid::Uuid::new_v4().to_string(),
            message: None,
            redirect_url: None,
        })
    }
}

/// Keeps every published event
#[derive(Default)]
pub struct InMemoryEventPublisher {
    events: RwLock<Vec<DomainEvent>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<DomainEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        self.events.write().await.extend(events);
        Ok(())
    }
}

/// Drops events
#[derive(Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        Ok(())
    }
}
