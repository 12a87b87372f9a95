//! Outbound ports
//!
//! Implemented by infrastructure: the in-memory adapters in tests and the CLI, the HTTP
//! adapter against the BizHub API.

use async_trait::async_trait;
use thiserror::Error;

use crate::application::dto::{SubmissionReceipt, SubmitPayload};
use crate::domain::aggregates::FormDefinition;
use crate::domain::value_objects::FormId;
use crate::domain::DomainEvent;

/// Form definition persistence port
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Load a form by id
    async fn fetch(&self, id: &FormId) -> Result<FormDefinition, RepositoryError>;

    /// Persist a never-saved form; returns the stored copy
    async fn create(&self, form: &FormDefinition) -> Result<FormDefinition, RepositoryError>;

    /// Persist changes to an existing form; returns the stored copy
    async fn update(&self, form: &FormDefinition) -> Result<FormDefinition, RepositoryError>;
}

/// Submission intake port
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, payload: &SubmitPayload) -> Result<SubmissionReceipt, RepositoryError>;
}

/// Event publisher port
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish domain events
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError>;
}

/// Repository error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),

    /// Stored revision moved on since the form was loaded
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl RepositoryError {
    /// Whether the same call may succeed when retried
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(RepositoryError::Transport("reset".into()).is_retryable());
        assert!(RepositoryError::Api { status: 503, message: "down".into() }.is_retryable());
        assert!(RepositoryError::Api { status: 429, message: "slow down".into() }.is_retryable());
        assert!(!RepositoryError::Api { status: 422, message: "bad".into() }.is_retryable());
        assert!(!RepositoryError::NotFound("form_1".into()).is_retryable());
    }
}
