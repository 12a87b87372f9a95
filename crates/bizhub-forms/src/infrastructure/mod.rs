//! Infrastructure layer
//!
//! Concrete adapters for the outbound ports.

pub mod http;
pub mod persistence;

pub use http::HttpFormsApi;
pub use persistence::{InMemoryEventPublisher, InMemoryFormRepository, InMemorySubmissionGateway, NoOpEventPublisher};
