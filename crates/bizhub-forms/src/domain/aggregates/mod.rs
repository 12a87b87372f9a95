//! Aggregates module

pub mod form;
pub mod submission;

pub use form::{FormDefinition, FormStatus, SchemaViolation, StepDefinition, StepPatch};
pub use submission::{SubmissionMetadata, SubmissionRecord};
