//! BizHub Forms
//!
//! Dynamic form definitions shared by the form builder, preview, embed and submission
//! review surfaces.
//!
//! ## Architecture
//!
//! - **Domain Layer**: form schema, per-type field behaviour, validation, rendering
//! - **Application Layer**: builder sessions, submission assembly, templates, embed snippets
//! - **Ports Layer**: repository, submission and event interfaces
//! - **Infrastructure Layer**: in-memory and HTTP adapters
//!
//! ## Example
//!
//! ```
//! use bizhub_forms::{validate, FieldPatch, FieldType, FormBuilder, Responses};
//!
//! let mut builder = FormBuilder::create("Newsletter");
//! let email = builder.add_field(0, FieldType::Email).unwrap();
//! builder.update_field(&email.id, FieldPatch::required(true)).unwrap();
//!
//! let report = validate(builder.form(), &Responses::new().with(email.id.as_str(), "not-an-email"));
//! assert_eq!(report.failures().len(), 1);
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;

// Re-exports for convenience
pub use application::{FormBuilder, FormService, FormTemplate, SubmissionReceipt, SubmitPayload};
pub use config::FormsConfig;
pub use domain::aggregates::{
    FormDefinition, FormStatus, SchemaViolation, StepDefinition, StepPatch, SubmissionMetadata, SubmissionRecord,
};
pub use domain::events::{DomainEvent, FormEvent, SubmissionEvent};
pub use domain::services::{
    render, render_fields, validate, validate_step, FailureKind, FieldFailure, RenderTree, ValidationError,
    ValidationReport,
};
pub use domain::value_objects::{
    Email, FieldDefinition, FieldId, FieldOption, FieldPatch, FieldType, FormId, FormSettings, OptionId, OptionPatch,
    ResponseValue, Responses, SettingsPatch, StepId,
};
pub use error::{BuilderError, EntityKind, FormsError, Result};
pub use ports::inbound::FormUseCases;
pub use ports::outbound::{EventPublisher, FormRepository, RepositoryError, SubmissionGateway};
