//! Application layer
//!
//! Editing sessions, submission assembly and the service that connects them to the ports.

pub mod builder;
pub mod dto;
pub mod embed;
pub mod service;
pub mod submission;
pub mod templates;

pub use builder::FormBuilder;
pub use dto::{SubmissionReceipt, SubmitPayload};
pub use embed::{iframe_snippet, script_snippet, EmbedPosition};
pub use service::FormService;
pub use submission::{assemble, canonicalize};
pub use templates::FormTemplate;
