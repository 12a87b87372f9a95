//! Error types for the forms crate

use thiserror::Error;

use crate::domain::aggregates::SchemaViolation;
use crate::domain::services::ValidationError;
use crate::ports::outbound::RepositoryError;

/// Kind of entity an id referred to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Form,
    Step,
    Field,
    Option,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EntityKind::Form => "form",
            EntityKind::Step => "step",
            EntityKind::Field => "field",
            EntityKind::Option => "option",
        })
    }
}

/// Outcome of a builder operation that could not be applied.
///
/// The form definition is never modified when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// Referenced id no longer exists
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// A form must keep at least one step
    #[error("cannot remove the only remaining step")]
    LastStep,

    /// Choice fields must keep at least one option
    #[error("field {0} must keep at least one option")]
    LastOption(String),

    /// Option value is blank or already used by another option of the field
    #[error("field {field_id} cannot use option value {value:?}")]
    InvalidOptionValue { field_id: String, value: String },

    /// Options were addressed on a type that has none
    #[error("field {0} does not take options")]
    OptionsNotSupported(String),
}

impl BuilderError {
    pub(crate) fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Forms error type
#[derive(Error, Debug)]
pub enum FormsError {
    /// Responses failed validation; carries every failure
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Form definition breaks a structural invariant
    #[error("invalid form definition: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Schema(Vec<SchemaViolation>),

    /// Builder refused an operation
    #[error(transparent)]
    Builder(#[from] BuilderError),

    /// Form is not accepting submissions
    #[error("form {0} is not accepting submissions")]
    NotAccepting(String),

    /// CAPTCHA is enabled but no token was supplied
    #[error("captcha token required")]
    CaptchaRequired,

    /// Persistence collaborator failed; local state is unchanged
    #[error("persistence error: {0}")]
    Persistence(#[from] RepositoryError),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl FormsError {
    /// Whether retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, FormsError::Persistence(e) if e.is_retryable())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FormsError::Builder(BuilderError::NotFound { .. })
                | FormsError::Persistence(RepositoryError::NotFound(_))
        )
    }
}

/// Result type for forms operations
pub type Result<T> = std::result::Result<T, FormsError>;
