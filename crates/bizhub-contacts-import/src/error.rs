//! Import error types

use thiserror::Error;

use crate::mapping::CanonicalField;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Required canonical fields have no column mapped to them
    #[error("missing required mapping: {}", .0.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", "))]
    MissingRequiredMapping(Vec<CanonicalField>),

    /// Two columns were mapped onto the same canonical field
    #[error("{field} is mapped from more than one column: {}", .headers.join(", "))]
    DuplicateTarget { field: CanonicalField, headers: Vec<String> },

    /// The mapping names a column the file does not have
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("file has no header row")]
    EmptyFile,

    /// The file could not be read as CSV
    #[error("malformed CSV at line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// Operation called out of order
    #[error("cannot {action} while in the {stage} stage")]
    WrongStage { action: &'static str, stage: &'static str },

    /// The contact sink rejected a batch
    #[error("contact sink error: {0}")]
    Sink(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
