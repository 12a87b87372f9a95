//! BizHub Contacts Import
//!
//! Maps the columns of an uploaded CSV file onto canonical contact fields and walks the
//! file through a staged import into a [`ContactSink`].
//!
//! ```
//! use bizhub_contacts_import::{validate_mapping, CanonicalField, ColumnMapping, ImportError};
//!
//! let mapping = ColumnMapping::new().with("Name", CanonicalField::FirstName);
//! assert_eq!(
//!     validate_mapping(&mapping),
//!     Err(ImportError::MissingRequiredMapping(vec![CanonicalField::LastName]))
//! );
//! ```

pub mod error;
pub mod header;
pub mod mapping;
pub mod rows;
pub mod wizard;

pub use error::{ImportError, Result};
pub use header::{parse_document, parse_header, split_record, CsvDocument, Record};
pub use mapping::{map_columns, suggest_mapping, validate_mapping, CanonicalField, ColumnMapping, MappedSchema};
pub use rows::{materialize, ContactDraft, IssueKind, MappedRow, RowIssue};
pub use wizard::{ContactSink, ImportPreview, ImportStage, ImportSummary, ImportWizard, InMemoryContactSink};
