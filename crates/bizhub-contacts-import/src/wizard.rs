//! Import wizard
//!
//! Staged flow: upload → map → review → import → complete. Each stage only accepts the calls
//! that make sense for it; anything else is a [`ImportError::WrongStage`].

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::{ImportError, Result};
use crate::header::{parse_document, CsvDocument};
use crate::mapping::{map_columns, suggest_mapping, validate_mapping, CanonicalField, ColumnMapping};
use crate::rows::{materialize, ContactDraft, RowIssue};

/// Bulk contact creation port
#[async_trait]
pub trait ContactSink: Send + Sync {
    /// Create a batch of contacts; returns how many were created
    async fn create_contacts(&self, contacts: &[ContactDraft]) -> Result<usize>;
}

/// Keeps created contacts in memory
#[derive(Default)]
pub struct InMemoryContactSink {
    contacts: RwLock<Vec<ContactDraft>>,
}

impl InMemoryContactSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contacts(&self) -> Vec<ContactDraft> {
        self.contacts.read().await.clone()
    }
}

#[async_trait]
impl ContactSink for InMemoryContactSink {
    async fn create_contacts(&self, contacts: &[ContactDraft]) -> Result<usize> {
        self.contacts.write().await.extend_from_slice(contacts);
        Ok(contacts.len())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStage {
    Upload,
    Map,
    Review,
    Import,
    Complete,
}

impl ImportStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStage::Upload => "upload",
            ImportStage::Map => "map",
            ImportStage::Review => "review",
            ImportStage::Import => "import",
            ImportStage::Complete => "complete",
        }
    }
}

/// What the review stage shows before anything is created
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub total_rows: usize,
    pub ready: usize,
    pub issues: Vec<RowIssue>,
    pub sample: Vec<ContactDraft>,
}

/// Outcome of the import stage
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total_rows: usize,
    pub imported: usize,
    /// Rows held back by review issues
    pub skipped: usize,
    /// Rows in batches the sink rejected
    pub failed: usize,
    pub batches: usize,
    pub issues: Vec<RowIssue>,
    pub errors: Vec<String>,
}

const SAMPLE_SIZE: usize = 5;

#[derive(Debug)]
pub struct ImportWizard {
    stage: ImportStage,
    batch_size: usize,
    document: Option<CsvDocument>,
    mapping: ColumnMapping,
    ready: Vec<ContactDraft>,
    issues: Vec<RowIssue>,
    summary: Option<ImportSummary>,
}

impl ImportWizard {
    pub fn new(batch_size: usize) -> Self {
        Self {
            stage: ImportStage::Upload,
            batch_size: batch_size.max(1),
            document: None,
            mapping: ColumnMapping::new(),
            ready: vec![],
            issues: vec![],
            summary: None,
        }
    }

    pub fn from_config(config: &bizhub_forms::config::ImportConfig) -> Self {
        Self::new(config.batch_size)
    }

    pub fn stage(&self) -> ImportStage {
        self.stage
    }

    pub fn headers(&self) -> &[String] {
        self.document.as_ref().map_or(&[], |d| d.headers.as_slice())
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn summary(&self) -> Option<&ImportSummary> {
        self.summary.as_ref()
    }

    /// Read a file's contents and suggest a mapping from its headers
    pub fn upload(&mut self, text: &str) -> Result<&ColumnMapping> {
        self.expect_stage(&[ImportStage::Upload, ImportStage::Map], "upload a file")?;
        let document = parse_document(text)?;
        self.mapping = suggest_mapping(&document.headers);
        info!(
            columns = document.headers.len(),
            rows = document.records.len(),
            suggested = self.mapping.len(),
            "import file uploaded"
        );
        self.document = Some(document);
        self.stage = ImportStage::Map;
        Ok(&self.mapping)
    }

    /// Map one column, or ignore it with `None`
    pub fn map_column(&mut self, header: &str, field: Option<CanonicalField>) -> Result<()> {
        self.expect_stage(&[ImportStage::Map], "change the mapping")?;
        if !self.headers().iter().any(|h| h == header) {
            return Err(ImportError::UnknownColumn(header.to_string()));
        }
        self.mapping.set(header, field);
        Ok(())
    }

    pub fn set_mapping(&mut self, mapping: ColumnMapping) -> Result<()> {
        self.expect_stage(&[ImportStage::Map], "change the mapping")?;
        map_columns(self.headers(), &mapping)?;
        self.mapping = mapping;
        Ok(())
    }

    /// Validate the mapping and materialize every row for review
    pub fn confirm_mapping(&mut self) -> Result<ImportPreview> {
        self.expect_stage(&[ImportStage::Map], "confirm the mapping")?;
        validate_mapping(&self.mapping)?;
        let document = self.document.as_ref().ok_or(ImportError::EmptyFile)?;
        let schema = map_columns(&document.headers, &self.mapping)?;

        let mut ready = vec![];
        let mut issues = vec![];
        for record in &document.records {
            match ContactDraft::from_row(&materialize(&schema, record)) {
                Ok(draft) => ready.push(draft),
                Err(row_issues) => issues.extend(row_issues),
            }
        }

        info!(ready = ready.len(), issues = issues.len(), "import mapping confirmed");
        self.ready = ready;
        self.issues = issues;
        self.stage = ImportStage::Review;
        Ok(self.preview())
    }

    pub fn preview(&self) -> ImportPreview {
        ImportPreview {
            total_rows: self.total_rows(),
            ready: self.ready.len(),
            issues: self.issues.clone(),
            sample: self.ready.iter().take(SAMPLE_SIZE).cloned().collect(),
        }
    }

    /// Return from review to the mapping stage
    pub fn back_to_mapping(&mut self) -> Result<()> {
        self.expect_stage(&[ImportStage::Review], "go back to mapping")?;
        self.ready.clear();
        self.issues.clear();
        self.stage = ImportStage::Map;
        Ok(())
    }

    /// Hand every reviewed contact to the sink in batches.
    ///
    /// A rejected batch is counted as failed and the remaining batches still run.
    pub async fn import(&mut self, sink: &dyn ContactSink) -> Result<ImportSummary> {
        self.expect_stage(&[ImportStage::Review], "start the import")?;
        self.stage = ImportStage::Import;

        let mut summary = ImportSummary {
            total_rows: self.total_rows(),
            skipped: self.total_rows() - self.ready.len(),
            issues: self.issues.clone(),
            ..Default::default()
        };

        for batch in self.ready.chunks(self.batch_size) {
            summary.batches += 1;
            match sink.create_contacts(batch).await {
                Ok(created) => {
                    summary.imported += created;
                    summary.failed += batch.len().saturating_sub(created);
                }
                Err(e) => {
                    warn!(batch = summary.batches, size = batch.len(), error = %e, "contact batch rejected");
                    summary.failed += batch.len();
                    summary.errors.push(e.to_string());
                }
            }
        }

        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            failed = summary.failed,
            "contact import complete"
        );
        self.stage = ImportStage::Complete;
        self.summary = Some(summary.clone());
        Ok(summary)
    }

    /// Start over with the same batch size
    pub fn reset(&mut self) {
        *self = Self::new(self.batch_size);
    }

    fn total_rows(&self) -> usize {
        self.document.as_ref().map_or(0, |d| d.records.len())
    }

    fn expect_stage(&self, allowed: &[ImportStage], action: &'static str) -> Result<()> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(ImportError::WrongStage {
                action,
                stage: self.stage.as_str(),
            })
        }
    }
}
