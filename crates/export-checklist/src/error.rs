use checklist_pdf::PdfError;
use thiserror::Error;

use crate::source::SourceError;

/// Conditions that stop generation; no partial document is produced
#[derive(Error, Debug)]
pub enum ChecklistError {
    #[error("Export job not found: {0}")]
    JobNotFound(String),

    #[error("Export job {0} has no invoices")]
    NoInvoices(String),

    #[error("Failed to fetch export job {job_no}: {source}")]
    Source {
        job_no: String,
        #[source]
        source: SourceError,
    },

    #[error("Export job {job_no} claims both RODTEP and ROSCTL: {details}")]
    SchemeConflict { job_no: String, details: String },

    #[error("Failed to render checklist: {0}")]
    Render(#[from] PdfError),
}

impl ChecklistError {
    /// Job missing or without invoices
    pub fn is_empty_document(&self) -> bool {
        matches!(self, ChecklistError::JobNotFound(_) | ChecklistError::NoInvoices(_))
    }
}
