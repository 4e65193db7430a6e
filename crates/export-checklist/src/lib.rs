//! Export Checklist
//!
//! Produces the customs "Checklist for Shipping Bill" PDF for one export job.
//!
//! ```no_run
//! use export_checklist::{generate, ChecklistConfig, MemorySource};
//!
//! # fn example(source: MemorySource) -> Result<(), export_checklist::ChecklistError> {
//! let artifact = generate(&source, "EXP/0042/25-26", &ChecklistConfig::default())?;
//! std::fs::write(&artifact.file_name, &artifact.bytes).ok();
//! # Ok(())
//! # }
//! ```
//!
//! Generation fetches the job and the rate table for its reference date
//! through a [`JobSource`], builds the document model, lays it out on the
//! fixed page plan and serialises it. Only a missing job, a job without
//! invoices, a failing job fetch, a rejected scheme conflict or a
//! serialisation failure stop it; everything else degrades and is reported in
//! [`ChecklistArtifact::diagnostics`].

pub mod assembler;
pub mod config;
pub mod error;
pub mod source;

pub use config::ChecklistConfig;
pub use error::ChecklistError;
pub use source::{JobSource, MemorySource, SourceError};

use checklist_engine::builder::reference_date;
use checklist_engine::format::file_date;
use checklist_engine::{build_document_model, BuildOptions, Degradation};
use checklist_pdf::{write_pdf, HelveticaMetrics};
use chrono::{Local, NaiveDate};
use export_types::ExchangeRateTable;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// A finished checklist ready to store or send
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistArtifact {
    pub file_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Recoverable problems found while building the document
    pub diagnostics: Vec<Degradation>,
}

/// Generate the checklist for `job_no`, dated today
pub fn generate(
    source: &dyn JobSource,
    job_no: &str,
    config: &ChecklistConfig,
) -> Result<ChecklistArtifact, ChecklistError> {
    generate_on(source, job_no, Local::now().date_naive(), config)
}

/// Generate the checklist for `job_no` as printed on `generated_on`
#[instrument(skip(source, config))]
pub fn generate_on(
    source: &dyn JobSource,
    job_no: &str,
    generated_on: NaiveDate,
    config: &ChecklistConfig,
) -> Result<ChecklistArtifact, ChecklistError> {
    let job = source
        .fetch_job(job_no)
        .map_err(|source| ChecklistError::Source {
            job_no: job_no.to_string(),
            source,
        })?
        .ok_or_else(|| ChecklistError::JobNotFound(job_no.to_string()))?;

    if job.invoices.is_empty() {
        return Err(ChecklistError::NoInvoices(job_no.to_string()));
    }

    let rate_tables = fetch_rate_tables(source, reference_date(&job));
    let options = BuildOptions {
        base_currency: config.base_currency.as_str().to_string(),
    };
    let model = build_document_model(&job, &rate_tables, generated_on, &options);

    if model.has_scheme_conflict() {
        let details = model
            .diagnostics
            .iter()
            .filter(|d| d.is_scheme_conflict())
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        if config.schemes.reject_conflicts {
            return Err(ChecklistError::SchemeConflict {
                job_no: job_no.to_string(),
                details,
            });
        }
        warn!(%details, "Generating checklist despite scheme conflict");
    }

    let pages = assembler::assemble(&model, config, &HelveticaMetrics);
    let title = format!("{} {}", config.firm.document_title, model.shipment.job_no);
    let bytes = write_pdf(&pages, &config.page, &title)?;

    let artifact = ChecklistArtifact {
        file_name: file_name(job_no, generated_on),
        bytes,
        page_count: pages.len(),
        diagnostics: model.diagnostics,
    };
    info!(
        file = %artifact.file_name,
        pages = artifact.page_count,
        degradations = artifact.diagnostics.len(),
        "Generated export checklist"
    );
    Ok(artifact)
}

/// A rate-table fetch failure is not fatal; every invoice falls back instead
fn fetch_rate_tables(source: &dyn JobSource, date: Option<NaiveDate>) -> Vec<ExchangeRateTable> {
    let Some(date) = date else {
        warn!("Job has no usable date; skipping rate table lookup");
        return Vec::new();
    };
    match source.fetch_rates(date) {
        Ok(Some(mut table)) => {
            // The table in force on `date` may carry an earlier notification date
            let requested = date.format("%Y-%m-%d").to_string();
            if table.effective_date != requested {
                debug!(effective_date = %table.effective_date, %date, "Applying rate table to reference date");
                table.effective_date = requested;
            }
            vec![table]
        }
        Ok(None) => {
            warn!(%date, "No rate table published for reference date");
            Vec::new()
        }
        Err(e) => {
            warn!(%date, error = %e, "Failed to fetch rate table");
            Vec::new()
        }
    }
}

/// `Export-CheckList-EXP-0042-25-26-20-Jan-2025.pdf`
pub fn file_name(job_no: &str, generated_on: NaiveDate) -> String {
    format!(
        "Export-CheckList-{}-{}.pdf",
        job_no.trim().replace('/', "-"),
        file_date(generated_on)
    )
}
