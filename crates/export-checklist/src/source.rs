//! Collaborators that supply job records and rate tables
//!
//! Fetching is outside the checklist core. Callers plug in whatever transport
//! they have (HTTP client, database, files) behind [`JobSource`]; retries and
//! caching belong there too.

use std::collections::HashMap;

use chrono::NaiveDate;
use export_types::{ExchangeRateTable, ShipmentJob};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode record: {0}")]
    Decode(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

pub trait JobSource {
    /// The job with this number, or `None` when it does not exist
    fn fetch_job(&self, job_no: &str) -> Result<Option<ShipmentJob>, SourceError>;

    /// The rate table in force on `date`, or `None` when none was published
    fn fetch_rates(&self, date: NaiveDate) -> Result<Option<ExchangeRateTable>, SourceError>;
}

/// Jobs and rate tables held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    jobs: HashMap<String, ShipmentJob>,
    rates: HashMap<NaiveDate, ExchangeRateTable>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job(mut self, job: ShipmentJob) -> Self {
        self.jobs.insert(job.job_no.trim().to_string(), job);
        self
    }

    pub fn with_rates(mut self, date: NaiveDate, table: ExchangeRateTable) -> Self {
        self.rates.insert(date, table);
        self
    }
}

impl JobSource for MemorySource {
    fn fetch_job(&self, job_no: &str) -> Result<Option<ShipmentJob>, SourceError> {
        Ok(self.jobs.get(job_no.trim()).cloned())
    }

    fn fetch_rates(&self, date: NaiveDate) -> Result<Option<ExchangeRateTable>, SourceError> {
        Ok(self.rates.get(&date).cloned())
    }
}
