//! Job records and rate tables read from JSON files on disk

use std::fs;
use std::path::Path;

use checklist_engine::format::parse_date;
use chrono::NaiveDate;
use export_checklist::{JobSource, SourceError};
use export_types::{ExchangeRateTable, ShipmentJob};
use tracing::debug;

pub struct FileSource {
    job: ShipmentJob,
    rate_tables: Vec<(NaiveDate, ExchangeRateTable)>,
}

impl FileSource {
    /// Load one job record and any number of rate tables
    pub fn load(job_path: &Path, rate_paths: &[impl AsRef<Path>]) -> Result<Self, SourceError> {
        let job: ShipmentJob = read_json(job_path)?;

        let mut rate_tables = Vec::with_capacity(rate_paths.len());
        for path in rate_paths {
            let path = path.as_ref();
            let table: ExchangeRateTable = read_json(path)?;
            let effective = parse_date(&table.effective_date).ok_or_else(|| {
                SourceError::Decode(format!(
                    "{}: unreadable effective_date '{}'",
                    path.display(),
                    table.effective_date
                ))
            })?;
            rate_tables.push((effective, table));
        }
        rate_tables.sort_by_key(|(date, _)| *date);

        debug!(job_no = %job.job_no, tables = rate_tables.len(), "Loaded job files");
        Ok(Self { job, rate_tables })
    }

    pub fn job_no(&self) -> &str {
        self.job.job_no.trim()
    }
}

impl JobSource for FileSource {
    fn fetch_job(&self, job_no: &str) -> Result<Option<ShipmentJob>, SourceError> {
        if self.job.job_no.trim() == job_no.trim() {
            Ok(Some(self.job.clone()))
        } else {
            Ok(None)
        }
    }

    /// Latest table whose effective date is on or before `date`
    fn fetch_rates(&self, date: NaiveDate) -> Result<Option<ExchangeRateTable>, SourceError> {
        Ok(self
            .rate_tables
            .iter()
            .rev()
            .find(|(effective, _)| *effective <= date)
            .map(|(_, table)| table.clone()))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SourceError> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| SourceError::Decode(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(date: &str, rate: f64) -> ExchangeRateTable {
        serde_json::from_value(serde_json::json!({
            "effective_date": date,
            "exchange_rates": [{ "currency_code": "USD", "export_rate": rate }]
        }))
        .unwrap()
    }

    fn source() -> FileSource {
        let mut rate_tables = vec![
            (NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), table("2025-01-01", 85.9)),
            (NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(), table("2025-01-16", 87.6)),
        ];
        rate_tables.sort_by_key(|(date, _)| *date);
        FileSource {
            job: ShipmentJob {
                job_no: "EXP/0042/25-26".into(),
                ..Default::default()
            },
            rate_tables,
        }
    }

    #[test]
    fn test_picks_table_in_force() {
        let source = source();
        let on = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();

        let mid = source.fetch_rates(on(15)).unwrap().unwrap();
        assert_eq!(mid.effective_date, "2025-01-01");

        let after = source.fetch_rates(on(20)).unwrap().unwrap();
        assert_eq!(after.effective_date, "2025-01-16");
    }

    #[test]
    fn test_no_table_before_first_notification() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert!(source().fetch_rates(date).unwrap().is_none());
    }

    #[test]
    fn test_other_job_numbers_not_found() {
        let source = source();
        assert!(source.fetch_job(" EXP/0042/25-26 ").unwrap().is_some());
        assert!(source.fetch_job("EXP/0043/25-26").unwrap().is_none());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FileSource::load(Path::new("/nonexistent/job.json"), &[] as &[&Path]).err();
        assert!(matches!(err, Some(SourceError::Io(_))));
    }
}
