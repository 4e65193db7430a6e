//! Checklist generation through an in-memory job source
//!
//! Run with: cargo test -p export-checklist --test generate

use chrono::NaiveDate;
use export_checklist::{
    generate_on, ChecklistConfig, ChecklistError, JobSource, MemorySource, SourceError,
};
use export_types::{
    Container, CurrencyRate, DrawbackDetail, ExchangeRateTable, Invoice, LineItem, Numeric,
    RodtepInfo, RosctlInfo, ShipmentJob,
};
use pretty_assertions::assert_eq;

const JOB_NO: &str = "SFSA/EXP/1024/25-26";

fn printed_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
}

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

fn usd_table(effective_date: &str) -> ExchangeRateTable {
    ExchangeRateTable {
        notification_number: "01/2025-Customs (N.T.)".into(),
        effective_date: effective_date.into(),
        exchange_rates: vec![CurrencyRate {
            currency_code: "USD".into(),
            export_rate: Numeric::Value(87.15),
            ..Default::default()
        }],
    }
}

fn line(serial: &str, amount: f64) -> LineItem {
    LineItem {
        serial_number: serial.into(),
        description: "Cotton knitted T-shirts".into(),
        ritc: "61091000".into(),
        quantity: Numeric::Value(500.0),
        qty_unit: "PCS".into(),
        amount: Numeric::Value(amount),
        ..Default::default()
    }
}

fn job(products: Vec<LineItem>) -> ShipmentJob {
    let total: f64 = products.iter().map(|p| p.amount.or_zero()).sum();
    ShipmentJob {
        job_no: JOB_NO.into(),
        job_date: "2025-01-15".into(),
        custom_house: "INNSA1".into(),
        invoices: vec![Invoice {
            invoice_number: "EXP-77".into(),
            invoice_date: "2025-01-14".into(),
            currency: "USD".into(),
            invoice_value: Numeric::Value(total),
            product_value: Numeric::Value(total),
            products,
            ..Default::default()
        }],
        containers: vec![Container {
            container_no: "MSKU1234567".into(),
            container_type: "40HC".into(),
            pkgs_stuffed: Numeric::Value(120.0),
            gross_weight: Numeric::Value(8450.5),
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn conflicting_line() -> LineItem {
    LineItem {
        rodtep_info: RodtepInfo {
            claim: true,
            rate_percent: Numeric::Value(0.5),
            ..Default::default()
        },
        drawback_details: vec![DrawbackDetail {
            dbk_sr_no: "610901".into(),
            dbk_rate: Numeric::Value(1.2),
            show_rosctl: true,
            rosctl: RosctlInfo {
                amount_inr: Numeric::Value(2500.0),
                ..Default::default()
            },
            ..Default::default()
        }],
        ..line("1", 6690.82)
    }
}

fn page_count(bytes: &[u8]) -> usize {
    lopdf::Document::load_mem(bytes).unwrap().get_pages().len()
}

#[test]
fn test_generates_named_pdf() {
    let source = MemorySource::new()
        .with_job(job(vec![line("1", 6690.82)]))
        .with_rates(reference(), usd_table("2025-01-15"));

    let artifact = generate_on(&source, JOB_NO, printed_on(), &ChecklistConfig::default()).unwrap();

    assert_eq!(artifact.file_name, "Export-CheckList-SFSA-EXP-1024-25-26-20-Jan-2025.pdf");
    assert!(artifact.page_count >= 5);
    assert_eq!(page_count(&artifact.bytes), artifact.page_count);
    assert!(artifact.diagnostics.is_empty(), "{:?}", artifact.diagnostics);
}

#[test]
fn test_rate_table_in_force_applies_to_reference_date() {
    // Notification dated before the job; the source returns it for the job date
    let source = MemorySource::new()
        .with_job(job(vec![line("1", 100.0)]))
        .with_rates(reference(), usd_table("2025-01-01"));

    let artifact = generate_on(&source, JOB_NO, printed_on(), &ChecklistConfig::default()).unwrap();

    assert!(artifact.diagnostics.is_empty(), "{:?}", artifact.diagnostics);
}

#[test]
fn test_missing_rate_table_degrades() {
    let source = MemorySource::new().with_job(job(vec![line("1", 100.0)]));

    let artifact = generate_on(&source, JOB_NO, printed_on(), &ChecklistConfig::default()).unwrap();

    assert_eq!(artifact.diagnostics.len(), 1);
    assert!(artifact.diagnostics[0].to_string().contains("USD"));
    assert!(artifact.page_count >= 5);
}

#[test]
fn test_unknown_job_is_not_found() {
    let source = MemorySource::new();

    let err = generate_on(&source, "NOPE/1", printed_on(), &ChecklistConfig::default()).unwrap_err();

    assert!(matches!(err, ChecklistError::JobNotFound(ref no) if no == "NOPE/1"));
    assert!(err.is_empty_document());
}

#[test]
fn test_job_without_invoices_is_rejected() {
    let mut empty = job(vec![]);
    empty.invoices.clear();
    let source = MemorySource::new().with_job(empty);

    let err = generate_on(&source, JOB_NO, printed_on(), &ChecklistConfig::default()).unwrap_err();

    assert!(matches!(err, ChecklistError::NoInvoices(_)));
    assert!(err.is_empty_document());
}

#[test]
fn test_scheme_conflict_rejected_by_default() {
    let source = MemorySource::new()
        .with_job(job(vec![conflicting_line()]))
        .with_rates(reference(), usd_table("2025-01-15"));

    let err = generate_on(&source, JOB_NO, printed_on(), &ChecklistConfig::default()).unwrap_err();

    match err {
        ChecklistError::SchemeConflict { job_no, details } => {
            assert_eq!(job_no, JOB_NO);
            assert!(details.contains("item 1"));
        }
        other => panic!("expected scheme conflict, got {other:?}"),
    }
}

#[test]
fn test_scheme_conflict_allowed_when_configured() {
    let source = MemorySource::new()
        .with_job(job(vec![conflicting_line()]))
        .with_rates(reference(), usd_table("2025-01-15"));
    let config = ChecklistConfig::from_str("[schemes]\nreject_conflicts = false\n").unwrap();

    let artifact = generate_on(&source, JOB_NO, printed_on(), &config).unwrap();

    assert!(artifact.diagnostics.iter().any(|d| d.is_scheme_conflict()));
    assert_eq!(page_count(&artifact.bytes), artifact.page_count);
}

#[test]
fn test_many_lines_add_item_pages() {
    let few = MemorySource::new()
        .with_job(job(vec![line("1", 100.0)]))
        .with_rates(reference(), usd_table("2025-01-15"));
    let many = MemorySource::new()
        .with_job(job((1..=80).map(|i| line(&i.to_string(), 100.0)).collect()))
        .with_rates(reference(), usd_table("2025-01-15"));
    let config = ChecklistConfig::default();

    let short = generate_on(&few, JOB_NO, printed_on(), &config).unwrap();
    let long = generate_on(&many, JOB_NO, printed_on(), &config).unwrap();

    assert!(long.page_count > short.page_count);
    assert_eq!(page_count(&long.bytes), long.page_count);
}

#[test]
fn test_identical_inputs_give_identical_bytes() {
    let source = MemorySource::new()
        .with_job(job(vec![line("1", 6690.82), line("2", 1200.0)]))
        .with_rates(reference(), usd_table("2025-01-15"));
    let config = ChecklistConfig::default();

    let first = generate_on(&source, JOB_NO, printed_on(), &config).unwrap();
    let second = generate_on(&source, JOB_NO, printed_on(), &config).unwrap();

    assert_eq!(first.bytes, second.bytes);
}

struct FailingSource;

impl JobSource for FailingSource {
    fn fetch_job(&self, _job_no: &str) -> Result<Option<ShipmentJob>, SourceError> {
        Err(SourceError::Unavailable("connection refused".into()))
    }

    fn fetch_rates(&self, _date: NaiveDate) -> Result<Option<ExchangeRateTable>, SourceError> {
        Err(SourceError::Unavailable("connection refused".into()))
    }
}

#[test]
fn test_source_failure_is_reported() {
    let err = generate_on(&FailingSource, JOB_NO, printed_on(), &ChecklistConfig::default()).unwrap_err();

    assert!(matches!(err, ChecklistError::Source { .. }));
    assert!(err.to_string().contains("connection refused"));
}

/// Rates fail but the job is fine: generation still succeeds
struct FlakyRates(MemorySource);

impl JobSource for FlakyRates {
    fn fetch_job(&self, job_no: &str) -> Result<Option<ShipmentJob>, SourceError> {
        self.0.fetch_job(job_no)
    }

    fn fetch_rates(&self, _date: NaiveDate) -> Result<Option<ExchangeRateTable>, SourceError> {
        Err(SourceError::Decode("unexpected token".into()))
    }
}

#[test]
fn test_rate_fetch_failure_is_not_fatal() {
    let source = FlakyRates(MemorySource::new().with_job(job(vec![line("1", 100.0)])));

    let artifact = generate_on(&source, JOB_NO, printed_on(), &ChecklistConfig::default()).unwrap();

    assert_eq!(artifact.diagnostics.len(), 1);
}
