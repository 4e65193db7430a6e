//! End-to-end model builds over small but realistic jobs

use chrono::NaiveDate;
use checklist_engine::format::{money, round2};
use checklist_engine::valuation::RateSource;
use checklist_engine::{build_document_model, BuildOptions, Degradation};
use export_types::{
    Charge, Container, CurrencyRate, DrawbackDetail, ExchangeRateTable, FreightInsuranceCharges,
    Invoice, LineItem, Numeric, RodtepInfo, ShipmentJob,
};
use pretty_assertions::assert_eq;

fn generated_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
}

fn usd_table() -> ExchangeRateTable {
    ExchangeRateTable {
        effective_date: "2025-01-15".into(),
        exchange_rates: vec![CurrencyRate {
            currency_code: "USD".into(),
            currency_name: "US Dollar".into(),
            export_rate: Numeric::Value(87.15),
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn line(serial: &str, amount: f64) -> LineItem {
    LineItem {
        serial_number: serial.into(),
        quantity: Numeric::Value(100.0),
        qty_unit: "PCS".into(),
        amount: Numeric::Value(amount),
        ..Default::default()
    }
}

fn invoice(number: &str, currency: &str, products: Vec<LineItem>) -> Invoice {
    let total: f64 = products.iter().map(|p| p.amount.or_zero()).sum();
    Invoice {
        invoice_number: number.into(),
        invoice_date: "2025-01-15".into(),
        currency: currency.into(),
        invoice_value: Numeric::Value(total),
        product_value: Numeric::Value(total),
        products,
        ..Default::default()
    }
}

fn job(invoices: Vec<Invoice>) -> ShipmentJob {
    ShipmentJob {
        job_no: "SFSA/EXP/1024/25-26".into(),
        job_date: "2025-01-15".into(),
        custom_house: "INNSA1".into(),
        invoices,
        ..Default::default()
    }
}

#[test]
fn test_single_line_usd_invoice() {
    let job = job(vec![invoice("INV-77", "USD", vec![line("1", 6690.82)])]);

    let model = build_document_model(&job, &[usd_table()], generated_on(), &BuildOptions::default());

    assert_eq!(model.lines.len(), 1);
    assert_eq!(money(model.lines[0].fob_inr), "583104.96");
    assert!((round2(model.totals.fob_inr) - 583104.96).abs() < 1e-6);
    assert_eq!(model.invoices[0].rate_source, RateSource::RateTable);
    assert_eq!(model.invoices[0].exchange_rate, 87.15);
    assert!(model.diagnostics.is_empty());
    assert_eq!(model.generated_on, "20 Jan 2025");
    assert_eq!(model.reference_date.as_deref(), Some("15 Jan 2025"));
}

#[test]
fn test_missing_currency_falls_back_to_unity_per_invoice() {
    let job = job(vec![
        invoice("INV-1", "USD", vec![line("1", 1000.0)]),
        invoice("INV-2", "EUR", vec![line("1", 500.0)]),
    ]);

    let model = build_document_model(&job, &[usd_table()], generated_on(), &BuildOptions::default());

    assert_eq!(model.lines.len(), 2);
    assert!((model.lines[0].fob_inr - 87150.0).abs() < 1e-6);
    assert_eq!(model.lines[1].fob_inr, 500.0);
    assert_eq!(model.invoices[1].rate_source, RateSource::Unity);
    assert!(matches!(
        model.diagnostics.as_slice(),
        [Degradation::MissingRate { currency, used, .. }] if currency == "EUR" && *used == 1.0
    ));
}

#[test]
fn test_foreign_fob_is_totalled_per_currency() {
    let job = job(vec![
        invoice("INV-1", "usd", vec![line("1", 600.0), line("2", 400.0)]),
        invoice("INV-2", "JPY", vec![line("1", 500_000.0)]),
    ]);

    let model = build_document_model(&job, &[usd_table()], generated_on(), &BuildOptions::default());

    assert_eq!(model.lines[0].currency, "USD");
    assert_eq!(
        model.fob_fc_by_currency(),
        vec![("USD".to_string(), 1000.0), ("JPY".to_string(), 500_000.0)]
    );
}

#[test]
fn test_job_level_rate_used_before_unity() {
    let mut job = job(vec![invoice("INV-2", "EUR", vec![line("1", 500.0)])]);
    job.exchange_rate = Numeric::Value(91.5);

    let model = build_document_model(&job, &[usd_table()], generated_on(), &BuildOptions::default());

    assert_eq!(model.invoices[0].rate_source, RateSource::JobDefault);
    assert_eq!(model.lines[0].fob_inr, 500.0 * 91.5);
}

#[test]
fn test_two_drawback_rows_on_one_line() {
    let mut item = line("1", 6690.82);
    item.drawback_details = vec![
        DrawbackDetail {
            dbk_sr_no: "610902".into(),
            dbk_rate: Numeric::Value(1.2),
            ..Default::default()
        },
        DrawbackDetail {
            dbk_sr_no: "610999".into(),
            dbk_rate: Numeric::Value(0.9),
            ..Default::default()
        },
    ];
    let job = job(vec![invoice("INV-77", "USD", vec![item])]);

    let model = build_document_model(&job, &[usd_table()], generated_on(), &BuildOptions::default());

    let fob_inr = model.lines[0].fob_inr;
    let rows = &model.schemes.dbk_rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].dbk_sr_no, "610902");
    assert_eq!(rows[1].dbk_sr_no, "610999");
    assert!((rows[0].amount - fob_inr * 0.012).abs() < 1e-6);
    assert!((rows[1].amount - fob_inr * 0.009).abs() < 1e-6);
    assert!((model.totals.drawback - (rows[0].amount + rows[1].amount)).abs() < 1e-9);
    assert_eq!(rows[0].invoice_no, "INV-77");
    assert_eq!(rows[0].item_no, "1");
}

#[test]
fn test_freight_and_insurance_reduce_fob() {
    let mut inv = invoice("INV-5", "USD", vec![line("1", 750.0), line("2", 250.0)]);
    inv.freight_insurance_charges = FreightInsuranceCharges {
        freight: Charge {
            amount: Numeric::Value(80.0),
            currency: "USD".into(),
            ..Default::default()
        },
        insurance: Charge {
            amount: Numeric::Value(20.0),
            ..Default::default()
        },
        ..Default::default()
    };
    let job = job(vec![inv]);

    let model = build_document_model(&job, &[usd_table()], generated_on(), &BuildOptions::default());

    assert_eq!(model.lines[0].fob_fc, 675.0);
    assert_eq!(model.lines[1].fob_fc, 225.0);
    assert_eq!(model.invoices[0].fob_value_fc, 900.0);
}

#[test]
fn test_lines_follow_serial_order_within_invoice() {
    let job = job(vec![invoice(
        "INV-1",
        "USD",
        vec![line("3", 10.0), line("1", 10.0), line("2", 10.0)],
    )]);

    let model = build_document_model(&job, &[usd_table()], generated_on(), &BuildOptions::default());

    let items: Vec<&str> = model.lines.iter().map(|l| l.item_no.as_str()).collect();
    assert_eq!(items, vec!["1", "2", "3"]);
}

#[test]
fn test_rodtep_claim_adds_declaration_and_label() {
    let mut item = line("1", 1000.0);
    item.rodtep_info = RodtepInfo {
        claim: true,
        rate_percent: Numeric::Value(1.0),
        ..Default::default()
    };
    let job = job(vec![invoice("INV-1", "USD", vec![item, line("2", 1000.0)])]);

    let model = build_document_model(&job, &[usd_table()], generated_on(), &BuildOptions::default());

    assert_eq!(model.schemes.rodtep_rows.len(), 1);
    assert_eq!(model.declarations.len(), 1);
    assert_eq!(model.declarations[0].code, "RD001");
    assert_eq!(model.totals.combined_label, "DBK + RODTEP (INR)");
}

#[test]
fn test_weights_fall_back_to_containers_and_quantities() {
    let mut job = job(vec![invoice("INV-1", "USD", vec![line("1", 10.0), line("2", 10.0)])]);
    job.containers = vec![
        Container {
            container_no: "MSCU1234567".into(),
            container_type: "20GP".into(),
            gross_weight: Numeric::Value(1200.25),
            ..Default::default()
        },
        Container {
            container_no: "MSCU7654321".into(),
            container_type: "40HC".into(),
            gross_weight: Numeric::Value(800.0),
            ..Default::default()
        },
    ];

    let model = build_document_model(&job, &[usd_table()], generated_on(), &BuildOptions::default());

    assert_eq!(model.shipment.gross_weight, 2000.25);
    assert_eq!(model.shipment.net_weight, 200.0);
    assert_eq!(model.containers[0].size, "20");
    assert_eq!(model.containers[1].kind, "HC");
}

#[test]
fn test_malformed_line_amount_degrades_to_zero() {
    let mut broken = line("2", 0.0);
    broken.amount = Numeric::Malformed("TBD".into());
    let mut inv = invoice("INV-1", "USD", vec![line("1", 100.0), broken]);
    inv.product_value = Numeric::Value(100.0);
    let job = job(vec![inv]);

    let model = build_document_model(&job, &[usd_table()], generated_on(), &BuildOptions::default());

    assert_eq!(model.lines[1].fob_fc, 0.0);
    assert!(model.diagnostics.iter().any(|d| matches!(
        d,
        Degradation::MalformedLineItem { item, field, .. } if item == "2" && field == "amount"
    )));
}

#[test]
fn test_build_is_byte_identical_across_runs() {
    let mut item = line("1", 6690.82);
    item.drawback_details = vec![DrawbackDetail {
        dbk_sr_no: "610902".into(),
        dbk_rate: Numeric::Value(1.2),
        ..Default::default()
    }];
    let job = job(vec![
        invoice("INV-1", "USD", vec![item]),
        invoice("INV-2", "GBP", vec![line("1", 300.0)]),
    ]);

    let first = build_document_model(&job, &[usd_table()], generated_on(), &BuildOptions::default());
    let second = build_document_model(&job, &[usd_table()], generated_on(), &BuildOptions::default());

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}
