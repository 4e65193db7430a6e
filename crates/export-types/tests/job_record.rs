use export_types::{Numeric, ShipmentJob};
use pretty_assertions::assert_eq;

const JOB_JSON: &str = r#"{
    "job_no": "SFSA/EXP/1024/25-26",
    "job_date": "2025-01-15",
    "custom_house": "INNSA1",
    "state_of_origin": "Maharashtra",
    "exporter": { "name": "Acme Textiles", "address": "Plot 4, MIDC, Pune" },
    "consignees": [{ "name": "Nordic Imports AB", "country": "SE" }],
    "gross_weight_kg": "1,250.5",
    "net_weight_kg": null,
    "sample_accompanied": "No",
    "other_info": { "aeo_code": "INAEO1234", "aeo_role": "Exporter", "payment_period": "90" },
    "invoices": [{
        "invoice_number": "INV-77",
        "currency": "USD",
        "invoice_value": 6690.82,
        "product_value": "6690.82",
        "freight_insurance_charges": {
            "freight": { "amount": "", "currency": "USD" },
            "insurance": { "rate": 0.5 }
        },
        "products": [{
            "serial_number": "1",
            "quantity": 1200,
            "qty_unit": "PCS",
            "amount": 6690.82,
            "rodtep_info": { "claim": "Yes", "rate_percent": "0.9" },
            "drawback_details": [
                { "dbk_sr_no": "610902", "dbk_rate": 1.2, "show_rosctl": false },
                { "dbk_sr_no": "610999", "dbk_rate": "n/a" }
            ]
        }]
    }],
    "containers": [{ "container_no": "MSCU1234567", "container_type": "20GP", "gross_weight": 1250.5 }]
}"#;

#[test]
fn test_job_record_deserializes_with_lenient_fields() {
    let job: ShipmentJob = serde_json::from_str(JOB_JSON).unwrap();

    assert_eq!(job.job_no, "SFSA/EXP/1024/25-26");
    assert_eq!(job.state_of_origin, "Maharashtra");
    assert_eq!(job.gross_weight_kg, Numeric::Value(1250.5));
    assert!(job.net_weight_kg.is_missing());
    assert!(!job.sample_accompanied);
    assert_eq!(job.primary_consignee().unwrap().name, "Nordic Imports AB");
    assert_eq!(job.line_item_count(), 1);

    let invoice = &job.invoices[0];
    assert_eq!(invoice.allocation_base(), Some(6690.82));
    assert!(invoice.freight_insurance_charges.freight.amount.is_missing());
    assert_eq!(
        invoice.freight_insurance_charges.insurance.rate,
        Numeric::Value(0.5)
    );

    let line = &invoice.products[0];
    assert!(line.rodtep_info.claim);
    assert_eq!(line.serial_key(), Some(1));
    assert_eq!(line.drawback_details.len(), 2);
    assert!(line.drawback_details[1].dbk_rate.is_malformed());
    assert_eq!(line.drawback_details[1].dbk_rate.or_zero(), 0.0);
}

#[test]
fn test_empty_object_is_an_empty_job() {
    let job: ShipmentJob = serde_json::from_str("{}").unwrap();
    assert_eq!(job, ShipmentJob::default());
    assert!(job.invoices.is_empty());
    assert!(job.buyer.is_none());
}

#[test]
fn test_allocation_base_falls_back_to_invoice_value() {
    let job: ShipmentJob = serde_json::from_str(
        r#"{"invoices": [{"invoice_value": "500", "product_value": 0}]}"#,
    )
    .unwrap();
    assert_eq!(job.invoices[0].allocation_base(), Some(500.0));

    let job: ShipmentJob = serde_json::from_str(r#"{"invoices": [{}]}"#).unwrap();
    assert_eq!(job.invoices[0].allocation_base(), None);
}
