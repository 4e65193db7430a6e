//! Document Model Builder
//!
//! Runs rate resolution, charge allocation, valuation and scheme aggregation
//! over a fetched job and folds the results together with the pass-through
//! job fields. Every defaulting decision for the printed document is made
//! here. No I/O and no clock: the generation date is an argument.

use chrono::NaiveDate;
use export_types::{
    Charge, ExchangeRateTable, Invoice, LineItem, Numeric, ShipmentJob, SupportingDocument,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, instrument};

use crate::allocation::allocate_charges;
use crate::error::{Degradation, Diagnostics};
use crate::format::{display_date, join_present, parse_date, print_date};
use crate::model::*;
use crate::rates::{normalize_code, RateContext, RateResolver};
use crate::schemes::{aggregate, ValuedLine};
use crate::valuation::{invoice_to_base_rate, valuate_line, InvoiceRate};

lazy_static! {
    /// `20GP`, `40'HC`, `45 G1`
    static ref CONTAINER_TYPE_PATTERN: Regex =
        Regex::new(r"^\s*(\d{2})\s*'?\s*([A-Za-z0-9]*)\s*$").unwrap();
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub base_currency: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            base_currency: "INR".to_string(),
        }
    }
}

#[instrument(skip(job, rate_tables, options), fields(job_no = %job.job_no))]
pub fn build_document_model(
    job: &ShipmentJob,
    rate_tables: &[ExchangeRateTable],
    generated_on: NaiveDate,
    options: &BuildOptions,
) -> DocumentModel {
    let resolver = RateResolver::from_tables(&options.base_currency, rate_tables);
    let reference = reference_date(job);
    let rates = RateContext::new(&resolver, reference);
    let mut diagnostics = Diagnostics::new();

    let mut valued = Vec::with_capacity(job.line_item_count());
    let mut lines = Vec::with_capacity(job.line_item_count());
    let mut invoices = Vec::with_capacity(job.invoices.len());

    for invoice in &job.invoices {
        let rate = invoice_to_base_rate(invoice, &job.exchange_rate, &rates, &mut diagnostics);
        let allocation = allocate_charges(invoice, rate.value, &rates, &mut diagnostics);
        debug!(
            invoice = %invoice.invoice_number,
            rate = rate.value,
            shared_charges = allocation.shared_charges(),
            "Allocated invoice charges"
        );

        let mut fob_fc = 0.0;
        let mut fob_inr = 0.0;
        for index in document_order(&invoice.products) {
            let line = &invoice.products[index];
            check_line(invoice, line, &mut diagnostics);
            let valuation = valuate_line(line, &allocation.lines[index], rate.value);
            fob_fc += valuation.fob_fc;
            fob_inr += valuation.fob_inr;
            lines.push(line_row(invoice, line, valuation.fob_fc, valuation.fob_inr));
            valued.push(ValuedLine {
                invoice_no: invoice.invoice_number.trim(),
                line,
                valuation,
            });
        }

        let fob = declared_fob(job, invoice, rate.value, &rates).unwrap_or_else(|| {
            (fob_fc, normalize_code(&invoice.currency), fob_inr)
        });
        let summary = invoice_summary(job, invoice, rate, fob);
        invoices.push(summary);
    }

    let schemes = aggregate(&valued, &mut diagnostics);
    let totals = DocumentTotals {
        fob_inr: lines.iter().map(|l| l.fob_inr).sum(),
        igst_taxable: schemes.totals.igst_taxable,
        igst: schemes.totals.igst,
        comp_cess: schemes.totals.comp_cess,
        pmv: schemes.totals.pmv,
        drawback: schemes.totals.drawback,
        rodtep: schemes.totals.rodtep,
        rosctl: schemes.totals.rosctl,
        combined: schemes.totals.combined,
        combined_label: schemes.totals.combined_label.clone(),
    };

    let declarations = schemes
        .rodtep_rows
        .iter()
        .map(|row| DeclarationRow {
            declaration_type: "DEC".to_string(),
            code: "RD001".to_string(),
            invoice_no: row.invoice_no.clone(),
            item_no: row.item_no.clone(),
        })
        .collect();

    let printed_on = print_date(generated_on);
    let model = DocumentModel {
        generated_on: printed_on.clone(),
        reference_date: reference.map(print_date),
        base_currency: resolver.base_currency().to_string(),
        header: HeaderFields {
            custom_station: job.custom_house.trim().to_string(),
            printed_on,
            aeo_registration_no: job.other_info.aeo_code.trim().to_string(),
            aeo_role: job.other_info.aeo_role.trim().to_string(),
        },
        shipment: shipment_fields(job),
        invoices,
        lines,
        totals,
        schemes,
        vessel: VesselFields {
            factory_stuffed: job.goods_stuffed_at.trim().eq_ignore_ascii_case("factory"),
            seal_type: job.stuffing_seal_type.trim().to_string(),
            sample_accompanied: job.sample_accompanied,
            vessel_name: job.vessel_name.trim().to_string(),
            voyage_no: job.voyage_no.trim().to_string(),
        },
        containers: job
            .containers
            .iter()
            .map(|c| {
                let (size, kind) = split_container_type(&c.container_type);
                ContainerRow {
                    container_no: c.container_no.trim().to_string(),
                    size,
                    kind,
                    seal_no: c.seal_no.trim().to_string(),
                    seal_type: c.seal_type.trim().to_string(),
                    seal_date: display_date(&c.seal_date),
                    seal_device_id: c.seal_device_id.trim().to_string(),
                    packages: c.pkgs_stuffed.or_zero(),
                    gross_weight: c.gross_weight.or_zero(),
                }
            })
            .collect(),
        declarations,
        supporting_document: job
            .e_sanchit_documents
            .first()
            .map(|doc| supporting_document(job, doc)),
        diagnostics: diagnostics.into_vec(),
    };

    info!(
        invoices = model.invoices.len(),
        lines = model.lines.len(),
        degradations = model.diagnostics.len(),
        "Built checklist document model"
    );
    model
}

/// Job date, else first invoice date, else shipping-bill date
pub fn reference_date(job: &ShipmentJob) -> Option<NaiveDate> {
    parse_date(&job.job_date)
        .or_else(|| {
            job.invoices
                .first()
                .and_then(|inv| parse_date(&inv.invoice_date))
        })
        .or_else(|| parse_date(&job.sb_date))
}

/// Line indices sorted by numeric serial; unnumbered lines keep stored order
/// after the numbered ones
pub fn document_order(products: &[LineItem]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..products.len()).collect();
    order.sort_by_key(|&i| {
        let key = products[i].serial_key();
        (key.is_none(), key)
    });
    order
}

/// Split `20GP` into (`20`, `GP`); unrecognised text is all type
pub fn split_container_type(raw: &str) -> (String, String) {
    match CONTAINER_TYPE_PATTERN.captures(raw) {
        Some(caps) => (
            caps.get(1).map_or("", |m| m.as_str()).to_string(),
            caps.get(2).map_or("", |m| m.as_str()).to_uppercase(),
        ),
        None => (String::new(), raw.trim().to_string()),
    }
}

fn check_line(invoice: &Invoice, line: &LineItem, diagnostics: &mut Diagnostics) {
    let fields = [
        ("amount", &line.amount, true),
        ("quantity", &line.quantity, false),
        ("unit_price", &line.unit_price, false),
        ("rodtep.rate_percent", &line.rodtep_info.rate_percent, false),
        ("rodtep.amount_inr", &line.rodtep_info.amount_inr, false),
    ];
    for (field, value, required) in fields {
        let raw = match value {
            Numeric::Malformed(raw) => raw.clone(),
            Numeric::Missing if required => String::new(),
            _ => continue,
        };
        diagnostics.record(Degradation::MalformedLineItem {
            invoice: invoice.invoice_number.trim().to_string(),
            item: line.serial_number.trim().to_string(),
            field: field.to_string(),
            raw,
        });
    }
}

fn line_row(invoice: &Invoice, line: &LineItem, fob_fc: f64, fob_inr: f64) -> LineRow {
    let igst = &line.igst_compensation_cess;
    LineRow {
        invoice_no: invoice.invoice_number.trim().to_string(),
        item_no: line.serial_number.trim().to_string(),
        currency: normalize_code(&invoice.currency),
        quantity: line.quantity.or_zero(),
        unit: line.qty_unit.trim().to_string(),
        ritc: line.ritc.trim().to_string(),
        exim_scheme: line.exim_code.trim().to_string(),
        nfei_category: line.nfei_category.trim().to_string(),
        reward_item: line.reward_item,
        description: line.description.trim().to_string(),
        unit_price: line.unit_price.or_zero(),
        price_unit: line.price_unit.trim().to_string(),
        per: line.per.trim().to_string(),
        amount: line.amount.or_zero(),
        fob_fc,
        fob_inr,
        igst_status: igst.igst_payment_status.trim().to_string(),
        pmv_per_unit: line.pmv_info.pmv_per_unit.or_zero(),
        total_pmv: line.pmv_info.total_pmv.or_zero(),
        igst_taxable: igst.taxable_value_inr.or_zero(),
        igst_amount: igst.igst_amount_inr.or_zero(),
        comp_cess: igst.compensation_cess_amount_inr.or_zero(),
        end_use: line.end_use.trim().to_string(),
        origin_district: line.origin_district.trim().to_string(),
        origin_state: line.origin_state.trim().to_string(),
        pta_fta: line.pta_fta_info.trim().to_string(),
        sqc_quantity: line.soc_quantity.or_zero(),
        sqc_unit: line.soc_unit.trim().to_string(),
    }
}

fn invoice_summary(
    job: &ShipmentJob,
    invoice: &Invoice,
    rate: InvoiceRate,
    (fob_value_fc, fob_currency, fob_value_inr): (f64, String, f64),
) -> InvoiceSummary {
    let charges = &invoice.freight_insurance_charges;
    let base = invoice.allocation_base().unwrap_or(0.0);
    let invoice_value = invoice.invoice_value.or_zero();

    let mut rows: Vec<ChargeRow> = [
        ("Insurance", &charges.insurance),
        ("Freight", &charges.freight),
        ("Discount", &charges.discount),
        ("Commission", &charges.commission),
        ("Other Deduction", &charges.other_deduction),
    ]
    .into_iter()
    .map(|(label, charge)| charge_row(label, charge, base))
    .collect();
    rows.push(ChargeRow {
        label: "Packing Charges".to_string(),
        rate: None,
        currency: String::new(),
        amount: invoice.packing_fob.value(),
    });

    InvoiceSummary {
        invoice_no: invoice.invoice_number.trim().to_string(),
        invoice_date: display_date(&invoice.invoice_date),
        nature_of_contract: invoice.terms_of_invoice.trim().to_string(),
        price_includes: invoice.price_includes.trim().to_string(),
        currency: normalize_code(&invoice.currency),
        invoice_value,
        invoice_value_inr: invoice_value * rate.value,
        fob_value_fc,
        fob_currency,
        fob_value_inr,
        exchange_rate: rate.value,
        rate_source: rate.source,
        contract_no: job.other_info.export_contract_no.trim().to_string(),
        contract_date: display_date(&job.other_info.export_contract_date),
        charges: rows,
    }
}

/// Supplied amount, else `rate% x base` when a rate is given
fn charge_row(label: &str, charge: &Charge, base: f64) -> ChargeRow {
    let rate = charge.rate.value().filter(|r| *r != 0.0);
    let amount = match (charge.amount.value(), rate) {
        (Some(amount), _) => Some(amount),
        (None, Some(rate)) => Some(base * rate / 100.0),
        (None, None) => None,
    };
    ChargeRow {
        label: label.to_string(),
        rate,
        currency: normalize_code(&charge.currency),
        amount,
    }
}

/// Exporter-declared invoice FOB as (amount, currency, INR amount)
fn declared_fob(
    job: &ShipmentJob,
    invoice: &Invoice,
    invoice_rate: f64,
    rates: &RateContext<'_>,
) -> Option<(f64, String, f64)> {
    let fob = invoice.freight_insurance_charges.fob_value.as_ref()?;
    let amount = fob.amount.positive()?;
    let currency = if fob.currency.trim().is_empty() {
        normalize_code(&invoice.currency)
    } else {
        normalize_code(&fob.currency)
    };
    let rate = if currency == normalize_code(&invoice.currency) {
        invoice_rate
    } else {
        rates
            .resolve(&currency)
            .or_else(|| job.exchange_rate.positive())
            .unwrap_or(1.0)
    };
    Some((amount, currency, amount * rate))
}

fn shipment_fields(job: &ShipmentJob) -> ShipmentFields {
    let exporter = &job.exporter;
    let consignee = job.primary_consignee().cloned().unwrap_or_default();
    let other = &job.other_info;

    let gross_weight = job
        .gross_weight_kg
        .positive()
        .unwrap_or_else(|| job.containers.iter().fold(0.0, |acc, c| acc + c.gross_weight.or_zero()));
    let gross_weight_unit = if job.gross_weight_kg.positive().is_some() {
        job.gross_weight_unit.trim().to_string()
    } else {
        String::new()
    };
    let net_weight = job.net_weight_kg.positive().unwrap_or_else(|| {
        job.invoices
            .iter()
            .flat_map(|inv| inv.products.iter())
            .fold(0.0, |acc, p| acc + p.quantity.or_zero())
    });
    let net_weight_unit = if job.net_weight_kg.positive().is_some() {
        job.net_weight_unit.trim().to_string()
    } else {
        String::new()
    };

    let rotation_no = if job.voyage_no.trim().is_empty() {
        String::new()
    } else {
        format!("{} dt {}", job.voyage_no.trim(), display_date(&job.sailing_date))
    };

    ShipmentFields {
        job_no: job.job_no.trim().to_string(),
        sb_no_date: join_present(&[job.sb_no.as_str(), display_date(&job.sb_date).as_str()], " / "),
        party_ref: job.exporter_ref_no.trim().to_string(),
        cha: job.cha.trim().to_string(),
        exporter: PartyBlock {
            name: exporter.name.trim().to_string(),
            lines: present_lines(&[
                exporter.address.clone(),
                labelled("GSTIN: ", &exporter.gstin),
                labelled("PAN No: ", &exporter.pan),
                labelled("Exporter Type: ", &exporter.exporter_type),
                labelled("Branch Ser #", &exporter.branch_code),
            ]),
        },
        consignee: PartyBlock {
            name: consignee.name.trim().to_string(),
            lines: present_lines(&[consignee.address.clone(), consignee.country.clone()]),
        },
        port_of_loading: job.port_of_loading.trim().to_string(),
        port_of_discharge: job.port_of_discharge.trim().to_string(),
        port_of_destination: job.final_destination.trim().to_string(),
        discharge_country: job.discharge_country.trim().to_string(),
        country_of_destination: first_present(&[job.destination_country.as_str(), job.discharge_country.as_str()]),
        master_bl_no: job.mbl_no.trim().to_string(),
        house_bl_no: job.hbl_no.trim().to_string(),
        rotation_no,
        state_of_origin: first_present(&[job.state_of_origin.as_str(), exporter.state.as_str()]),
        ad_code: job.ad_code.trim().to_string(),
        forex_bank_account: job.bank_account_number.trim().to_string(),
        rbi_waiver_no: job.rbi_waiver_no.trim().to_string(),
        dbk_bank_account: job.dbk_bank_account_number.trim().to_string(),
        nature_of_cargo: job.nature_of_cargo.trim().to_string(),
        total_packages: job.total_no_of_pkgs.trim().to_string(),
        no_of_containers: job.no_of_containers.trim().to_string(),
        loose_packets: job.loose_pkgs.trim().to_string(),
        gross_weight,
        gross_weight_unit,
        net_weight,
        net_weight_unit,
        nature_of_payment: other.nature_of_payment.trim().to_string(),
        period_of_payment: labelled_suffix(&other.payment_period, " days"),
        marks_and_nos: job.marks_nos.trim().to_string(),
        buyer: job
            .buyer
            .as_ref()
            .filter(|b| !b.name.trim().is_empty())
            .map(|b| present_lines(&[b.name.clone(), b.address_line1.clone(), b.country.clone()]).join("\n"))
            .unwrap_or_default(),
        aeo_code: other.aeo_code.trim().to_string(),
        aeo_country: other.aeo_country.trim().to_string(),
        aeo_role: other.aeo_role.trim().to_string(),
        third_party: job
            .third_party
            .as_ref()
            .filter(|t| !t.name.trim().is_empty())
            .map(|t| present_lines(&[t.name.clone(), t.address.clone(), t.country.clone()]).join("\n"))
            .unwrap_or_default(),
        eou_iec: job.ie_code_of_eou.trim().to_string(),
        branch_sno: first_present(&[job.branch_sr_no.as_str(), "0"]),
        factory_address: job.factory_address.trim().to_string(),
    }
}

fn supporting_document(job: &ShipmentJob, doc: &SupportingDocument) -> SupportingDocumentFields {
    let consignee = job.primary_consignee().cloned().unwrap_or_default();
    let issuing = &doc.issuing_party;
    let beneficiary = &doc.beneficiary_party;
    let file_type = doc
        .icegate_filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_string())
        .unwrap_or_default();

    SupportingDocumentFields {
        inv_item_sr_no: first_present(&[doc.inv_serial_no.as_str(), "1/0/1"]),
        irn: doc.irn.trim().to_string(),
        icegate_id: doc.icegate_id.trim().to_string(),
        document_type: doc.document_type.trim().to_string(),
        document_reference_no: doc.document_reference_no.trim().to_string(),
        document_name: doc.icegate_filename.trim().to_string(),
        file_type,
        date_of_issue: display_date(&doc.date_of_issue),
        expiry_date: display_date(&doc.expiry_date),
        uploaded_on: display_date(&doc.date_time_of_upload),
        place_of_issue: doc.place_of_issue.trim().to_string(),
        issuing_party: DocumentPartyFields {
            code: issuing.code.trim().to_string(),
            name: first_present(&[issuing.name.as_str(), job.exporter.name.as_str()]),
            address_line1: first_present(&[issuing.address_line1.as_str(), job.exporter.address.as_str()]),
            address_line2: issuing.address_line2.trim().to_string(),
            city: issuing.city.trim().to_string(),
            pin_code: issuing.pin_code.trim().to_string(),
        },
        beneficiary_party: DocumentPartyFields {
            code: beneficiary.code.trim().to_string(),
            name: first_present(&[beneficiary.name.as_str(), consignee.name.as_str()]),
            address_line1: first_present(&[beneficiary.address_line1.as_str(), consignee.address.as_str()]),
            address_line2: beneficiary.address_line2.trim().to_string(),
            city: beneficiary.city.trim().to_string(),
            pin_code: beneficiary.pin_code.trim().to_string(),
        },
    }
}

fn first_present(candidates: &[&str]) -> String {
    candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn labelled(prefix: &str, value: &str) -> String {
    if value.trim().is_empty() {
        String::new()
    } else {
        format!("{}{}", prefix, value.trim())
    }
}

fn labelled_suffix(value: &str, suffix: &str) -> String {
    if value.trim().is_empty() {
        String::new()
    } else {
        format!("{}{}", value.trim(), suffix)
    }
}

fn present_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
