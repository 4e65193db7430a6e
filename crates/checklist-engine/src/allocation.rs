//! Charge Allocator
//!
//! Freight and insurance are quoted once per invoice. Each line item carries
//! a share proportional to its amount over the invoice's product value (or
//! invoice value when no product value was declared).

use export_types::{Charge, Invoice, Numeric};
use serde::Serialize;

use crate::error::{Degradation, Diagnostics};
use crate::rates::{normalize_code, RateContext};

/// Per-line share of the invoice's shared charges, in invoice currency
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineDeduction {
    /// Line amount over the allocation base; zero when there is no base
    pub ratio: f64,
    pub deduction: f64,
}

/// Converted shared charges and one deduction per line, in stored line order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeAllocation {
    pub freight: f64,
    pub insurance: f64,
    pub lines: Vec<LineDeduction>,
}

impl ChargeAllocation {
    pub fn shared_charges(&self) -> f64 {
        self.freight + self.insurance
    }
}

pub fn allocate_charges(
    invoice: &Invoice,
    invoice_to_base: f64,
    rates: &RateContext<'_>,
    diagnostics: &mut Diagnostics,
) -> ChargeAllocation {
    let charges = &invoice.freight_insurance_charges;
    let freight = convert_charge(
        &charges.freight,
        "freight",
        invoice,
        invoice_to_base,
        rates,
        diagnostics,
    );
    let insurance = convert_charge(
        &charges.insurance,
        "insurance",
        invoice,
        invoice_to_base,
        rates,
        diagnostics,
    );
    let shared = freight + insurance;
    let base = invoice.allocation_base();

    let lines = invoice
        .products
        .iter()
        .map(|line| {
            let ratio = match base {
                Some(base) => line.amount.or_zero() / base,
                None => 0.0,
            };
            LineDeduction {
                ratio,
                deduction: ratio * shared,
            }
        })
        .collect();

    ChargeAllocation {
        freight,
        insurance,
        lines,
    }
}

/// Express a charge in the invoice's currency
///
/// A charge in another currency is pivoted through the base currency using
/// the charge's own rate, else the rate table. Without any rate the amount
/// is taken as already being in invoice currency.
pub fn convert_charge(
    charge: &Charge,
    label: &str,
    invoice: &Invoice,
    invoice_to_base: f64,
    rates: &RateContext<'_>,
    diagnostics: &mut Diagnostics,
) -> f64 {
    report_malformed(&charge.amount, label, invoice, diagnostics);

    let amount = charge.amount.or_zero();
    if amount == 0.0 {
        return 0.0;
    }

    let code = normalize_code(&charge.currency);
    if code.is_empty() || code == normalize_code(&invoice.currency) {
        return amount;
    }

    let charge_to_base = charge
        .exchange_rate
        .positive()
        .or_else(|| rates.resolve(&code));

    match charge_to_base {
        Some(rate) if invoice_to_base > 0.0 => amount * rate / invoice_to_base,
        _ => {
            diagnostics.record(Degradation::MissingRate {
                currency: code,
                date: rates.date_label(),
                context: format!("{} on invoice {}", label, invoice.invoice_number),
                used: 1.0,
            });
            amount
        }
    }
}

fn report_malformed(value: &Numeric, label: &str, invoice: &Invoice, diagnostics: &mut Diagnostics) {
    if let Numeric::Malformed(raw) = value {
        diagnostics.record(Degradation::MalformedLineItem {
            invoice: invoice.invoice_number.clone(),
            item: "charges".to_string(),
            field: format!("{}.amount", label),
            raw: raw.clone(),
        });
    }
}
