//! Line-Item Valuator

use export_types::{Invoice, LineItem, Numeric};
use serde::Serialize;

use crate::allocation::LineDeduction;
use crate::error::{Degradation, Diagnostics};
use crate::rates::RateContext;

/// FOB value of one line, unrounded
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineValuation {
    pub fob_fc: f64,
    pub fob_inr: f64,
}

pub fn valuate_line(line: &LineItem, share: &LineDeduction, invoice_to_base: f64) -> LineValuation {
    let fob_fc = line.amount.or_zero() - share.deduction;
    LineValuation {
        fob_fc,
        fob_inr: fob_fc * invoice_to_base,
    }
}

/// Where an invoice's conversion multiplier came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    RateTable,
    JobDefault,
    Unity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InvoiceRate {
    pub value: f64,
    pub source: RateSource,
}

/// Invoice-currency to base-currency multiplier
///
/// Rate table on the reference date, then the job-level rate, then 1.
pub fn invoice_to_base_rate(
    invoice: &Invoice,
    job_default: &Numeric,
    rates: &RateContext<'_>,
    diagnostics: &mut Diagnostics,
) -> InvoiceRate {
    if let Some(value) = rates.resolve(&invoice.currency) {
        return InvoiceRate {
            value,
            source: RateSource::RateTable,
        };
    }

    let fallback = match job_default.positive() {
        Some(value) => InvoiceRate {
            value,
            source: RateSource::JobDefault,
        },
        None => InvoiceRate {
            value: 1.0,
            source: RateSource::Unity,
        },
    };

    diagnostics.record(Degradation::MissingRate {
        currency: invoice.currency.trim().to_ascii_uppercase(),
        date: rates.date_label(),
        context: format!("invoice {}", invoice.invoice_number),
        used: fallback.value,
    });
    fallback
}
