//! Scheme Aggregator
//!
//! Flattens duty drawback, RODTEP and ROSCTL claims into per-row tables and
//! sums document totals. Unreadable figures count as zero; aggregation never
//! stops part way through a document.

use export_types::{DrawbackDetail, LineItem, Numeric};
use serde::Serialize;

use crate::error::{Degradation, Diagnostics};
use crate::valuation::LineValuation;

/// A valued line item with its owning invoice, in document order
#[derive(Debug, Clone, Copy)]
pub struct ValuedLine<'a> {
    pub invoice_no: &'a str,
    pub line: &'a LineItem,
    pub valuation: LineValuation,
}

impl ValuedLine<'_> {
    pub fn item_no(&self) -> &str {
        self.line.serial_number.trim()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawbackRow {
    pub invoice_no: String,
    pub item_no: String,
    pub dbk_sr_no: String,
    pub rate: f64,
    /// Always the parent line's quantity and unit
    pub quantity: f64,
    pub unit: String,
    pub cap: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RodtepRow {
    pub invoice_no: String,
    pub item_no: String,
    pub quantity: f64,
    pub unit: String,
    pub rate_percent: f64,
    pub cap_value: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosctlRow {
    pub invoice_no: String,
    pub item_no: String,
    pub tariff_item: String,
    pub category: String,
    pub sl_rate: f64,
    pub sl_cap: f64,
    pub ctl_rate: f64,
    pub ctl_cap: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemeTotals {
    pub drawback: f64,
    pub rodtep: f64,
    pub rosctl: f64,
    pub pmv: f64,
    pub igst_taxable: f64,
    pub igst: f64,
    pub comp_cess: f64,
    /// Drawback plus whichever incentive applies; conflicting ROSCTL is left out
    pub combined: f64,
    pub combined_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemeSummary {
    pub dbk_rows: Vec<DrawbackRow>,
    pub rodtep_rows: Vec<RodtepRow>,
    pub rosctl_rows: Vec<RosctlRow>,
    pub totals: SchemeTotals,
}

pub fn aggregate(lines: &[ValuedLine<'_>], diagnostics: &mut Diagnostics) -> SchemeSummary {
    let mut summary = SchemeSummary::default();
    let mut counted_rosctl = 0.0;

    for valued in lines {
        let line = valued.line;
        let fob_inr = valued.valuation.fob_inr;
        let quantity = line.quantity.or_zero();

        for detail in &line.drawback_details {
            check_detail(valued, detail, diagnostics);
            let row = drawback_row(valued, detail, fob_inr, quantity);
            summary.totals.drawback += row.amount;
            summary.dbk_rows.push(row);
        }

        let rodtep = if line.rodtep_info.claim {
            let row = rodtep_row(valued, fob_inr, quantity);
            let amount = row.amount;
            summary.rodtep_rows.push(row);
            amount
        } else {
            0.0
        };
        summary.totals.rodtep += rodtep;

        let mut line_rosctl = 0.0;
        for detail in line.drawback_details.iter().filter(|d| d.show_rosctl) {
            let row = rosctl_row(valued, detail);
            line_rosctl += row.amount;
            summary.rosctl_rows.push(row);
        }
        summary.totals.rosctl += line_rosctl;

        if rodtep > 0.0 && line_rosctl > 0.0 {
            diagnostics.record(Degradation::SchemeConflict {
                invoice: valued.invoice_no.to_string(),
                item: valued.item_no().to_string(),
                rodtep,
                rosctl: line_rosctl,
            });
        } else {
            counted_rosctl += line_rosctl;
        }

        let igst = &line.igst_compensation_cess;
        summary.totals.pmv += line.pmv_info.total_pmv.or_zero();
        summary.totals.igst_taxable += igst.taxable_value_inr.or_zero();
        summary.totals.igst += igst.igst_amount_inr.or_zero();
        summary.totals.comp_cess += igst.compensation_cess_amount_inr.or_zero();
    }

    let totals = &mut summary.totals;
    totals.combined = totals.drawback + totals.rodtep + counted_rosctl;
    totals.combined_label = combined_label(totals.rodtep > 0.0, counted_rosctl > 0.0).to_string();
    summary
}

pub fn combined_label(has_rodtep: bool, has_rosctl: bool) -> &'static str {
    match (has_rodtep, has_rosctl) {
        (true, true) => "DBK + RODTEP + ROSCTL (INR)",
        (true, false) => "DBK + RODTEP (INR)",
        (false, true) => "DBK + ROSCTL (INR)",
        (false, false) => "DBK (INR)",
    }
}

/// Stored amount whenever one was persisted (zero included), otherwise
/// `rate% x base`, capped at `cap x quantity` when a cap is set
///
/// Blank and unreadable stored amounts count as not populated.
pub fn claim_amount(stored: &Numeric, rate_percent: f64, base: f64, cap: f64, quantity: f64) -> f64 {
    if let Some(amount) = stored.value() {
        return amount;
    }
    let derived = rate_percent / 100.0 * base;
    if cap > 0.0 {
        derived.min(cap * quantity)
    } else {
        derived
    }
}

fn drawback_row(valued: &ValuedLine<'_>, detail: &DrawbackDetail, fob_inr: f64, quantity: f64) -> DrawbackRow {
    let rate = detail.dbk_rate.or_zero();
    let cap = detail.dbk_cap.or_zero();
    DrawbackRow {
        invoice_no: valued.invoice_no.to_string(),
        item_no: valued.item_no().to_string(),
        dbk_sr_no: detail.dbk_sr_no.trim().to_string(),
        rate,
        quantity,
        unit: valued.line.qty_unit.trim().to_string(),
        cap,
        amount: claim_amount(&detail.dbk_amount, rate, fob_inr, cap, quantity),
    }
}

fn rodtep_row(valued: &ValuedLine<'_>, fob_inr: f64, line_quantity: f64) -> RodtepRow {
    let info = &valued.line.rodtep_info;
    let quantity = info.quantity.positive().unwrap_or(line_quantity);
    let unit = if info.unit.trim().is_empty() {
        valued.line.qty_unit.trim()
    } else {
        info.unit.trim()
    };
    let rate_percent = info.rate_percent.or_zero();
    RodtepRow {
        invoice_no: valued.invoice_no.to_string(),
        item_no: valued.item_no().to_string(),
        quantity,
        unit: unit.to_string(),
        rate_percent,
        cap_value: info.cap_value.or_zero(),
        amount: claim_amount(
            &info.amount_inr,
            rate_percent,
            fob_inr,
            info.cap_value_per_units.or_zero(),
            quantity,
        ),
    }
}

fn rosctl_row(valued: &ValuedLine<'_>, detail: &DrawbackDetail) -> RosctlRow {
    let rosctl = &detail.rosctl;
    RosctlRow {
        invoice_no: valued.invoice_no.to_string(),
        item_no: valued.item_no().to_string(),
        tariff_item: detail.dbk_sr_no.trim().to_string(),
        category: rosctl.category.trim().to_string(),
        sl_rate: rosctl.sl_rate.or_zero(),
        sl_cap: rosctl.sl_cap.or_zero(),
        ctl_rate: rosctl.ctl_rate.or_zero(),
        ctl_cap: rosctl.ctl_cap.or_zero(),
        amount: rosctl.amount_inr.or_zero(),
    }
}

fn check_detail(valued: &ValuedLine<'_>, detail: &DrawbackDetail, diagnostics: &mut Diagnostics) {
    let fields = [
        ("dbk_rate", &detail.dbk_rate),
        ("dbk_cap", &detail.dbk_cap),
        ("dbk_amount", &detail.dbk_amount),
        ("rosctl.amount_inr", &detail.rosctl.amount_inr),
    ];
    for (field, value) in fields {
        if let Numeric::Malformed(raw) = value {
            diagnostics.record(Degradation::MalformedLineItem {
                invoice: valued.invoice_no.to_string(),
                item: valued.item_no().to_string(),
                field: format!("drawback {} {}", detail.dbk_sr_no.trim(), field),
                raw: raw.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use export_types::{RodtepInfo, RosctlInfo};

    fn detail(sr: &str, rate: f64) -> DrawbackDetail {
        DrawbackDetail {
            dbk_sr_no: sr.into(),
            dbk_rate: Numeric::Value(rate),
            ..Default::default()
        }
    }

    fn line_with(details: Vec<DrawbackDetail>) -> LineItem {
        LineItem {
            serial_number: "1".into(),
            quantity: Numeric::Value(100.0),
            qty_unit: "PCS".into(),
            drawback_details: details,
            ..Default::default()
        }
    }

    fn valued(line: &LineItem, fob_inr: f64) -> ValuedLine<'_> {
        ValuedLine {
            invoice_no: "INV-1",
            line,
            valuation: LineValuation {
                fob_fc: fob_inr,
                fob_inr,
            },
        }
    }

    #[test]
    fn test_stored_drawback_amount_is_trusted() {
        let mut stored = detail("610902", 1.2);
        stored.dbk_amount = Numeric::Value(99.0);
        let line = line_with(vec![stored]);
        let mut diagnostics = Diagnostics::new();

        let summary = aggregate(&[valued(&line, 10_000.0)], &mut diagnostics);

        assert_eq!(summary.dbk_rows[0].amount, 99.0);
        assert_eq!(summary.totals.combined_label, "DBK (INR)");
    }

    #[test]
    fn test_stored_zero_amount_is_not_rederived() {
        let mut stored = detail("610902", 1.2);
        stored.dbk_amount = Numeric::Value(0.0);
        let line = line_with(vec![stored, detail("610999", 2.0)]);
        let mut diagnostics = Diagnostics::new();

        let summary = aggregate(&[valued(&line, 10_000.0)], &mut diagnostics);

        assert_eq!(summary.dbk_rows[0].amount, 0.0);
        assert_eq!(summary.dbk_rows[1].amount, 200.0);
        assert_eq!(summary.totals.drawback, 200.0);
    }

    #[test]
    fn test_drawback_cap_limits_derived_amount() {
        let mut capped = detail("610902", 2.0);
        capped.dbk_cap = Numeric::Value(1.5);
        let line = line_with(vec![capped]);
        let mut diagnostics = Diagnostics::new();

        // 2% of 10000 = 200, cap 1.5 x 100 PCS = 150
        let summary = aggregate(&[valued(&line, 10_000.0)], &mut diagnostics);
        assert_eq!(summary.dbk_rows[0].amount, 150.0);
        assert_eq!(summary.dbk_rows[0].quantity, 100.0);
        assert_eq!(summary.dbk_rows[0].unit, "PCS");
    }

    #[test]
    fn test_drawback_quantity_mirrors_parent_line() {
        let mut stale = detail("610902", 1.0);
        stale.quantity = Numeric::Value(5.0);
        stale.unit = "KGS".into();
        let line = line_with(vec![stale]);
        let mut diagnostics = Diagnostics::new();

        let summary = aggregate(&[valued(&line, 1000.0)], &mut diagnostics);
        assert_eq!(summary.dbk_rows[0].quantity, 100.0);
        assert_eq!(summary.dbk_rows[0].unit, "PCS");
    }

    #[test]
    fn test_rodtep_only_for_claiming_lines() {
        let mut claiming = line_with(vec![]);
        claiming.rodtep_info = RodtepInfo {
            claim: true,
            rate_percent: Numeric::Value(0.9),
            ..Default::default()
        };
        let silent = LineItem {
            serial_number: "2".into(),
            rodtep_info: RodtepInfo {
                claim: false,
                rate_percent: Numeric::Value(0.9),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut diagnostics = Diagnostics::new();

        let summary = aggregate(
            &[valued(&claiming, 10_000.0), valued(&silent, 10_000.0)],
            &mut diagnostics,
        );

        assert_eq!(summary.rodtep_rows.len(), 1);
        assert!((summary.totals.rodtep - 90.0).abs() < 1e-9);
        assert_eq!(summary.totals.combined_label, "DBK + RODTEP (INR)");
    }

    #[test]
    fn test_rosctl_requires_opt_in() {
        let mut shown = detail("610902", 1.0);
        shown.show_rosctl = true;
        shown.rosctl = RosctlInfo {
            category: "A".into(),
            amount_inr: Numeric::Value(40.0),
            ..Default::default()
        };
        let mut hidden = detail("610999", 1.0);
        hidden.rosctl.amount_inr = Numeric::Value(70.0);
        let line = line_with(vec![shown, hidden]);
        let mut diagnostics = Diagnostics::new();

        let summary = aggregate(&[valued(&line, 1000.0)], &mut diagnostics);

        assert_eq!(summary.rosctl_rows.len(), 1);
        assert_eq!(summary.totals.rosctl, 40.0);
        assert_eq!(summary.totals.combined, 20.0 + 40.0);
        assert_eq!(summary.totals.combined_label, "DBK + ROSCTL (INR)");
    }

    #[test]
    fn test_conflicting_line_is_reported_and_not_double_counted() {
        let mut shown = detail("610902", 0.0);
        shown.show_rosctl = true;
        shown.rosctl.amount_inr = Numeric::Value(40.0);
        let mut line = line_with(vec![shown]);
        line.rodtep_info = RodtepInfo {
            claim: true,
            amount_inr: Numeric::Value(25.0),
            ..Default::default()
        };
        let mut diagnostics = Diagnostics::new();

        let summary = aggregate(&[valued(&line, 1000.0)], &mut diagnostics);

        assert_eq!(summary.totals.combined, 25.0);
        assert_eq!(summary.totals.combined_label, "DBK + RODTEP (INR)");
        assert!(diagnostics.items().iter().any(|d| d.is_scheme_conflict()));
    }

    #[test]
    fn test_malformed_rate_is_zero_and_reported() {
        let broken = DrawbackDetail {
            dbk_sr_no: "610902".into(),
            dbk_rate: Numeric::Malformed("1.2%%".into()),
            ..Default::default()
        };
        let line = line_with(vec![broken, detail("610999", 1.0)]);
        let mut diagnostics = Diagnostics::new();

        let summary = aggregate(&[valued(&line, 1000.0)], &mut diagnostics);

        assert_eq!(summary.dbk_rows.len(), 2);
        assert_eq!(summary.dbk_rows[0].amount, 0.0);
        assert_eq!(summary.totals.drawback, 10.0);
        assert_eq!(diagnostics.items().len(), 1);
    }
}
