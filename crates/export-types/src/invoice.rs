//! Invoices, shared charges and line items

use serde::{Deserialize, Serialize};

use crate::lenient::{flag, Numeric};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    pub invoice_number: String,
    pub invoice_date: String,
    pub currency: String,
    /// Nature of contract (FOB, CIF, ...)
    pub terms_of_invoice: String,
    pub price_includes: String,
    pub invoice_value: Numeric,
    /// Sum of line-item amounts before charges
    pub product_value: Numeric,
    pub packing_fob: Numeric,
    pub freight_insurance_charges: FreightInsuranceCharges,
    pub products: Vec<LineItem>,
}

impl Invoice {
    /// Denominator for pro-rata allocation: product value, else invoice value
    pub fn allocation_base(&self) -> Option<f64> {
        self.product_value
            .positive()
            .or_else(|| self.invoice_value.positive())
    }
}

/// Invoice-level charges shared across every line item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreightInsuranceCharges {
    pub freight: Charge,
    pub insurance: Charge,
    pub discount: Charge,
    pub commission: Charge,
    pub other_deduction: Charge,
    /// Declared FOB value of the whole invoice, when the exporter supplied one
    pub fob_value: Option<Charge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Charge {
    /// Percentage of invoice value, used for display when no amount is given
    pub rate: Numeric,
    pub amount: Numeric,
    pub currency: String,
    /// Charge-currency to INR rate captured on the invoice
    pub exchange_rate: Numeric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub serial_number: String,
    pub description: String,
    /// Tariff (HSN) classification
    pub ritc: String,
    pub quantity: Numeric,
    pub qty_unit: String,
    pub unit_price: Numeric,
    pub price_unit: String,
    pub per: String,
    /// Native amount in invoice currency
    pub amount: Numeric,

    pub exim_code: String,
    pub nfei_category: String,
    #[serde(deserialize_with = "flag::deserialize")]
    pub reward_item: bool,
    pub end_use: String,
    pub origin_district: String,
    pub origin_state: String,
    pub pta_fta_info: String,
    pub soc_quantity: Numeric,
    pub soc_unit: String,

    pub pmv_info: PmvInfo,
    pub igst_compensation_cess: IgstInfo,
    pub rodtep_info: RodtepInfo,
    pub drawback_details: Vec<DrawbackDetail>,
}

impl LineItem {
    /// Numeric ordering key for serial numbers like `"1"`, `"2"`, `"10"`
    pub fn serial_key(&self) -> Option<u32> {
        self.serial_number.trim().parse().ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PmvInfo {
    pub currency: String,
    pub pmv_per_unit: Numeric,
    pub total_pmv: Numeric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgstInfo {
    /// LUT, P (paid) or NA
    pub igst_payment_status: String,
    pub taxable_value_inr: Numeric,
    pub igst_rate: Numeric,
    pub igst_amount_inr: Numeric,
    pub compensation_cess_rate: Numeric,
    pub compensation_cess_amount_inr: Numeric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RodtepInfo {
    #[serde(deserialize_with = "flag::deserialize")]
    pub claim: bool,
    pub quantity: Numeric,
    pub unit: String,
    pub rate_percent: Numeric,
    pub cap_value: Numeric,
    pub cap_value_per_units: Numeric,
    pub amount_inr: Numeric,
}

/// One duty-drawback claim against a line item
///
/// Quantity and unit mirror the parent line item; the builder always prints
/// the parent's values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawbackDetail {
    /// Drawback schedule tariff serial
    pub dbk_sr_no: String,
    pub quantity: Numeric,
    pub unit: String,
    pub dbk_under: String,
    pub dbk_description: String,
    /// Percentage of FOB (INR)
    pub dbk_rate: Numeric,
    /// Per-unit cap in INR
    pub dbk_cap: Numeric,
    pub dbk_amount: Numeric,
    #[serde(deserialize_with = "flag::deserialize")]
    pub show_rosctl: bool,
    pub rosctl: RosctlInfo,
}

/// Rebate of State and Central Taxes and Levies claim on a drawback row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosctlInfo {
    pub category: String,
    pub sl_rate: Numeric,
    pub sl_cap: Numeric,
    pub ctl_rate: Numeric,
    pub ctl_cap: Numeric,
    pub amount_inr: Numeric,
}
