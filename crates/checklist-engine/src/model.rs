//! Render-ready checklist data
//!
//! Built once per generation request. Text fields are final (defaults
//! applied, dates formatted); amounts are kept at full precision and rounded
//! only when printed.

use serde::Serialize;

use crate::error::Degradation;
use crate::schemes::SchemeSummary;
use crate::valuation::RateSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentModel {
    /// `DD Mon YYYY`
    pub generated_on: String,
    /// Date the rate table was consulted for, when one could be determined
    pub reference_date: Option<String>,
    pub base_currency: String,
    pub header: HeaderFields,
    pub shipment: ShipmentFields,
    pub invoices: Vec<InvoiceSummary>,
    /// Every line item in document order
    pub lines: Vec<LineRow>,
    pub schemes: SchemeSummary,
    pub totals: DocumentTotals,
    pub vessel: VesselFields,
    pub containers: Vec<ContainerRow>,
    pub declarations: Vec<DeclarationRow>,
    pub supporting_document: Option<SupportingDocumentFields>,
    pub diagnostics: Vec<Degradation>,
}

impl DocumentModel {
    pub fn has_scheme_conflict(&self) -> bool {
        self.diagnostics.iter().any(Degradation::is_scheme_conflict)
    }

    /// Line FOB in invoice currency, totalled per currency in order of first use
    pub fn fob_fc_by_currency(&self) -> Vec<(String, f64)> {
        let mut totals: Vec<(String, f64)> = Vec::new();
        for line in &self.lines {
            match totals.iter_mut().find(|(code, _)| *code == line.currency) {
                Some((_, total)) => *total += line.fob_fc,
                None => totals.push((line.currency.clone(), line.fob_fc)),
            }
        }
        totals
    }
}

/// Values repeated in the running page header
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderFields {
    pub custom_station: String,
    pub printed_on: String,
    pub aeo_registration_no: String,
    pub aeo_role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartyBlock {
    pub name: String,
    /// Address and identification lines, blanks removed
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShipmentFields {
    pub job_no: String,
    pub sb_no_date: String,
    pub party_ref: String,
    pub cha: String,
    pub exporter: PartyBlock,
    pub consignee: PartyBlock,

    pub port_of_loading: String,
    pub port_of_discharge: String,
    pub port_of_destination: String,
    pub discharge_country: String,
    pub country_of_destination: String,
    pub master_bl_no: String,
    pub house_bl_no: String,
    pub rotation_no: String,
    pub state_of_origin: String,
    pub ad_code: String,
    pub forex_bank_account: String,
    pub rbi_waiver_no: String,
    pub dbk_bank_account: String,

    pub nature_of_cargo: String,
    pub total_packages: String,
    pub no_of_containers: String,
    pub loose_packets: String,
    pub gross_weight: f64,
    pub gross_weight_unit: String,
    pub net_weight: f64,
    pub net_weight_unit: String,

    pub nature_of_payment: String,
    pub period_of_payment: String,
    pub marks_and_nos: String,
    /// Name, address and country on separate lines
    pub buyer: String,
    pub aeo_code: String,
    pub aeo_country: String,
    pub aeo_role: String,
    pub third_party: String,
    pub eou_iec: String,
    pub branch_sno: String,
    pub factory_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceSummary {
    pub invoice_no: String,
    pub invoice_date: String,
    pub nature_of_contract: String,
    pub price_includes: String,
    pub currency: String,
    pub invoice_value: f64,
    pub invoice_value_inr: f64,
    /// Declared FOB when the exporter supplied one, else the sum of line FOB
    pub fob_value_fc: f64,
    pub fob_currency: String,
    pub fob_value_inr: f64,
    pub exchange_rate: f64,
    pub rate_source: RateSource,
    pub contract_no: String,
    pub contract_date: String,
    pub charges: Vec<ChargeRow>,
}

/// One row of the per-invoice Rate / Currency / Amount table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeRow {
    pub label: String,
    pub rate: Option<f64>,
    pub currency: String,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineRow {
    pub invoice_no: String,
    pub item_no: String,
    /// Invoice currency of `amount` and `fob_fc`
    pub currency: String,
    pub quantity: f64,
    pub unit: String,
    pub ritc: String,
    pub exim_scheme: String,
    pub nfei_category: String,
    pub reward_item: bool,
    pub description: String,
    pub unit_price: f64,
    pub price_unit: String,
    pub per: String,
    pub amount: f64,
    pub fob_fc: f64,
    pub fob_inr: f64,
    pub igst_status: String,
    pub pmv_per_unit: f64,
    pub total_pmv: f64,
    pub igst_taxable: f64,
    pub igst_amount: f64,
    pub comp_cess: f64,
    pub end_use: String,
    pub origin_district: String,
    pub origin_state: String,
    pub pta_fta: String,
    pub sqc_quantity: f64,
    pub sqc_unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentTotals {
    pub fob_inr: f64,
    pub igst_taxable: f64,
    pub igst: f64,
    pub comp_cess: f64,
    pub pmv: f64,
    pub drawback: f64,
    pub rodtep: f64,
    pub rosctl: f64,
    pub combined: f64,
    pub combined_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VesselFields {
    pub factory_stuffed: bool,
    pub seal_type: String,
    pub sample_accompanied: bool,
    pub vessel_name: String,
    pub voyage_no: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContainerRow {
    pub container_no: String,
    pub size: String,
    pub kind: String,
    pub seal_no: String,
    pub seal_type: String,
    pub seal_date: String,
    pub seal_device_id: String,
    pub packages: f64,
    pub gross_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclarationRow {
    pub declaration_type: String,
    pub code: String,
    pub invoice_no: String,
    pub item_no: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupportingDocumentFields {
    pub inv_item_sr_no: String,
    pub irn: String,
    pub icegate_id: String,
    pub document_type: String,
    pub document_reference_no: String,
    pub document_name: String,
    pub file_type: String,
    pub date_of_issue: String,
    pub expiry_date: String,
    pub uploaded_on: String,
    pub place_of_issue: String,
    pub issuing_party: DocumentPartyFields,
    pub beneficiary_party: DocumentPartyFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentPartyFields {
    pub code: String,
    pub name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub pin_code: String,
}
