//! Export job record
//!
//! The job is the root aggregate: invoices, containers and supporting
//! documents have no lifecycle of their own outside it.

use serde::{Deserialize, Serialize};

use crate::invoice::Invoice;
use crate::lenient::{flag, Numeric};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipmentJob {
    pub job_no: String,
    pub job_date: String,
    pub sb_no: String,
    pub sb_date: String,
    pub custom_house: String,
    pub cha: String,
    pub exporter_ref_no: String,

    pub exporter: Exporter,
    pub consignees: Vec<Consignee>,

    // Route
    pub port_of_loading: String,
    pub port_of_discharge: String,
    pub final_destination: String,
    pub discharge_country: String,
    pub destination_country: String,
    pub mbl_no: String,
    pub hbl_no: String,
    pub voyage_no: String,
    pub sailing_date: String,
    pub vessel_name: String,

    // Banking
    pub ad_code: String,
    pub bank_account_number: String,
    pub dbk_bank_account_number: String,
    pub rbi_waiver_no: String,
    pub state_of_origin: String,

    // Cargo
    pub nature_of_cargo: String,
    pub total_no_of_pkgs: String,
    pub no_of_containers: String,
    pub loose_pkgs: String,
    pub gross_weight_kg: Numeric,
    pub gross_weight_unit: String,
    pub net_weight_kg: Numeric,
    pub net_weight_unit: String,
    pub marks_nos: String,

    /// Job-level invoice-to-INR rate used when the rate table has no entry
    pub exchange_rate: Numeric,

    // Stuffing
    pub goods_stuffed_at: String,
    pub stuffing_seal_type: String,
    #[serde(deserialize_with = "flag::deserialize")]
    pub sample_accompanied: bool,

    // EOU / Annex C1
    pub ie_code_of_eou: String,
    pub branch_sr_no: String,
    pub factory_address: String,

    pub other_info: OtherInfo,
    pub buyer: Option<Buyer>,
    pub third_party: Option<ThirdParty>,

    pub invoices: Vec<Invoice>,
    pub containers: Vec<Container>,
    pub e_sanchit_documents: Vec<SupportingDocument>,
}

impl ShipmentJob {
    /// Total line items across all invoices
    pub fn line_item_count(&self) -> usize {
        self.invoices.iter().map(|inv| inv.products.len()).sum()
    }

    pub fn primary_consignee(&self) -> Option<&Consignee> {
        self.consignees.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exporter {
    pub name: String,
    pub address: String,
    pub gstin: String,
    pub pan: String,
    pub exporter_type: String,
    pub branch_code: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Consignee {
    pub name: String,
    pub address: String,
    pub country: String,
}

/// AEO registration and payment terms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherInfo {
    pub aeo_code: String,
    pub aeo_role: String,
    pub aeo_country: String,
    pub nature_of_payment: String,
    /// Payment period in days
    pub payment_period: String,
    pub export_contract_no: String,
    pub export_contract_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Buyer {
    pub name: String,
    pub address_line1: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThirdParty {
    pub name: String,
    pub address: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    pub container_no: String,
    /// Size and type run together, e.g. `20GP` or `40HC`
    pub container_type: String,
    pub seal_no: String,
    pub seal_date: String,
    pub seal_type: String,
    pub seal_device_id: String,
    pub rfid: String,
    pub pkgs_stuffed: Numeric,
    pub gross_weight: Numeric,
    pub tare_weight: Numeric,
}

/// e-Sanchit supporting document metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportingDocument {
    pub inv_serial_no: String,
    pub irn: String,
    pub icegate_id: String,
    pub document_type: String,
    pub document_reference_no: String,
    pub date_of_issue: String,
    pub expiry_date: String,
    pub date_time_of_upload: String,
    pub place_of_issue: String,
    pub icegate_filename: String,
    pub issuing_party: DocumentParty,
    pub beneficiary_party: DocumentParty,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentParty {
    pub code: String,
    pub name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub pin_code: String,
}
