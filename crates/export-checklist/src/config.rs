//! TOML configuration for checklist generation
//!
//! Every section is optional; an empty file gives the printed form's
//! standard A4 layout, fonts and declaration texts.

use anyhow::Context;
use checklist_pdf::{FontSizes, LayoutMetrics, PageGeometry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistConfig {
    pub firm: FirmConfig,
    pub page: PageGeometry,
    pub fonts: FontSizes,
    pub layout: LayoutMetrics,
    pub schemes: SchemeConfig,
    pub declarations: DeclarationConfig,
    pub base_currency: BaseCurrency,
}

impl ChecklistConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }
}

/// Identity printed in the running header of every page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmConfig {
    pub name: String,
    pub document_title: String,
}

impl Default for FirmConfig {
    fn default() -> Self {
        Self {
            name: "SURAJ FORWARDERS & SHIPPING AGENCIES".to_string(),
            document_title: "Checklist for Shipping Bill".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeConfig {
    /// Refuse to generate when a line claims both RODTEP and ROSCTL
    pub reject_conflicts: bool,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            reject_conflicts: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclarationConfig {
    /// Printed under the declarations table for RD001 rows
    pub rodtep: String,
    /// Printed above the signature line on the last page
    #[serde(rename = "final")]
    pub final_declaration: String,
    pub signature_caption: String,
}

impl Default for DeclarationConfig {
    fn default() -> Self {
        Self {
            rodtep: RODTEP_DECLARATION.to_string(),
            final_declaration: FINAL_DECLARATION.to_string(),
            signature_caption: "Signature of Exporter/CHA with date".to_string(),
        }
    }
}

/// ISO code amounts are converted into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseCurrency(pub String);

impl Default for BaseCurrency {
    fn default() -> Self {
        Self("INR".to_string())
    }
}

impl BaseCurrency {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const RODTEP_DECLARATION: &str = "I/We, in regard to my/our claim under RoDTEP scheme made in this Shipping Bill or Bill of Export, hereby declare that:

1. I/ We undertake to abide by the provisions, including conditions, restrictions, exclusions and time-limits as provided under RoDTEP scheme, and relevant notifications, regulations, etc., as amended from time to time.

2. Any claim made in this shipping bill or bill of export is not with respect to any duties or taxes or levies which are exempted or remitted or credited under any other mechanism outside RoDTEP.

3. I/We undertake to preserve and make available relevant documents relating to the exported goods for the purposes of audit in the manner and for the time period prescribed in the Customs Audit Regulations, 2018.";

const FINAL_DECLARATION: &str = "1. I/We declare that the particulars given herein are true and are correct.

2. I/We undertake to abide by the provisions of Foreign Exchange Management Act, 1999, as amended from time to time, including realisation or repatriation of foreign exchange to or from India.";
