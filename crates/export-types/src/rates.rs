//! Customs exchange-rate notifications

use serde::{Deserialize, Serialize};

use crate::lenient::Numeric;

/// One notified rate table, effective from a single date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeRateTable {
    pub notification_number: String,
    /// `YYYY-MM-DD` or `DD-MM-YYYY`
    pub effective_date: String,
    pub exchange_rates: Vec<CurrencyRate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyRate {
    pub currency_code: String,
    pub currency_name: String,
    /// Number of foreign units the rates are quoted for (1 or 100)
    pub unit: Numeric,
    pub import_rate: Numeric,
    pub export_rate: Numeric,
}

impl Default for CurrencyRate {
    fn default() -> Self {
        Self {
            currency_code: String::new(),
            currency_name: String::new(),
            unit: Numeric::Value(1.0),
            import_rate: Numeric::Missing,
            export_rate: Numeric::Missing,
        }
    }
}

impl CurrencyRate {
    /// Export rate for a single foreign unit
    pub fn export_rate_per_unit(&self) -> Option<f64> {
        let rate = self.export_rate.positive()?;
        let unit = self.unit.positive().unwrap_or(1.0);
        Some(rate / unit)
    }
}
