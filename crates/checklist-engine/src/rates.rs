//! Rate Resolver
//!
//! Exact-date lookup of customs export rates. There is no interpolation
//! between notification dates: a date without a table resolves to nothing
//! and the caller decides the fallback.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use export_types::ExchangeRateTable;
use tracing::{debug, warn};

use crate::format::parse_date;

#[derive(Debug, Clone)]
pub struct RateResolver {
    base_currency: String,
    tables: BTreeMap<NaiveDate, BTreeMap<String, f64>>,
}

impl RateResolver {
    pub fn new(base_currency: &str) -> Self {
        Self {
            base_currency: normalize_code(base_currency),
            tables: BTreeMap::new(),
        }
    }

    pub fn from_tables(base_currency: &str, tables: &[ExchangeRateTable]) -> Self {
        let mut resolver = Self::new(base_currency);
        for table in tables {
            resolver.add_table(table);
        }
        resolver
    }

    /// Index a rate table under its effective date
    ///
    /// Returns `false` when the effective date cannot be read; such a table
    /// can never match a lookup. Entries for a date already indexed replace
    /// the earlier ones currency by currency.
    pub fn add_table(&mut self, table: &ExchangeRateTable) -> bool {
        let Some(date) = parse_date(&table.effective_date) else {
            warn!(
                effective_date = %table.effective_date,
                "Skipping rate table with unreadable effective date"
            );
            return false;
        };

        let entry = self.tables.entry(date).or_default();
        for rate in &table.exchange_rates {
            let code = normalize_code(&rate.currency_code);
            if code.is_empty() {
                continue;
            }
            if let Some(per_unit) = rate.export_rate_per_unit() {
                entry.insert(code, per_unit);
            }
        }
        debug!(%date, currencies = entry.len(), "Indexed rate table");
        true
    }

    /// Export rate from `currency` to the base currency on `date`
    ///
    /// The base currency itself always resolves to 1.
    pub fn resolve(&self, date: NaiveDate, currency: &str) -> Option<f64> {
        let code = normalize_code(currency);
        if code.is_empty() {
            return None;
        }
        if code == self.base_currency {
            return Some(1.0);
        }
        self.tables.get(&date)?.get(&code).copied()
    }

    /// Resolve when the reference date itself may be unknown
    pub fn resolve_on(&self, date: Option<NaiveDate>, currency: &str) -> Option<f64> {
        if self.is_base(currency) {
            return Some(1.0);
        }
        self.resolve(date?, currency)
    }

    pub fn is_base(&self, currency: &str) -> bool {
        normalize_code(currency) == self.base_currency
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.tables.keys()
    }
}

/// Resolver plus the document's reference date
#[derive(Debug, Clone, Copy)]
pub struct RateContext<'a> {
    pub resolver: &'a RateResolver,
    pub date: Option<NaiveDate>,
}

impl<'a> RateContext<'a> {
    pub fn new(resolver: &'a RateResolver, date: Option<NaiveDate>) -> Self {
        Self { resolver, date }
    }

    pub fn resolve(&self, currency: &str) -> Option<f64> {
        self.resolver.resolve_on(self.date, currency)
    }

    /// Reference date as printed in diagnostics
    pub fn date_label(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown date".to_string())
    }
}

pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
