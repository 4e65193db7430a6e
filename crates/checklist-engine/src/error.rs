use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// A recoverable problem found while building the document model
///
/// None of these abort a build. The affected figure falls back to a default
/// and the document stays internally consistent.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    #[error("no export rate for {currency} on {date} ({context}); using {used}")]
    MissingRate {
        currency: String,
        date: String,
        context: String,
        used: f64,
    },

    #[error("invoice {invoice} item {item}: {field} is unreadable ('{raw}'), treated as zero")]
    MalformedLineItem {
        invoice: String,
        item: String,
        field: String,
        raw: String,
    },

    #[error("invoice {invoice} item {item} claims both RODTEP ({rodtep:.2}) and ROSCTL ({rosctl:.2})")]
    SchemeConflict {
        invoice: String,
        item: String,
        rodtep: f64,
        rosctl: f64,
    },
}

impl Degradation {
    pub fn is_scheme_conflict(&self) -> bool {
        matches!(self, Degradation::SchemeConflict { .. })
    }
}

/// Ordered, de-duplicated collection of degradations for one build
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Degradation>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log and keep a degradation; repeats of an identical entry are dropped
    pub fn record(&mut self, degradation: Degradation) {
        if self.items.contains(&degradation) {
            return;
        }
        match &degradation {
            Degradation::MissingRate {
                currency, context, ..
            } => warn!(currency = %currency, context = %context, "{}", degradation),
            Degradation::MalformedLineItem {
                invoice,
                item,
                field,
                ..
            } => warn!(invoice = %invoice, item = %item, field = %field, "{}", degradation),
            Degradation::SchemeConflict { invoice, item, .. } => {
                warn!(invoice = %invoice, item = %item, "{}", degradation)
            }
        }
        self.items.push(degradation);
    }

    pub fn items(&self) -> &[Degradation] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Degradation> {
        self.items
    }
}
