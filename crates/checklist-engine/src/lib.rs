//! Export checklist computation
//!
//! Pure functions over an already-fetched job record and rate tables:
//!
//! - [`rates`]: exact-date export rate lookup
//! - [`allocation`]: pro-rata split of invoice freight and insurance
//! - [`valuation`]: per-line FOB in invoice currency and INR
//! - [`schemes`]: drawback, RODTEP, ROSCTL and IGST roll-ups
//! - [`builder`]: folds everything into a [`DocumentModel`]
//!
//! Nothing here fails. Missing rates and unreadable figures degrade to
//! documented defaults and are listed in [`DocumentModel::diagnostics`].

pub mod allocation;
pub mod builder;
pub mod error;
pub mod format;
pub mod model;
pub mod rates;
pub mod schemes;
pub mod valuation;

pub use builder::{build_document_model, BuildOptions};
pub use error::{Degradation, Diagnostics};
pub use model::DocumentModel;
pub use rates::RateResolver;
