//! Export job record types
//!
//! The denormalised job record supplied by the job-tracking backend, plus the
//! customs exchange-rate tables looked up by date. These are inputs only; the
//! checklist engine never mutates them.

pub mod invoice;
pub mod job;
pub mod lenient;
pub mod rates;

pub use invoice::{
    Charge, DrawbackDetail, FreightInsuranceCharges, IgstInfo, Invoice, LineItem, PmvInfo,
    RodtepInfo, RosctlInfo,
};
pub use job::{
    Buyer, Consignee, Container, DocumentParty, Exporter, OtherInfo, ShipmentJob,
    SupportingDocument, ThirdParty,
};
pub use lenient::Numeric;
pub use rates::{CurrencyRate, ExchangeRateTable};
