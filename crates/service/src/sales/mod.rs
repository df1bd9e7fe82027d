//! Sale recording, the sales ledger and the bulk reset.

pub mod domain;
pub mod service;

pub use service::SalesService;
