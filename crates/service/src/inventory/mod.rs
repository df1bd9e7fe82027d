//! Bike inventory: listing, intake, edits and cascade delete.

pub mod domain;
pub mod service;

pub use service::InventoryService;
