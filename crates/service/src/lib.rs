//! Service layer for the bike shop back office.
//! - Domain services (inventory, sales, users, analytics, uploads) depend only on
//!   repository traits, so handlers can be wired against Postgres or in-memory stores.
//! - The identity provider and blob store are likewise traits with bundled implementations.

pub mod errors;
pub mod repo;
pub mod inventory;
pub mod sales;
pub mod users;
pub mod analytics;
pub mod identity;
pub mod storage;
#[cfg(test)]
pub mod test_support;
