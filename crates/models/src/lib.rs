//! Persistent shapes of the bike shop: SeaORM entities plus the field
//! validators shared by every write path.

pub mod errors;
pub mod db;
pub mod validate;
pub mod bike;
pub mod sale;
pub mod user_profile;
pub mod identity_account;

pub use bike::BikeStatus;
pub use user_profile::Role;
