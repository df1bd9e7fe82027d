//! Staff accounts: identity account plus profile document, kept in step.

pub mod domain;
pub mod service;

pub use service::UserService;
