//! Identity: password accounts, bearer tokens and role claims.
//!
//! Handlers and services only see [`provider::IdentityProvider`]; the bundled
//! [`service::TokenIdentityProvider`] signs HS256 tokens over an [`repository::AccountRepository`].

pub mod domain;
pub mod errors;
pub mod provider;
pub mod repository;
pub mod service;
pub mod repo;

pub use provider::IdentityProvider;
pub use service::{TokenConfig, TokenIdentityProvider};
