//! Domain layer for the cropwise advisory backend
//!
//! Core models, errors and the port traits implemented by adapters.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult, FetchError, FetchResult};
