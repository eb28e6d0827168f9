//! CLI command implementations.

pub mod cache;
pub mod fingerprint;
pub mod serve;
pub mod soil;
