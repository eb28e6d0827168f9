//! Infrastructure layer module
//!
//! Configuration management and logging setup.

pub mod config;
pub mod logging;
