//! Adapters implementing the domain ports.

pub mod classifiers;
pub mod http;
pub mod soilgrids;
pub mod sqlite;
pub mod tables;
pub mod vegetation;
