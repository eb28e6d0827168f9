//! SoilGrids coverage adapter.

pub mod client;
pub mod raster;

pub use client::SoilGridsClient;
pub use raster::{decode_raster_mean, mean_of_valid};
