//! Port trait definitions (Hexagonal Architecture)
//!
//! Contracts the services depend on, implemented by adapters:
//! - ResponseCache: durable response memoization
//! - RasterPropertySource: remote soil coverage fetches
//! - VegetationIndexSource: NDVI readings
//! - CropClassifier / DiseaseClassifier: opaque pretrained models
//! - LookupTable: static reference tables

pub mod crop_classifier;
pub mod disease_classifier;
pub mod lookup_table;
pub mod raster_source;
pub mod response_cache;
pub mod vegetation_index;

pub use crop_classifier::CropClassifier;
pub use disease_classifier::DiseaseClassifier;
pub use lookup_table::LookupTable;
pub use raster_source::RasterPropertySource;
pub use response_cache::ResponseCache;
pub use vegetation_index::VegetationIndexSource;
