//! Market price domain model.

use serde::{Deserialize, Serialize};

/// Price used when a crop is missing from the price table.
pub const DEFAULT_MARKET_PRICE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRequest {
    pub crop: String,
}

/// Current price per kg for a crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    pub crop: String,
    pub market_price: f64,
}
