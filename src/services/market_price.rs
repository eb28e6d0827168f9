//! Market price lookup.

use std::sync::Arc;

use super::crop_recommendation::round2;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{MarketQuote, MarketRequest, DEFAULT_MARKET_PRICE};
use crate::domain::ports::LookupTable;

pub struct MarketPriceService {
    prices: Arc<dyn LookupTable<f64>>,
}

impl MarketPriceService {
    pub fn new(prices: Arc<dyn LookupTable<f64>>) -> Self {
        Self { prices }
    }

    pub fn quote(&self, request: &MarketRequest) -> DomainResult<MarketQuote> {
        let crop = request.crop.trim();
        if crop.is_empty() {
            return Err(DomainError::ValidationFailed("crop must not be empty".to_string()));
        }

        let price = self.prices.lookup_or_default(crop).unwrap_or(DEFAULT_MARKET_PRICE);
        Ok(MarketQuote {
            crop: request.crop.clone(),
            market_price: round2(price),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tables::market_prices;

    fn service() -> MarketPriceService {
        MarketPriceService::new(Arc::new(market_prices()))
    }

    #[test]
    fn test_known_and_unknown_crops() {
        let quote = service().quote(&MarketRequest { crop: "Apple".to_string() }).unwrap();
        assert!((quote.market_price - 150.0).abs() < f64::EPSILON);

        let quote = service().quote(&MarketRequest { crop: "Quinoa".to_string() }).unwrap();
        assert_eq!(quote.crop, "Quinoa");
        assert!((quote.market_price - DEFAULT_MARKET_PRICE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_crop_rejected() {
        let err = service().quote(&MarketRequest { crop: "  ".to_string() }).unwrap_err();
        assert!(err.is_client_error());
    }
}
