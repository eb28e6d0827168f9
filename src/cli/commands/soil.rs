//! `soil` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

use crate::adapters::http::AppState;
use crate::adapters::soilgrids::SoilGridsClient;
use crate::adapters::sqlite::initialize_from_config;
use crate::adapters::vegetation::FixedVegetationIndex;
use crate::cli::output::{list_table, output, CommandOutput};
use crate::domain::models::{AggregatedSoilProfile, Config, Coordinates, SatelliteRequest};
use crate::services::SoilDataAggregator;

#[derive(Args, Debug)]
pub struct SoilArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Bounding box half-width in degrees (bypasses the cache)
    #[arg(long)]
    pub buffer: Option<f64>,

    /// Query the coverage service even if a cached profile exists
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Debug, Serialize)]
pub struct SoilProfileOutput {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub profile: AggregatedSoilProfile,
}

impl CommandOutput for SoilProfileOutput {
    fn to_human(&self) -> String {
        let p = &self.profile;
        let mut table = list_table(&["metric", "value"]);
        table.add_row(vec!["NDVI".to_string(), format!("{:.2}", p.ndvi)]);
        table.add_row(vec!["Health".to_string(), p.health_status.to_string()]);
        table.add_row(vec!["pH".to_string(), format!("{:.2}", p.soil_ph)]);
        table.add_row(vec!["Nitrogen (mg/kg)".to_string(), format!("{:.2}", p.soil_nitrogen)]);
        table.add_row(vec!["Organic carbon (%)".to_string(), format!("{:.2}", p.soil_org_carbon)]);
        table.add_row(vec!["Water content (%)".to_string(), format!("{:.2}", p.soil_water_content)]);

        let source = if p.is_fallback { " (fallback)" } else { "" };
        format!(
            "Soil profile at ({}, {}){source}:\n{table}\n\n{}",
            self.latitude, self.longitude, p.recommendation_text
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: SoilArgs, config: Config, json: bool) -> Result<()> {
    let profile = if args.no_cache || args.buffer.is_some() {
        let buffer = args.buffer.unwrap_or(config.soil.buffer_degrees);
        let aggregator = SoilDataAggregator::new(
            Arc::new(SoilGridsClient::new(&config.soilgrids)?),
            Arc::new(FixedVegetationIndex::new(config.soil.placeholder_ndvi)),
        );
        aggregator.aggregate(args.lat, args.lon, buffer).await?
    } else {
        let pool = initialize_from_config(&config.database)
            .await
            .with_context(|| format!("Failed to open cache database at {}", config.database.path))?;
        let state = AppState::from_config(&config, pool)?;
        let request = SatelliteRequest {
            coordinates: Coordinates { lat: args.lat, lon: args.lon },
            date_range: None,
        };
        state.satellite_profile(&request).await?
    };

    output(
        &SoilProfileOutput {
            latitude: args.lat,
            longitude: args.lon,
            profile,
        },
        json,
    );
    Ok(())
}
