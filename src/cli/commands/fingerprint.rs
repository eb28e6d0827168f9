//! `fingerprint` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::services::fingerprint::{canonicalize, fingerprint};

#[derive(Args, Debug)]
pub struct FingerprintArgs {
    /// Endpoint name, e.g. market or satellite
    pub endpoint: String,

    /// Request payload as JSON
    pub payload: String,
}

#[derive(Debug, Serialize)]
pub struct FingerprintOutput {
    pub endpoint: String,
    pub fingerprint: String,
    pub canonical: String,
}

impl CommandOutput for FingerprintOutput {
    fn to_human(&self) -> String {
        format!("{}\n  endpoint:  {}\n  canonical: {}", self.fingerprint, self.endpoint, self.canonical)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn compute(args: &FingerprintArgs) -> Result<FingerprintOutput> {
    let payload: serde_json::Value =
        serde_json::from_str(&args.payload).context("Payload is not valid JSON")?;

    Ok(FingerprintOutput {
        endpoint: args.endpoint.clone(),
        fingerprint: fingerprint(&args.endpoint, &payload),
        canonical: canonicalize(&payload),
    })
}

pub fn execute(args: FingerprintArgs, json: bool) -> Result<()> {
    output(&compute(&args)?, json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_matches_service() {
        let args = FingerprintArgs {
            endpoint: "market".to_string(),
            payload: r#"{"crop": "Rice"}"#.to_string(),
        };
        let out = compute(&args).unwrap();
        assert_eq!(out.fingerprint, fingerprint("market", &serde_json::json!({"crop": "Rice"})));
        assert_eq!(out.canonical, r#"{"crop":"Rice"}"#);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let args = FingerprintArgs {
            endpoint: "market".to_string(),
            payload: "{crop".to_string(),
        };
        assert!(compute(&args).is_err());
    }
}
