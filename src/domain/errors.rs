//! Domain errors for the cropwise advisory backend.

use thiserror::Error;

use super::models::SoilProperty;

/// Domain-level errors that can occur in the advisory flows.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid coordinates: latitude {latitude}, longitude {longitude}, buffer {buffer}")]
    InvalidCoordinate { latitude: f64, longitude: f64, buffer: f64 },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("No economics data for crop: {0}")]
    UnknownCrop(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether the error was caused by the caller's input rather than the server.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidCoordinate { .. } | Self::ValidationFailed(_))
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

/// Failure to obtain a single soil property from the coverage service.
///
/// Every variant means the same thing to the aggregator: the property is
/// unavailable and the fallback profile applies.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error fetching {property}: {message}")]
    Network { property: SoilProperty, message: String },

    #[error("Coverage service returned HTTP {status} for {property}")]
    HttpStatus { property: SoilProperty, status: u16 },

    #[error("Invalid content type '{content_type}' for {property}: {snippet}")]
    InvalidContentType {
        property: SoilProperty,
        content_type: String,
        snippet: String,
    },

    #[error("Failed to decode raster for {property}: {message}")]
    Decode { property: SoilProperty, message: String },

    #[error("Raster for {property} contains no valid pixels")]
    EmptyRaster { property: SoilProperty },

    #[error("Fetching {property} timed out after {timeout_secs}s")]
    Timeout { property: SoilProperty, timeout_secs: u64 },
}

impl FetchError {
    /// The property whose fetch failed.
    pub const fn property(&self) -> SoilProperty {
        match self {
            Self::Network { property, .. }
            | Self::HttpStatus { property, .. }
            | Self::InvalidContentType { property, .. }
            | Self::Decode { property, .. }
            | Self::EmptyRaster { property }
            | Self::Timeout { property, .. } => *property,
        }
    }

    /// Short machine-readable label, used as a structured log field.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::HttpStatus { .. } => "http_status",
            Self::InvalidContentType { .. } => "invalid_content_type",
            Self::Decode { .. } => "decode",
            Self::EmptyRaster { .. } => "empty_raster",
            Self::Timeout { .. } => "timeout",
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        let err = DomainError::InvalidCoordinate {
            latitude: 95.0,
            longitude: 0.0,
            buffer: 0.01,
        };
        assert!(err.is_client_error());
        assert!(err.to_string().contains("latitude 95"));

        assert!(!DomainError::StorageError("disk full".to_string()).is_client_error());
    }

    #[test]
    fn test_fetch_error_property_and_kind() {
        let err = FetchError::Timeout {
            property: SoilProperty::Clay,
            timeout_secs: 60,
        };
        assert_eq!(err.property(), SoilProperty::Clay);
        assert_eq!(err.kind(), "timeout");
        assert!(err.to_string().contains("60s"));
    }
}
