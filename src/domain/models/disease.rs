//! Plant disease domain model.

use serde::{Deserialize, Serialize};

/// Raw classifier output for a leaf image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseasePrediction {
    pub label: String,
    pub confidence: f64,
}

/// Diagnosis returned to the caller, with treatment advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseDiagnosis {
    pub disease: String,
    pub confidence: f64,
    pub recommendation: String,
}

/// An uploaded leaf image.
#[derive(Debug, Clone)]
pub struct LeafImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl LeafImage {
    /// Extensions accepted for uploads.
    pub const ALLOWED_EXTENSIONS: [&'static str; 3] = ["jpg", "jpeg", "png"];

    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
    }

    pub fn has_allowed_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| Self::ALLOWED_EXTENSIONS.contains(&ext.as_str()))
    }
}
