use crate::classify::DamageCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const NO_DAMAGE_MESSAGE: &str = "No significant damage detected. Images are very similar.";
pub const PROCESSING_ERROR_MESSAGE: &str = "Error occurred during image processing";

/// Coarse damage tier derived from the share of the image that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Major,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Major => "major",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Minor => "Minor",
            Self::Moderate => "Moderate",
            Self::Major => "Major",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of comparing a before/after photo pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub damage_detected: bool,
    /// Mean structural similarity, clamped to `[0, 1]`.
    pub similarity_score: f64,
    /// Percent of the comparison grid covered by surviving regions, two decimals.
    pub damage_percentage: f64,
    pub damage_count: usize,
    pub damage_types: BTreeSet<DamageCategory>,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectionReport {
    /// Report standing in for a comparison that failed after decoding.
    pub fn failed(error: impl fmt::Display) -> Self {
        Self {
            damage_detected: false,
            similarity_score: 0.0,
            damage_percentage: 0.0,
            damage_count: 0,
            damage_types: BTreeSet::new(),
            severity: Severity::Minor,
            message: PROCESSING_ERROR_MESSAGE.to_string(),
            error: Some(format!("Failed to process images: {error}")),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
