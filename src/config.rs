use crate::error::ConfigError;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Resampling filter used when bringing both photos to the comparison resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Shape thresholds for the heuristic damage classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Regions rounder than this are dents.
    pub dent_circularity: f64,
    /// Non-round regions with a longer boundary than this are scratches.
    pub scratch_perimeter: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            dent_circularity: 0.7,
            scratch_perimeter: 100.0,
        }
    }
}

/// Damaged-area cutoffs (percent of the comparison grid) for severity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityBands {
    pub minor_below_percent: f64,
    pub moderate_below_percent: f64,
}

impl Default for SeverityBands {
    fn default() -> Self {
        Self {
            minor_below_percent: 1.0,
            moderate_below_percent: 5.0,
        }
    }
}

/// Tunable knobs of the detection pipeline.
///
/// Every threshold is an empirical default; none of them has been calibrated
/// against a corpus of real damage photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub comparison_width: u32,
    pub comparison_height: u32,
    pub resize_filter: ResizeFilter,
    /// Side of the Gaussian smoothing kernel; sigma is derived from it.
    pub blur_kernel_size: u32,
    /// Side of the square structural-similarity window.
    pub ssim_window: u32,
    /// Regions enclosing fewer pixels than this are treated as noise.
    pub min_region_area: u32,
    /// Damage is only reported above this share (percent) of the image.
    pub detection_floor_percent: f64,
    pub classifier: ClassifierThresholds,
    pub severity: SeverityBands,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            comparison_width: 512,
            comparison_height: 512,
            resize_filter: ResizeFilter::default(),
            blur_kernel_size: 5,
            ssim_window: 7,
            min_region_area: 50,
            detection_floor_percent: 0.1,
            classifier: ClassifierThresholds::default(),
            severity: SeverityBands::default(),
        }
    }
}

impl DetectorConfig {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_json_str(&text).map_err(|e| match e {
            ConfigError::Load { message } => ConfigError::Load {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| ConfigError::Load {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Gaussian sigma for the smoothing kernel, using the usual
    /// `0.3 * ((k - 1) / 2 - 1) + 0.8` rule for a `k`-sized kernel.
    pub fn blur_sigma(&self) -> f32 {
        0.3 * ((self.blur_kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    }

    pub fn comparison_area(&self) -> u64 {
        self.comparison_width as u64 * self.comparison_height as u64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.comparison_width == 0 || self.comparison_height == 0 {
            return Err(ConfigError::invalid(
                "comparison_width/comparison_height",
                format!(
                    "comparison size must be non-zero, got {}x{}",
                    self.comparison_width, self.comparison_height
                ),
            ));
        }
        if self.blur_kernel_size < 3 || self.blur_kernel_size % 2 == 0 {
            return Err(ConfigError::invalid(
                "blur_kernel_size",
                format!("must be odd and >= 3, got {}", self.blur_kernel_size),
            ));
        }
        if self.ssim_window < 3 || self.ssim_window % 2 == 0 {
            return Err(ConfigError::invalid(
                "ssim_window",
                format!("must be odd and >= 3, got {}", self.ssim_window),
            ));
        }
        let min_side = self.comparison_width.min(self.comparison_height);
        if self.ssim_window > min_side {
            return Err(ConfigError::invalid(
                "ssim_window",
                format!(
                    "window {} does not fit a {}x{} comparison grid",
                    self.ssim_window, self.comparison_width, self.comparison_height
                ),
            ));
        }
        check_non_negative("detection_floor_percent", self.detection_floor_percent)?;
        check_non_negative("classifier.dent_circularity", self.classifier.dent_circularity)?;
        check_non_negative("classifier.scratch_perimeter", self.classifier.scratch_perimeter)?;
        check_non_negative("severity.minor_below_percent", self.severity.minor_below_percent)?;
        check_non_negative(
            "severity.moderate_below_percent",
            self.severity.moderate_below_percent,
        )?;
        if self.severity.minor_below_percent > self.severity.moderate_below_percent {
            return Err(ConfigError::invalid(
                "severity",
                format!(
                    "minor cutoff {} exceeds moderate cutoff {}",
                    self.severity.minor_below_percent, self.severity.moderate_below_percent
                ),
            ));
        }
        Ok(())
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("must be a finite, non-negative number, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = DetectorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.comparison_area(), 512 * 512);
        assert!((config.blur_sigma() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn rejects_even_kernel() {
        let config = DetectorConfig {
            blur_kernel_size: 4,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "blur_kernel_size",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_size_and_oversized_window() {
        let zero = DetectorConfig {
            comparison_width: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let tiny = DetectorConfig {
            comparison_width: 5,
            comparison_height: 5,
            ..Default::default()
        };
        assert!(matches!(
            tiny.validate(),
            Err(ConfigError::InvalidValue {
                field: "ssim_window",
                ..
            })
        ));
    }

    #[test]
    fn rejects_inverted_severity_bands() {
        let config = DetectorConfig {
            severity: SeverityBands {
                minor_below_percent: 6.0,
                moderate_below_percent: 5.0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nan_thresholds() {
        let config = DetectorConfig {
            classifier: ClassifierThresholds {
                dent_circularity: f64::NAN,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DetectorConfig::from_json_str(
            r#"{ "min_region_area": 120, "classifier": { "scratch_perimeter": 80.0 },
                 "resize_filter": "lanczos3" }"#,
        )
        .unwrap();
        assert_eq!(config.min_region_area, 120);
        assert_eq!(config.classifier.scratch_perimeter, 80.0);
        assert_eq!(config.classifier.dent_circularity, 0.7);
        assert_eq!(config.resize_filter, ResizeFilter::Lanczos3);
        assert_eq!(config.comparison_width, 512);
    }

    #[test]
    fn invalid_json_values_are_rejected() {
        assert!(matches!(
            DetectorConfig::from_json_str("{ not json"),
            Err(ConfigError::Load { .. })
        ));
        assert!(matches!(
            DetectorConfig::from_json_str(r#"{ "ssim_window": 8 }"#),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
