use super::types::{DetectionReport, Severity, NO_DAMAGE_MESSAGE};
use crate::classify::{DamageCategory, DamageFinding};
use crate::config::{DetectorConfig, SeverityBands};
use std::collections::BTreeSet;

/// Aggregates classified regions into a [`DetectionReport`].
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    detection_floor_percent: f64,
    bands: SeverityBands,
}

impl ReportBuilder {
    pub fn new(detection_floor_percent: f64, bands: SeverityBands) -> Self {
        Self {
            detection_floor_percent,
            bands,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.detection_floor_percent, config.severity)
    }

    pub fn severity(&self, damage_percentage: f64) -> Severity {
        if damage_percentage < self.bands.minor_below_percent {
            Severity::Minor
        } else if damage_percentage < self.bands.moderate_below_percent {
            Severity::Moderate
        } else {
            Severity::Major
        }
    }

    /// `grid_size` is the comparison resolution the regions were measured on.
    pub fn build(
        &self,
        similarity_score: f64,
        grid_size: (u32, u32),
        findings: &[DamageFinding],
    ) -> DetectionReport {
        let _span = tracing::debug_span!("build_report").entered();

        let grid_area = grid_size.0 as f64 * grid_size.1 as f64;
        let damaged_area: u64 = findings.iter().map(|f| f.region.area as u64).sum();
        let damage_percentage = if grid_area > 0.0 {
            100.0 * damaged_area as f64 / grid_area
        } else {
            0.0
        };

        let damage_detected =
            !findings.is_empty() && damage_percentage > self.detection_floor_percent;
        let severity = self.severity(damage_percentage);
        let damage_types: BTreeSet<DamageCategory> =
            findings.iter().map(|f| f.category).collect();

        let message = if damage_detected {
            damage_message(severity, damage_percentage, &damage_types)
        } else {
            NO_DAMAGE_MESSAGE.to_string()
        };

        tracing::debug!(
            "{} region(s), {:.3}% damaged, detected={}, severity={}",
            findings.len(),
            damage_percentage,
            damage_detected,
            severity
        );

        DetectionReport {
            damage_detected,
            // anti-correlated structure drives raw SSIM below zero
            similarity_score: similarity_score.clamp(0.0, 1.0),
            damage_percentage: round_to(damage_percentage, 2),
            damage_count: findings.len(),
            damage_types,
            severity,
            message,
            error: None,
        }
    }
}

fn damage_message(
    severity: Severity,
    damage_percentage: f64,
    damage_types: &BTreeSet<DamageCategory>,
) -> String {
    let types = damage_types
        .iter()
        .map(DamageCategory::label)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Damage detected! {} damage found ({:.1}% of image). Damage types: {}.",
        severity.title(),
        damage_percentage,
        types
    )
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
