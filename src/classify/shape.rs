use super::types::{DamageCategory, DamageClassifier};
use crate::config::ClassifierThresholds;
use crate::regions::Region;

/// Decision list over region shape, first match wins:
/// round regions are dents, long-bordered ones scratches, the rest paint damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeHeuristicClassifier {
    thresholds: ClassifierThresholds,
}

impl ShapeHeuristicClassifier {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> ClassifierThresholds {
        self.thresholds
    }

    pub fn classify_shape(&self, circularity: f64, perimeter: f64) -> DamageCategory {
        if circularity > self.thresholds.dent_circularity {
            DamageCategory::Dent
        } else if perimeter > self.thresholds.scratch_perimeter {
            DamageCategory::Scratch
        } else {
            DamageCategory::PaintDamage
        }
    }
}

impl Default for ShapeHeuristicClassifier {
    fn default() -> Self {
        Self::new(ClassifierThresholds::default())
    }
}

impl DamageClassifier for ShapeHeuristicClassifier {
    fn classify(&self, region: &Region) -> DamageCategory {
        let category = self.classify_shape(region.circularity(), region.perimeter);
        tracing::trace!(
            "Region area={} perimeter={:.1} circularity={:.3} -> {}",
            region.area,
            region.perimeter,
            region.circularity(),
            category
        );
        category
    }

    fn name(&self) -> &str {
        "shape-heuristic"
    }
}
