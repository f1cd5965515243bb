use crate::regions::Region;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of damage a changed region is taken to represent.
///
/// Declaration order is the order labels appear in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageCategory {
    Dent,
    Scratch,
    PaintDamage,
}

impl DamageCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dent => "dent",
            Self::Scratch => "scratch",
            Self::PaintDamage => "paint_damage",
        }
    }
}

impl fmt::Display for DamageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One classified region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageFinding {
    pub category: DamageCategory,
    pub region: Region,
}

/// Trait for region classifiers
/// Allows replacing the shape heuristic (e.g. with a trained model) without
/// touching the rest of the pipeline
pub trait DamageClassifier: Send + Sync {
    /// Assign a damage category to a region
    ///
    /// Must be a pure function of the region.
    fn classify(&self, region: &Region) -> DamageCategory;

    /// Short name used in logs
    fn name(&self) -> &str;
}
