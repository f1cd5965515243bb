mod shape;
pub mod types;

pub use shape::ShapeHeuristicClassifier;
pub use types::{DamageCategory, DamageClassifier, DamageFinding};

use crate::config::ClassifierThresholds;
use crate::regions::Region;

/// Create the default classifier (shape heuristic)
pub fn create_default_classifier(thresholds: ClassifierThresholds) -> Box<dyn DamageClassifier> {
    Box::new(ShapeHeuristicClassifier::new(thresholds))
}

/// Classify every region, one finding per region, order preserved.
pub fn classify_all(classifier: &dyn DamageClassifier, regions: Vec<Region>) -> Vec<DamageFinding> {
    let _span = tracing::debug_span!("classify", classifier = classifier.name()).entered();
    regions
        .into_iter()
        .map(|region| DamageFinding {
            category: classifier.classify(&region),
            region,
        })
        .collect()
}
