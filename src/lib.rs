//! Before/after photo comparison for visible vehicle damage.
//!
//! Two photos are normalized to a common grayscale resolution, compared with
//! a windowed structural-similarity measure, and the dissimilar areas are
//! thresholded, traced into regions and classified by shape. The result is
//! a flat [`DetectionReport`].
//!
//! ```no_run
//! use damage_inspect::{DamageDetector, DetectorConfig};
//!
//! # fn main() -> Result<(), damage_inspect::DetectionError> {
//! let detector = DamageDetector::new(DetectorConfig::default())?;
//! let before = std::fs::read("before.jpg").unwrap();
//! let after = std::fs::read("after.jpg").unwrap();
//! let report = detector.detect(&before, &after)?;
//! println!("{}", report.message);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod difference;
pub mod error;
pub mod input;
pub mod normalize;
pub mod output;
pub mod regions;
pub mod report;

mod pipeline;

pub use classify::{DamageCategory, DamageClassifier, DamageFinding, ShapeHeuristicClassifier};
pub use config::{ClassifierThresholds, DetectorConfig, ResizeFilter, SeverityBands};
pub use difference::{ChangeMask, DifferenceEngine};
pub use error::{ConfigError, DetectionError};
pub use normalize::{Normalizer, PixelGrid};
pub use pipeline::{DamageDetector, Inspection};
pub use regions::{Region, RegionExtractor};
pub use report::{DetectionReport, ReportBuilder, Severity};
