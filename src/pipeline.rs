use crate::classify::{self, DamageClassifier, DamageFinding};
use crate::config::DetectorConfig;
use crate::difference::{change_mask, ChangeMask, DifferenceEngine};
use crate::error::Result;
use crate::normalize::{Normalizer, PixelGrid};
use crate::regions::RegionExtractor;
use crate::report::{DetectionReport, ReportBuilder};
use image::GrayImage;

/// Everything produced by one comparison, for callers that need more than the report.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub report: DetectionReport,
    pub findings: Vec<DamageFinding>,
    pub diff_map: GrayImage,
    pub mask: ChangeMask,
}

/// Before/after damage detection pipeline.
///
/// Holds configuration only; every call allocates its own buffers, so a
/// detector can be shared across threads.
pub struct DamageDetector {
    config: DetectorConfig,
    normalizer: Normalizer,
    engine: DifferenceEngine,
    extractor: RegionExtractor,
    classifier: Box<dyn DamageClassifier>,
    reporter: ReportBuilder,
}

impl DamageDetector {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: Normalizer::from_config(&config),
            engine: DifferenceEngine::new(config.ssim_window),
            extractor: RegionExtractor::new(config.min_region_area),
            classifier: classify::create_default_classifier(config.classifier),
            reporter: ReportBuilder::from_config(&config),
            config,
        })
    }

    /// Swap in another region classifier.
    pub fn with_classifier(mut self, classifier: Box<dyn DamageClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Decode both photos and compare them.
    ///
    /// Undecodable input is returned as an error; any later failure is
    /// folded into the report.
    pub fn detect(&self, before: &[u8], after: &[u8]) -> Result<DetectionReport> {
        let before = self.normalizer.normalize_named(before, "before")?;
        let after = self.normalizer.normalize_named(after, "after")?;
        Ok(self.compare(&before, &after))
    }

    /// Compare two decoded photos. Never fails: errors become an error report.
    pub fn compare(&self, before: &PixelGrid, after: &PixelGrid) -> DetectionReport {
        match self.inspect(before, after) {
            Ok(inspection) => inspection.report,
            Err(e) => {
                tracing::warn!("Comparison failed: {}", e);
                DetectionReport::failed(e)
            }
        }
    }

    pub fn inspect(&self, before: &PixelGrid, after: &PixelGrid) -> Result<Inspection> {
        let before = self.normalizer.to_comparable(before);
        let after = self.normalizer.to_comparable(after);
        self.inspect_comparable(&before, &after)
    }

    /// Run the pipeline on grids already in comparison form.
    pub fn inspect_comparable(&self, before: &GrayImage, after: &GrayImage) -> Result<Inspection> {
        let difference = self.engine.diff(before, after)?;
        let mask = change_mask(&difference.diff_map);
        let regions = self.extractor.extract(&mask);
        let findings = classify::classify_all(self.classifier.as_ref(), regions);
        let report = self
            .reporter
            .build(difference.similarity_score, before.dimensions(), &findings);

        tracing::debug!(
            "similarity={:.4} regions={} detected={}",
            report.similarity_score,
            report.damage_count,
            report.damage_detected
        );

        Ok(Inspection {
            report,
            findings,
            diff_map: difference.diff_map,
            mask,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DamageCategory;
    use crate::error::DetectionError;
    use crate::regions::Region;
    use image::Luma;

    struct AlwaysScratch;

    impl DamageClassifier for AlwaysScratch {
        fn classify(&self, _region: &Region) -> DamageCategory {
            DamageCategory::Scratch
        }

        fn name(&self) -> &str {
            "always-scratch"
        }
    }

    fn small_config() -> DetectorConfig {
        DetectorConfig {
            comparison_width: 64,
            comparison_height: 64,
            min_region_area: 10,
            ..Default::default()
        }
    }

    fn with_square(base: &GrayImage, x0: u32, y0: u32, side: u32) -> GrayImage {
        let mut image = base.clone();
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                image.put_pixel(x, y, Luma([230]));
            }
        }
        image
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = DetectorConfig {
            ssim_window: 2,
            ..Default::default()
        };
        assert!(matches!(
            DamageDetector::new(config),
            Err(DetectionError::Config(_))
        ));
    }

    #[test]
    fn identical_grids_report_no_damage() {
        let detector = DamageDetector::new(small_config()).unwrap();
        let image = GrayImage::from_fn(64, 64, |x, y| Luma([((x * 4 + y) % 256) as u8]));
        let inspection = detector.inspect_comparable(&image, &image).unwrap();
        assert!(inspection.mask.is_empty());
        assert!(inspection.findings.is_empty());
        assert!(!inspection.report.damage_detected);
        assert_eq!(inspection.report.similarity_score, 1.0);
    }

    #[test]
    fn shape_mismatch_becomes_an_error_result() {
        let detector = DamageDetector::new(small_config()).unwrap();
        let a = GrayImage::new(64, 64);
        let b = GrayImage::new(64, 32);
        assert!(matches!(
            detector.inspect_comparable(&a, &b),
            Err(DetectionError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn custom_classifier_is_used() {
        let detector = DamageDetector::new(small_config())
            .unwrap()
            .with_classifier(Box::new(AlwaysScratch));
        let before = GrayImage::from_pixel(64, 64, Luma([90]));
        let after = with_square(&before, 24, 24, 12);
        let inspection = detector.inspect_comparable(&before, &after).unwrap();
        assert!(!inspection.findings.is_empty());
        assert!(inspection
            .findings
            .iter()
            .all(|f| f.category == DamageCategory::Scratch));
    }

    #[test]
    fn compare_resizes_inputs_of_different_resolution() {
        let detector = DamageDetector::new(small_config()).unwrap();
        let before = PixelGrid::Gray(GrayImage::from_pixel(128, 96, Luma([120])));
        let after = PixelGrid::Gray(GrayImage::from_pixel(40, 40, Luma([120])));
        let report = detector.compare(&before, &after);
        assert!(report.error.is_none());
        assert!(!report.damage_detected);
    }

    #[test]
    fn undecodable_bytes_are_client_errors() {
        let detector = DamageDetector::new(small_config()).unwrap();
        let err = detector.detect(b"nope", b"nope").unwrap_err();
        assert!(err.is_client_fault());
        assert!(err.to_string().contains("before"));
    }

    #[test]
    fn detector_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DamageDetector>();
    }
}
