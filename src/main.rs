use anyhow::{Context, Result};
use clap::Parser;
use damage_inspect::input::{Base64Source, FileSource, ImageSource};
use damage_inspect::output::{self, JsonSink, ReportSink};
use damage_inspect::{DamageDetector, DetectionReport, DetectorConfig};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compare before/after photos for visible damage", long_about = None)]
struct Args {
    /// Photo taken before
    #[arg(short, long)]
    before: PathBuf,

    /// Photo taken after
    #[arg(short, long)]
    after: PathBuf,

    /// Input files hold base64 text (optionally a data URL) instead of raw image bytes
    #[arg(long)]
    base64: bool,

    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comparison resolution width
    #[arg(long)]
    width: Option<u32>,

    /// Comparison resolution height
    #[arg(long)]
    height: Option<u32>,

    /// Smallest region (pixels) kept as damage
    #[arg(long)]
    min_region_area: Option<u32>,

    /// Damaged share of the image (percent) required to report damage
    #[arg(long)]
    detection_floor: Option<f64>,

    /// Circularity above which a region is a dent
    #[arg(long)]
    dent_circularity: Option<f64>,

    /// Perimeter (pixels) above which a non-round region is a scratch
    #[arg(long)]
    scratch_perimeter: Option<f64>,

    /// Damaged percentage below which severity is minor
    #[arg(long)]
    minor_below: Option<f64>,

    /// Damaged percentage below which severity is moderate
    #[arg(long)]
    moderate_below: Option<f64>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Write the dissimilarity map as a PNG
    #[arg(long)]
    diff_out: Option<PathBuf>,

    /// Write the binary change mask as a PNG
    #[arg(long)]
    mask_out: Option<PathBuf>,

    /// Write the after photo with damage boxes drawn on it
    #[arg(long)]
    overlay_out: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn detector_config(&self) -> Result<DetectorConfig> {
        let mut config = match &self.config {
            Some(path) => DetectorConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => DetectorConfig::default(),
        };

        if let Some(width) = self.width {
            config.comparison_width = width;
        }
        if let Some(height) = self.height {
            config.comparison_height = height;
        }
        if let Some(area) = self.min_region_area {
            config.min_region_area = area;
        }
        if let Some(floor) = self.detection_floor {
            config.detection_floor_percent = floor;
        }
        if let Some(circularity) = self.dent_circularity {
            config.classifier.dent_circularity = circularity;
        }
        if let Some(perimeter) = self.scratch_perimeter {
            config.classifier.scratch_perimeter = perimeter;
        }
        if let Some(minor) = self.minor_below {
            config.severity.minor_below_percent = minor;
        }
        if let Some(moderate) = self.moderate_below {
            config.severity.moderate_below_percent = moderate;
        }
        Ok(config)
    }

    fn wants_artifacts(&self) -> bool {
        self.diff_out.is_some() || self.mask_out.is_some() || self.overlay_out.is_some()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = args.detector_config()?;
    tracing::info!(
        "Comparison: {}x{}, min region area {} px",
        config.comparison_width,
        config.comparison_height,
        config.min_region_area
    );

    let detector = DamageDetector::new(config).context("Invalid detector configuration")?;

    let report = run(&detector, &args)?;

    let mut sink = JsonSink::new(std::io::stdout().lock(), args.pretty);
    sink.write_report(&report).context("Failed to write report")?;

    Ok(())
}

fn run(detector: &DamageDetector, args: &Args) -> Result<DetectionReport> {
    let started = Instant::now();

    let before_bytes = read_input(&args.before, args.base64, "before")?;
    let after_bytes = read_input(&args.after, args.base64, "after")?;

    let normalizer = detector.normalizer();
    let before = normalizer
        .normalize_named(&before_bytes, "before")
        .context("Failed to decode before photo")?;
    let after = normalizer
        .normalize_named(&after_bytes, "after")
        .context("Failed to decode after photo")?;

    let report = if args.wants_artifacts() {
        match detector.inspect(&before, &after) {
            Ok(inspection) => {
                if let Some(path) = &args.diff_out {
                    output::save_gray_png(&inspection.diff_map, path)?;
                    tracing::info!("Diff map written to {}", path.display());
                }
                if let Some(path) = &args.mask_out {
                    output::save_gray_png(inspection.mask.as_image(), path)?;
                    tracing::info!("Change mask written to {}", path.display());
                }
                if let Some(path) = &args.overlay_out {
                    let config = detector.config();
                    let overlay = output::render_overlay(
                        &after,
                        (config.comparison_width, config.comparison_height),
                        config.resize_filter.into(),
                        &inspection.findings,
                    );
                    output::save_rgb_png(&overlay, path)?;
                    tracing::info!("Overlay written to {}", path.display());
                }
                inspection.report
            }
            Err(e) => {
                tracing::warn!("Comparison failed: {}", e);
                DetectionReport::failed(e)
            }
        }
    } else {
        detector.compare(&before, &after)
    };

    tracing::info!(
        "Done in {:.1}ms: detected={}, regions={}, similarity={:.4}",
        started.elapsed().as_secs_f64() * 1000.0,
        report.damage_detected,
        report.damage_count,
        report.similarity_score
    );

    Ok(report)
}

fn read_input(path: &Path, base64: bool, name: &str) -> Result<Vec<u8>> {
    let bytes = if base64 {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {} from {}", name, path.display()))?;
        Base64Source::new(name, text).read_bytes()
    } else {
        FileSource::new(path).read_bytes()
    };
    bytes.with_context(|| format!("Failed to read {} photo", name))
}
