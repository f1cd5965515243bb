mod artifacts;
mod json;

pub use artifacts::{render_overlay, save_gray_png, save_rgb_png};
pub use json::JsonSink;

use crate::error::Result;
use crate::report::DetectionReport;

/// Trait for report destinations
pub trait ReportSink {
    /// Write one report
    fn write_report(&mut self, report: &DetectionReport) -> Result<()>;
}
