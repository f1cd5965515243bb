mod builder;
pub mod types;

pub use builder::ReportBuilder;
pub use types::{DetectionReport, Severity, NO_DAMAGE_MESSAGE, PROCESSING_ERROR_MESSAGE};
