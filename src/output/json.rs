use super::ReportSink;
use crate::error::{DetectionError, Result};
use crate::report::DetectionReport;
use std::io::Write;

/// Writes each report as one JSON document followed by a newline.
pub struct JsonSink<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W, pretty: bool) -> Self {
        Self { writer, pretty }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn write_report(&mut self, report: &DetectionReport) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        }
        .map_err(|e| DetectionError::Output(format!("failed to serialize report: {e}")))?;

        writeln!(self.writer, "{json}")
            .and_then(|_| self.writer.flush())
            .map_err(|e| DetectionError::Output(format!("failed to write report: {e}")))
    }
}
