//! Evaluation report output.

use crate::error::{Error, Result};
use crate::ml::evaluator::EvaluationReport;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Output format of an evaluation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(Error::InvalidConfig(format!("unknown report format '{}'", other))),
        }
    }
}

/// Render a report into `writer`.
pub fn render_report<W: Write>(
    report: &EvaluationReport,
    format: ReportFormat,
    mut writer: W,
) -> Result<()> {
    match format {
        ReportFormat::Text => write!(writer, "{}", report)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, report)?;
            writeln!(writer)?;
        },
    }
    writer.flush()?;
    Ok(())
}

/// Write a report file.
pub fn write_report(report: &EvaluationReport, path: &Path, format: ReportFormat) -> Result<()> {
    let file = File::create(path)?;
    render_report(report, format, BufWriter::new(file))?;
    log::info!("Wrote evaluation report to {}", path.display());
    Ok(())
}
