use crate::domain::outcome::Outcome;
use crate::domain::ports::FailureSink;
use crate::error::ReportWriteError;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct FailureRow<'a> {
    #[serde(rename = "NFD")]
    handle: &'a str,
    #[serde(rename = "Amount")]
    amount: u64,
    #[serde(rename = "Error")]
    error: &'a str,
}

impl<'a> From<&'a Outcome> for FailureRow<'a> {
    fn from(outcome: &'a Outcome) -> Self {
        Self {
            handle: &outcome.request.handle,
            amount: outcome.request.amount.value(),
            error: outcome.error().unwrap_or_default(),
        }
    }
}

/// Writes failed outcomes as `NFD,Amount,Error` CSV rows.
pub struct FailureWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> FailureWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_outcomes(&mut self, failed: &[Outcome]) -> Result<(), ReportWriteError> {
        for outcome in failed {
            self.writer.serialize(FailureRow::from(outcome))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> FailureSink for FailureWriter<W> {
    fn write_failures(&mut self, failed: &[Outcome]) -> Result<(), ReportWriteError> {
        self.write_outcomes(failed)
    }
}

/// A report file that is only created once there is something to write.
#[derive(Debug, Clone)]
pub struct FailureReportFile {
    path: PathBuf,
}

impl FailureReportFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FailureSink for FailureReportFile {
    fn write_failures(&mut self, failed: &[Outcome]) -> Result<(), ReportWriteError> {
        let file = File::create(&self.path)?;
        FailureWriter::new(file).write_outcomes(failed)
    }
}

/// `payments.csv` reports to `payments-failed.csv` in the same directory.
pub fn default_report_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "payments".to_string());
    input.with_file_name(format!("{stem}-failed.csv"))
}
