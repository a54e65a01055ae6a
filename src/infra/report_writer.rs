// ============================================================
// Layer 6: Report Writer
// ============================================================
// Writes the result of a run to <output_dir>/output.json.
//
// Layout:
//   {
//       "metadata": { input_documents, persona,
//                     job_to_be_done, processing_timestamp },
//       "extracted_sections":  [ ... ],
//       "subsection_analysis": [ ... ]
//   }
//
// Four-space indentation, non-ASCII text written as-is. The
// output directory is created if it does not exist yet.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::{fs, path::PathBuf};

use crate::domain::report::RunReport;

pub const REPORT_FILE_NAME: &str = "output.json";

pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the report is written to.
    pub fn report_path(&self) -> PathBuf {
        self.dir.join(REPORT_FILE_NAME)
    }

    /// Serialise `report` and write it, returning the file path.
    pub fn write(&self, report: &RunReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create output directory '{}'", self.dir.display()))?;

        let path = self.report_path();
        let json = to_pretty_json(report)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write report to '{}'", path.display()))?;

        tracing::info!("Wrote report to '{}'", path.display());
        Ok(path)
    }

    /// Read a previously written report back.
    #[cfg(test)]
    pub fn read(path: &std::path::Path) -> Result<RunReport> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read report '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed report '{}'", path.display()))
    }
}

/// JSON with four-space indentation.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser).context("Cannot serialise report")?;
    Ok(buf)
}
