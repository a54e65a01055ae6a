// ============================================================
// Layer 6: Tuning Store
// ============================================================
// Saves and loads the tuning file: a JSON document holding every
// threshold, weight and constant of the pipeline.
//
//   {
//       "segmenter": { "size_margin": 1.0, ... },
//       "scoring":   { "weights": { "semantic": 0.5, ... }, ... },
//       "refiner":   { "max_length": 800, ... }
//   }
//
// Every field is optional; missing ones take their defaults, so
// a file only needs to mention what it changes. A loaded file is
// validated before use.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::rank_use_case::Tuning;
use crate::infra::report_writer::to_pretty_json;

pub struct TuningStore {
    path: PathBuf,
}

impl TuningStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write `tuning` as pretty JSON, creating parent directories.
    pub fn save(&self, tuning: &Tuning) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }

        fs::write(&self.path, to_pretty_json(tuning)?)
            .with_context(|| format!("Cannot write tuning to '{}'", self.path.display()))?;

        tracing::debug!("Saved tuning to '{}'", self.path.display());
        Ok(())
    }

    /// Read and validate the tuning file.
    pub fn load(&self) -> Result<Tuning> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read tuning from '{}'", self.path.display()))?;

        let tuning: Tuning = serde_json::from_str(&json)
            .with_context(|| format!("Malformed tuning file '{}'", self.path.display()))?;
        tuning
            .validate()
            .with_context(|| format!("Invalid tuning in '{}'", self.path.display()))?;

        tracing::info!("Loaded tuning from '{}'", self.path.display());
        Ok(tuning)
    }

    /// Tuning from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Tuning> {
        match path {
            Some(p) => Self::new(p).load(),
            None    => Ok(Tuning::default()),
        }
    }
}
