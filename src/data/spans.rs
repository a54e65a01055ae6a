// ============================================================
// Layer 4: Span JSON Source
// ============================================================
// Reads the output of an external layout extractor: a JSON file
// holding the styled fragments of one document in reading order.
//
// Two shapes are accepted:
//
//   [ {"text": "...", "font_size": 12.0, "bold": false, "page": 1}, ... ]
//
//   { "fragments": [ ... ] }
//
// Every fragment attribute is required. A fragment missing one
// fails the whole document, which the caller logs and skips.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::data::preprocessor::Preprocessor;
use crate::domain::fragment::Fragment;
use crate::domain::traits::SpanSource;

#[derive(Deserialize)]
#[serde(untagged)]
enum SpanFile {
    Bare(Vec<Fragment>),
    Wrapped { fragments: Vec<Fragment> },
}

impl SpanFile {
    fn into_fragments(self) -> Vec<Fragment> {
        match self {
            SpanFile::Bare(fragments)           => fragments,
            SpanFile::Wrapped { fragments }     => fragments,
        }
    }
}

/// Loads fragments from `*.json` span files.
#[derive(Default)]
pub struct JsonSpanSource {
    preprocessor: Preprocessor,
}

impl JsonSpanSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse span JSON text into cleaned, non-empty fragments.
    pub fn parse(&self, json: &str) -> Result<Vec<Fragment>> {
        let file: SpanFile = serde_json::from_str(json)
            .context("span file is not a fragment list")?;

        let mut fragments = Vec::new();
        for (i, raw) in file.into_fragments().into_iter().enumerate() {
            anyhow::ensure!(
                raw.font_size.is_finite() && raw.font_size > 0.0,
                "fragment {} has invalid font size {}",
                i,
                raw.font_size
            );

            let text = self.preprocessor.clean_fragment(&raw.text);
            if text.is_empty() {
                continue;
            }
            fragments.push(Fragment { text, ..raw });
        }
        Ok(fragments)
    }
}

impl SpanSource for JsonSpanSource {
    fn extract(&self, path: &Path) -> Result<Vec<Fragment>> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        self.parse(&json)
            .with_context(|| format!("Malformed span file '{}'", path.display()))
    }
}
