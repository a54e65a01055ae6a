// ============================================================
// Layer 2: SectionsUseCase
// ============================================================
// Segments a single document and returns its sections, without
// scoring. Used to check how heading detection behaves on a
// document before tuning the thresholds.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::loader::{document_id, DocumentKind, SpanSources};
use crate::data::segmenter::SectionSegmenter;
use crate::domain::section::Section;
use crate::infra::tuning_store::TuningStore;

use super::rank_use_case::Tuning;

pub struct SectionsUseCase {
    document: PathBuf,
    tuning:   Tuning,
}

impl SectionsUseCase {
    pub fn new(document: PathBuf, tuning_path: Option<PathBuf>) -> Result<Self> {
        let tuning = TuningStore::load_or_default(tuning_path.as_deref())?;
        Ok(Self { document, tuning })
    }

    pub fn sections(&self) -> Result<Vec<Section>> {
        let kind = DocumentKind::from_path(&self.document).with_context(|| {
            format!(
                "Unsupported document '{}'; expected a .json span file or a .docx file",
                self.document.display()
            )
        })?;

        let fragments = SpanSources::new().for_kind(kind).extract(&self.document)?;
        let id        = document_id(&self.document);
        tracing::debug!("'{}': {} fragments", id, fragments.len());

        Ok(SectionSegmenter::new(self.tuning.segmenter.clone()).segment(&id, &fragments))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_segments_span_file() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("guide.spans.json");
        fs::write(
            &path,
            r#"{"fragments": [
                {"text": "Nightlife", "font_size": 18, "bold": true, "page": 2},
                {"text": "bars open late.", "font_size": 11, "bold": false, "page": 2}
            ]}"#,
        )
        .unwrap();

        let sections = SectionsUseCase::new(path, None).unwrap().sections().unwrap();
        assert_eq!(sections, vec![Section::new("guide", "Nightlife", "bars open late.", 2)]);
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();
        assert!(SectionsUseCase::new(path, None).unwrap().sections().is_err());
    }
}
