// ============================================================
// Layer 2: RankUseCase
// ============================================================
// Orchestrates one ranking run in order:
//
//   Step 1: Discover documents           (Layer 4 - data)
//   Step 2: Extract + segment each doc   (Layer 4 - data, parallel)
//   Step 3: Score every section          (ranking)
//   Step 4: Pick one section per doc     (ranking)
//   Step 5: Refine the picked sections   (ranking, parallel)
//   Step 6: Assemble the report          (Layer 3 - domain)
//   Step 7: Write output.json            (Layer 6 - infra)
//
// A document that cannot be read or parsed is logged and left
// out. A run that ends up with no sections at all produces no
// report and is not an error.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::data::loader::{DocumentCatalog, DocumentEntry, SpanSources};
use crate::data::segmenter::{SectionSegmenter, SegmenterConfig};
use crate::domain::query::Query;
use crate::domain::report::{ExtractedSectionRecord, RefinedSectionRecord, RunMetadata, RunReport};
use crate::domain::section::Section;
use crate::domain::traits::{EntityOracle, SemanticOracle};
use crate::infra::report_writer::ReportWriter;
use crate::infra::tuning_store::TuningStore;
use crate::ml::embedder::HashedEmbedder;
use crate::ml::openai::{OpenAiEmbedder, OpenAiSettings};
use crate::ml::recognizer::HeuristicRecognizer;
use crate::ranking::refiner::{RefinerConfig, TextRefiner};
use crate::ranking::scorer::{RelevanceScorer, ScoringConfig};
use crate::ranking::selector::DiversitySelector;

// ─── Tuning ──────────────────────────────────────────────────────────────────
// Every threshold and weight of the pipeline, loaded from the
// tuning file (see infra/tuning_store.rs).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub segmenter: SegmenterConfig,
    pub scoring:   ScoringConfig,
    pub refiner:   RefinerConfig,
}

impl Tuning {
    pub fn validate(&self) -> Result<()> {
        self.scoring.weights.validate()?;

        let s = &self.segmenter;
        anyhow::ensure!(
            s.size_margin.is_finite() && s.bold_margin.is_finite(),
            "segmenter margins must be finite numbers"
        );

        let q = &self.scoring.quality;
        anyhow::ensure!(
            q.target_length > 0.0 && q.target_words_per_sentence > 0.0,
            "quality targets must be positive"
        );
        anyhow::ensure!(self.scoring.entity_window > 0, "entity window must be positive");
        anyhow::ensure!(self.scoring.lexical_max_features > 0, "lexical max features must be positive");
        anyhow::ensure!(self.scoring.epsilon > 0.0, "normalisation epsilon must be positive");

        anyhow::ensure!(self.refiner.length_tolerance > 0.0, "length tolerance must be positive");
        Ok(())
    }
}

// ─── Run Configuration ───────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct RankConfig {
    pub input_dir:      PathBuf,
    pub output_dir:     PathBuf,
    pub persona:        String,
    pub job:            String,
    pub top_k:          usize,
    pub tuning_path:    Option<PathBuf>,
    pub tokenizer_path: Option<PathBuf>,
    /// Remote embeddings instead of the local hashed embedder
    pub embeddings:     Option<EmbeddingsConfig>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingsConfig {
    pub base_url:     String,
    pub model:        String,
    pub api_key:      String,
    pub timeout_secs: u64,
}

const EMBEDDING_RETRIES: usize = 3;

/// The oracles of one run. Built once, then shared by reference
/// with every stage that needs them.
pub struct Oracles {
    pub semantic: Box<dyn SemanticOracle>,
    pub entities: Box<dyn EntityOracle>,
}

impl Oracles {
    pub fn from_config(config: &RankConfig) -> Result<Self> {
        let semantic: Box<dyn SemanticOracle> = match &config.embeddings {
            Some(e) => {
                tracing::info!("Using embeddings model '{}' at '{}'", e.model, e.base_url);
                Box::new(OpenAiEmbedder::new(OpenAiSettings {
                    api_key:     e.api_key.clone(),
                    base_url:    e.base_url.clone(),
                    model:       e.model.clone(),
                    timeout:     Duration::from_secs(e.timeout_secs.max(1)),
                    max_retries: EMBEDDING_RETRIES,
                })?)
            }
            None => Box::new(HashedEmbedder::default()),
        };

        let entities = HeuristicRecognizer::with_tokenizer_file(config.tokenizer_path.as_deref())?;
        Ok(Self { semantic, entities: Box::new(entities) })
    }
}

// ─── RankUseCase ─────────────────────────────────────────────────────────────
pub struct RankUseCase {
    config: RankConfig,
    tuning: Tuning,
}

impl RankUseCase {
    /// Load the tuning file named in `config`, if any.
    pub fn new(config: RankConfig) -> Result<Self> {
        let tuning = TuningStore::load_or_default(config.tuning_path.as_deref())?;
        Ok(Self::with_tuning(config, tuning))
    }

    pub fn with_tuning(config: RankConfig, tuning: Tuning) -> Self {
        Self { config, tuning }
    }

    /// Run end to end and write the report.
    /// Returns the report path, or `None` when no section was found.
    pub fn execute(&self) -> Result<Option<PathBuf>> {
        let oracles = Oracles::from_config(&self.config)?;

        match self.run(oracles.semantic.as_ref(), oracles.entities.as_ref())? {
            Some(report) => {
                let path = ReportWriter::new(&self.config.output_dir).write(&report)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    /// Build the report without writing it.
    pub fn run(
        &self,
        semantic: &dyn SemanticOracle,
        entities: &dyn EntityOracle,
    ) -> Result<Option<RunReport>> {
        let cfg   = &self.config;
        let query = Query::new(cfg.persona.as_str(), cfg.job.as_str());

        // ── Step 1: Discover documents ───────────────────────────────────────
        let documents = DocumentCatalog::new(&cfg.input_dir)
            .scan()
            .context("Cannot list input documents")?;

        // ── Step 2: Extract + segment, one document per task ──────────────────
        let sections = self.load_sections(&documents);
        if sections.is_empty() {
            tracing::warn!(
                "No sections found in {} documents; no report written",
                documents.len()
            );
            return Ok(None);
        }
        tracing::info!("Scoring {} sections for: {}", sections.len(), query);

        // ── Step 3: Score ─────────────────────────────────────────────────────
        let scorer = RelevanceScorer::new(semantic, entities, self.tuning.scoring.clone());
        let scored = scorer.score(&sections, &query);

        // ── Step 4: Select ────────────────────────────────────────────────────
        let picks = DiversitySelector::new().select(&scored, cfg.top_k);
        tracing::info!("Selected {} sections (top_k = {})", picks.len(), cfg.top_k);

        // ── Step 5: Refine (parallel) ─────────────────────────────────────────
        let refiner = TextRefiner::new(entities, self.tuning.refiner.clone());
        let refined: Vec<String> = picks
            .par_iter()
            .map(|&i| refiner.refine(scored[i].section))
            .collect();

        // ── Step 6: Assemble ──────────────────────────────────────────────────
        let extracted_sections = picks
            .iter()
            .enumerate()
            .map(|(rank, &i)| {
                let section = scored[i].section;
                let signals = &scored[i].signals;
                tracing::debug!(
                    "#{} '{}' / '{}' composite {:.4} (semantic {:.4}, lexical {:.4}, entity {:.4}, quality {:.4})",
                    rank + 1, section.document, section.title, scored[i].composite,
                    signals.semantic, signals.lexical, signals.entity, signals.quality
                );
                ExtractedSectionRecord {
                    document:        section.document.clone(),
                    section_title:   section.title.clone(),
                    importance_rank: rank + 1,
                    page_number:     section.page,
                }
            })
            .collect();

        let subsection_analysis = picks
            .iter()
            .zip(refined)
            .map(|(&i, refined_text)| RefinedSectionRecord {
                document:     scored[i].section.document.clone(),
                refined_text,
                page_number:  scored[i].section.page,
            })
            .collect();

        Ok(Some(RunReport {
            metadata: RunMetadata {
                input_documents:      documents.iter().map(|d| d.id.clone()).collect(),
                persona:              query.persona().to_string(),
                job_to_be_done:       query.job().to_string(),
                processing_timestamp: utc_timestamp(),
            },
            extracted_sections,
            subsection_analysis,
        }))
    }

    /// Sections of every readable document, in document order.
    fn load_sections(&self, documents: &[DocumentEntry]) -> Vec<Section> {
        let sources   = SpanSources::new();
        let segmenter = SectionSegmenter::new(self.tuning.segmenter.clone());

        let per_document: Vec<Vec<Section>> = documents
            .par_iter()
            .map(|entry| {
                match sources.for_kind(entry.kind).extract(&entry.path) {
                    Ok(fragments) => {
                        let sections = segmenter.segment(&entry.id, &fragments);
                        tracing::info!("Parsed '{}': {} sections", entry.id, sections.len());
                        sections
                    }
                    Err(e) => {
                        tracing::warn!("Skipping '{}': {:#}", entry.id, e);
                        Vec::new()
                    }
                }
            })
            .collect();

        per_document.into_iter().flatten().collect()
    }
}

/// Current UTC time as ISO-8601 with microseconds and no offset.
fn utc_timestamp() -> String {
    chrono::Utc::now()
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::testing::{FixedSemantic, PlainEntities};
    use std::fs;
    use std::path::Path;

    fn write_spans(dir: &Path, name: &str, sections: &[(&str, &str)]) {
        let fragments: Vec<serde_json::Value> = sections
            .iter()
            .flat_map(|(title, body)| {
                [
                    serde_json::json!({ "text": title, "font_size": 16.0, "bold": true, "page": 1 }),
                    serde_json::json!({ "text": body, "font_size": 11.0, "bold": false, "page": 1 }),
                ]
            })
            .collect();
        fs::write(dir.join(name), serde_json::to_string(&fragments).unwrap()).unwrap();
    }

    fn config(input: &Path, output: &Path, top_k: usize) -> RankConfig {
        RankConfig {
            input_dir:      input.to_path_buf(),
            output_dir:     output.to_path_buf(),
            persona:        "Traveller".into(),
            job:            "Relax for a weekend".into(),
            top_k,
            tuning_path:    None,
            tokenizer_path: None,
            embeddings:     None,
        }
    }

    #[test]
    fn test_semantically_closer_document_wins() {
        let tmp = tempfile::tempdir().unwrap();
        write_spans(tmp.path(), "a.spans.json", &[("Beaches", "warm sandy coast.")]);
        write_spans(tmp.path(), "b.spans.json", &[("Cliffs", "cold rocky shore.")]);

        let semantic = FixedSemantic::new()
            .with_score("warm sandy coast.", 0.9)
            .with_score("cold rocky shore.", 0.1);
        let entities = PlainEntities::new();
        let use_case = RankUseCase::with_tuning(config(tmp.path(), tmp.path(), 1), Tuning::default());

        let report = use_case.run(&semantic, &entities).unwrap().unwrap();
        assert_eq!(report.extracted_sections.len(), 1);
        assert_eq!(report.extracted_sections[0].document, "a");
        assert_eq!(report.extracted_sections[0].section_title, "Beaches");
        assert_eq!(report.extracted_sections[0].importance_rank, 1);
        assert_eq!(report.subsection_analysis[0].refined_text, "warm sandy coast.");
        assert_eq!(report.metadata.input_documents, vec!["a", "b"]);
    }

    #[test]
    fn test_single_document_yields_one_section() {
        let tmp = tempfile::tempdir().unwrap();
        write_spans(
            tmp.path(),
            "guide.json",
            &[
                ("Beaches", "sandy coves near the old town."),
                ("Markets", "fresh produce every morning."),
                ("Museums", "modern art and local history."),
            ],
        );

        let semantic = FixedSemantic::new().with_default(0.4);
        let entities = PlainEntities::new().with_entities(1);
        let use_case = RankUseCase::with_tuning(config(tmp.path(), tmp.path(), 5), Tuning::default());

        let report = use_case.run(&semantic, &entities).unwrap().unwrap();
        assert_eq!(report.extracted_sections.len(), 1);
        assert_eq!(report.subsection_analysis.len(), 1);
        assert_eq!(report.extracted_sections[0].document, "guide.json");
    }

    #[test]
    fn test_malformed_document_is_skipped_but_listed() {
        let tmp = tempfile::tempdir().unwrap();
        write_spans(tmp.path(), "good.spans.json", &[("Food", "local dishes to try.")]);
        fs::write(tmp.path().join("bad.json"), r#"[{"text": "no size"}]"#).unwrap();

        let use_case = RankUseCase::with_tuning(config(tmp.path(), tmp.path(), 5), Tuning::default());
        let report = use_case
            .run(&FixedSemantic::new(), &PlainEntities::new())
            .unwrap()
            .unwrap();

        assert_eq!(report.metadata.input_documents, vec!["bad.json", "good"]);
        assert_eq!(report.extracted_sections.len(), 1);
        assert_eq!(report.extracted_sections[0].document, "good");
    }

    #[test]
    fn test_no_sections_means_no_report() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        fs::write(tmp.path().join("empty.json"), "[]").unwrap();

        let use_case = RankUseCase::with_tuning(config(tmp.path(), &out, 5), Tuning::default());
        assert!(use_case.run(&FixedSemantic::new(), &PlainEntities::new()).unwrap().is_none());
        assert!(use_case.execute().unwrap().is_none());
        assert!(!out.join("output.json").exists());
    }

    #[test]
    fn test_execute_writes_report() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        write_spans(tmp.path(), "a.json", &[("Beaches", "Sandy beaches near Nice.")]);

        let use_case = RankUseCase::new(config(tmp.path(), &out, 3)).unwrap();
        let path     = use_case.execute().unwrap().unwrap();

        let report = ReportWriter::read(&path).unwrap();
        assert_eq!(report.metadata.persona, "Traveller");
        assert_eq!(report.metadata.job_to_be_done, "Relax for a weekend");
        assert_eq!(report.extracted_sections[0].page_number, 1);
        // e.g. 2025-06-01T12:00:00.123456
        assert_eq!(report.metadata.processing_timestamp.len(), 26);
    }

    #[test]
    fn test_missing_input_dir_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let use_case = RankUseCase::with_tuning(
            config(&tmp.path().join("missing"), tmp.path(), 5),
            Tuning::default(),
        );
        assert!(use_case.run(&FixedSemantic::new(), &PlainEntities::new()).is_err());
    }

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }
}
