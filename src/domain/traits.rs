// ============================================================
// Layer 3: Core Traits (Abstractions)
// ============================================================
// The external collaborators of the ranking core, expressed as
// traits so the application layer only depends on behaviour:
//
//   SpanSource      → JsonSpanSource, DocxSpanSource   (data layer)
//   SemanticOracle  → HashedEmbedder, OpenAiEmbedder   (ml layer)
//   EntityOracle    → HeuristicRecognizer              (ml layer)
//
// Oracles are shared across rayon worker threads, hence the
// Send + Sync bounds.

use anyhow::Result;
use std::path::Path;

use crate::domain::fragment::Fragment;

// ─── SpanSource ───────────────────────────────────────────────────────────────
/// Anything that can turn one document file into styled fragments.
pub trait SpanSource: Send + Sync {
    /// Extract the ordered fragments of the document at `path`.
    /// Malformed or unreadable input is an error for that document only.
    fn extract(&self, path: &Path) -> Result<Vec<Fragment>>;
}

// ─── SemanticOracle ───────────────────────────────────────────────────────────
/// Scalar semantic similarity between two texts.
pub trait SemanticOracle: Send + Sync {
    /// Cosine-range similarity in [-1, 1].
    fn similarity(&self, text: &str, query: &str) -> Result<f64>;
}

// ─── EntityOracle ─────────────────────────────────────────────────────────────
/// Named-entity counting, tokenisation and sentence segmentation.
/// All three must be deterministic for a fixed implementation.
pub trait EntityOracle: Send + Sync {
    /// Number of named entities recognised in `text`.
    fn entity_count(&self, text: &str) -> Result<usize>;

    /// Number of tokens in `text`.
    fn token_count(&self, text: &str) -> Result<usize>;

    /// Sentences of `text` in order, trimmed, none empty.
    fn sentence_split(&self, text: &str) -> Result<Vec<String>>;
}
