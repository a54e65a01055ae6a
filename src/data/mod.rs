// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything from files on disk to titled sections.
//
// The pipeline flows in this order:
//
//   input directory
//       │
//       ▼
//   DocumentCatalog   → finds span files and .docx documents
//       │
//       ▼
//   SpanSources       → styled fragments per document
//       │              (Preprocessor cleans each fragment)
//       ▼
//   SectionSegmenter  → titled sections per document
//
// terms.rs holds the word analysis shared by the lexical signal
// and the hashed embedder.

/// Finds input documents and reads .docx files
pub mod loader;

/// Reads external span JSON files
pub mod spans;

/// Cleans fragment text
pub mod preprocessor;

/// Splits fragment streams into sections
pub mod segmenter;

/// Lowercased, stop-word-free term analysis
pub mod terms;
