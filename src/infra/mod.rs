// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any business layer:
//
//   tokenizer_store.rs: Word splitting and token counting
//                       through the tokenizers crate, with an
//                       optional tokenizer.json from disk.
//
//   tuning_store.rs:    Saves and loads the tuning file (weights,
//                       thresholds, constants) as JSON.
//
//   report_writer.rs:   Writes output.json for a finished run.

/// Pre-tokenization and token counting
pub mod tokenizer_store;

/// Tuning file persistence
pub mod tuning_store;

/// Run report output
pub mod report_writer;
