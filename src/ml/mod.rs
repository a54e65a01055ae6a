// ============================================================
// Layer 5: ML / Oracle Layer
// ============================================================
// Implementations of the signal oracles. Nothing outside this
// layer knows how similarity or entities are computed; the rest
// of the crate only sees the SemanticOracle and EntityOracle
// traits from the domain layer.
//
//   embedder.rs   → HashedEmbedder: local, deterministic
//                   feature-hashed embeddings (default)
//   openai.rs     → OpenAiEmbedder: remote embeddings over HTTP
//   recognizer.rs → HeuristicRecognizer: entity counts, token
//                   counts and sentence boundaries

/// Feature-hashed embeddings and cosine similarity
pub mod embedder;

/// OpenAI-compatible embeddings client
pub mod openai;

/// Rule-based entity counting and sentence splitting
pub mod recognizer;

/// Oracle test doubles
#[cfg(test)]
pub mod testing;
