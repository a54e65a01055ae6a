// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the system works
// with: styled text fragments, titled sections, the persona query,
// and the two record lists handed to the report writer.
//
// Rules for this layer:
//   - NO file I/O or network calls
//   - NO model or tokenizer code
//   - Only plain structs, enums, and traits
//
// The traits in traits.rs are the seams where the external
// collaborators plug in (span extraction, similarity, entities).

// A styled text fragment from a document
pub mod fragment;

// A titled section and its scored form
pub mod section;

// The persona + job query
pub mod query;

// Output records and the full run report
pub mod report;

// Core abstractions implemented by the data and ml layers
pub mod traits;
