// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal (a ranking run, or inspecting one document's sections).
//
// Rules for this layer:
//   - No scoring math here (that's the ranking layer)
//   - No UI or printing here (that's Layer 1)
//   - No direct file parsing (that's Layer 4 and 6)
//   - Only workflow coordination

// The full persona-driven ranking run
pub mod rank_use_case;

// Segment one document for inspection
pub mod sections_use_case;
