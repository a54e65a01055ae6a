// ============================================================
// Layer 3: Fragment Domain Type
// ============================================================
// One styled piece of text as laid out in a source document.
// Fragments arrive in natural reading order and are never
// modified after extraction.

use serde::{Deserialize, Serialize};

/// A run of text with the typographic attributes used for
/// heading detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// The text content, already cleaned of stray whitespace
    pub text: String,

    /// Font size in points
    pub font_size: f64,

    /// Whether the fragment is rendered bold
    pub bold: bool,

    /// 1-based page number the fragment appears on
    pub page: u32,
}

impl Fragment {
    /// Create a new Fragment.
    ///
    /// Example:
    ///   let f = Fragment::new("1. Introduction", 16.0, true, 1);
    pub fn new(text: impl Into<String>, font_size: f64, bold: bool, page: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold,
            page,
        }
    }
}
