// ============================================================
// Layer 3: Section Domain Types
// ============================================================
// A Section is the span of a document between one heading and
// the next. A ScoredSection pairs it with the four raw relevance
// signals and the composite score of one ranking run.

use serde::{Deserialize, Serialize};

/// A titled, contiguous span of one document's text.
///
/// Both `title` and `text` are non-empty; the segmenter never
/// emits a section without body text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Identifier of the source document (its file name)
    pub document: String,

    /// Text of the fragment that was detected as the heading
    pub title: String,

    /// Body fragments joined with single spaces
    pub text: String,

    /// Page of the heading fragment
    pub page: u32,
}

impl Section {
    pub fn new(
        document: impl Into<String>,
        title:    impl Into<String>,
        text:     impl Into<String>,
        page:     u32,
    ) -> Self {
        Self {
            document: document.into(),
            title:    title.into(),
            text:     text.into(),
            page,
        }
    }
}

/// Raw (un-normalised) relevance signals of one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SignalScores {
    pub semantic: f64,
    pub lexical:  f64,
    pub entity:   f64,
    pub quality:  f64,
}

/// A section with its signals and weighted composite score.
/// Lives only for the duration of one ranking run.
#[derive(Debug, Clone)]
pub struct ScoredSection<'a> {
    pub section:   &'a Section,
    pub signals:   SignalScores,
    pub composite: f64,
}
