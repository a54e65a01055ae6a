// ============================================================
// Layer 4: Section Segmenter
// ============================================================
// Turns one document's fragment stream into titled sections.
//
// Heading detection uses a single reference value for the whole
// document, the mean font size over all its fragments. Each
// fragment is checked against these rules, first match wins:
//
//   1. empty, or longer than 120 chars       → body
//   2. size >= mean + 1.0                    → heading
//   3. bold and size >= mean - 0.5           → heading
//   4. heading pattern and <= 8 words        → heading
//   5. otherwise                             → body
//
// Walking the stream, a heading closes the open section (when it
// has body text) and opens a new one. Text before the first
// heading belongs to no section and is dropped.
//
// Example with mean size 11:
//   "1. Overview" (14pt)    → heading, opens "1. Overview"
//   "Lyon is a city" (11pt) → body
//   "in France." (11pt)     → body
//   "Food" (11pt, bold)     → heading, emits
//        { title: "1. Overview", text: "Lyon is a city in France." }

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::domain::fragment::Fragment;
use crate::domain::section::Section;

/// Heading text patterns, in priority order
static HEADING_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        // "1. Coastal Adventures"
        Regex::new(r"^\d+\.\s+[A-Z][a-zA-Z\s]{2,}").expect("valid numbered heading regex"),
        // "GENERAL INFORMATION"
        Regex::new(r"^[A-Z][A-Z\s]{4,100}$").expect("valid all-caps heading regex"),
        // "Things To Do"
        Regex::new(r"^[A-Z][a-z]+(\s[A-Z][a-z]+){1,20}$").expect("valid title-case heading regex"),
        // "Where to stay"
        Regex::new(r"^[A-Z][A-Za-z\s]{2,100}$").expect("valid capitalised phrase regex"),
    ]
});

/// Thresholds for heading detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Points above the mean that make any fragment a heading
    pub size_margin: f64,
    /// Points below the mean a bold fragment may be and still be a heading
    pub bold_margin: f64,
    /// Longer fragments are never headings
    pub max_heading_chars: usize,
    /// Word limit for pattern-matched headings
    pub max_heading_words: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            size_margin:       1.0,
            bold_margin:       0.5,
            max_heading_chars: 120,
            max_heading_words: 8,
        }
    }
}

/// Splits fragment streams into sections, one document at a time.
#[derive(Debug, Clone, Default)]
pub struct SectionSegmenter {
    config: SegmenterConfig,
}

impl SectionSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Segment the fragments of the document `document`.
    ///
    /// Never mixes documents: call once per document.
    pub fn segment(&self, document: &str, fragments: &[Fragment]) -> Vec<Section> {
        if fragments.is_empty() {
            tracing::warn!("No text found in '{}'", document);
            return Vec::new();
        }

        let avg_font_size = average_font_size(fragments);

        let mut sections                         = Vec::new();
        let mut current_heading: Option<&str>    = None;
        let mut current_text                     = String::new();
        let mut current_page                     = 1u32;

        for fragment in fragments {
            if self.is_heading(fragment, avg_font_size) {
                if let Some(title) = current_heading {
                    push_section(&mut sections, document, title, &current_text, current_page);
                }
                current_heading = Some(fragment.text.trim());
                current_text.clear();
                current_page = fragment.page;
            } else {
                current_text.push(' ');
                current_text.push_str(&fragment.text);
            }
        }

        if let Some(title) = current_heading {
            push_section(&mut sections, document, title, &current_text, current_page);
        }

        tracing::debug!("Extracted {} sections from '{}'", sections.len(), document);
        sections
    }

    /// Classify one fragment against the document's mean font size.
    pub fn is_heading(&self, fragment: &Fragment, avg_font_size: f64) -> bool {
        let text = fragment.text.trim();
        let size = fragment.font_size;

        if text.is_empty() || text.chars().count() > self.config.max_heading_chars {
            return false;
        }
        if size >= avg_font_size + self.config.size_margin {
            return true;
        }
        if fragment.bold && size >= avg_font_size - self.config.bold_margin {
            return true;
        }

        text.split_whitespace().count() <= self.config.max_heading_words
            && HEADING_PATTERNS.iter().any(|re| re.is_match(text))
    }
}

/// Arithmetic mean of the fragments' font sizes (0 for none).
pub fn average_font_size(fragments: &[Fragment]) -> f64 {
    if fragments.is_empty() {
        return 0.0;
    }
    fragments.iter().map(|f| f.font_size).sum::<f64>() / fragments.len() as f64
}

fn push_section(sections: &mut Vec<Section>, document: &str, title: &str, text: &str, page: u32) {
    let text = text.trim();
    if !text.is_empty() {
        sections.push(Section::new(document, title, text, page));
    }
}
