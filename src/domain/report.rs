// ============================================================
// Layer 3: Report Domain Types
// ============================================================
// The data handed to the report writer at the end of a run.
// Field names match the JSON keys of output.json.

use serde::{Deserialize, Serialize};

/// One selected section, in selection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSectionRecord {
    pub document: String,
    pub section_title: String,
    /// 1-based position in the selection
    pub importance_rank: usize,
    pub page_number: u32,
}

/// The refined extract of one selected section, same order as
/// the extracted records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedSectionRecord {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}

/// Run metadata written at the top of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Every discovered document, parsed or not
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    /// UTC, ISO-8601 without offset
    pub processing_timestamp: String,
}

/// The complete result object of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub metadata: RunMetadata,
    pub extracted_sections: Vec<ExtractedSectionRecord>,
    pub subsection_analysis: Vec<RefinedSectionRecord>,
}
