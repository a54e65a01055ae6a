// ============================================================
// Layer 4: Document Catalog and Word Span Source
// ============================================================
// Finds the documents of a run and turns .docx files into
// styled fragments using the docx-rs crate.
//
// Supported inputs in the input directory:
//   *.json  → span files from an external layout extractor
//   *.docx  → Word documents, read directly
// Anything else is ignored.
//
// How .docx files map to fragments:
//   Document
//     └── Paragraph          → one Fragment
//           └── Run          → text, size (half-points) and bold
//                 └── Text / Break
//
// A paragraph's font size is taken from its first run with text,
// and it is bold only when every run with text is bold. Explicit
// page breaks advance the page counter.
//
// Reference: docx-rs crate documentation

use anyhow::{Context, Result};
use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::preprocessor::Preprocessor;
use crate::data::spans::JsonSpanSource;
use crate::domain::fragment::Fragment;
use crate::domain::traits::SpanSource;

/// Word's default body size, 11pt
const DEFAULT_DOCX_FONT_SIZE: f64 = 11.0;

/// The kinds of input file a run can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    SpanJson,
    Docx,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::SpanJson),
            "docx" => Some(Self::Docx),
            _      => None,
        }
    }
}

/// One discovered input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    /// Identifier used in sections and the report
    pub id:   String,
    pub path: PathBuf,
    pub kind: DocumentKind,
}

/// Scans an input directory for supported documents.
pub struct DocumentCatalog {
    dir: PathBuf,
}

impl DocumentCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// List supported documents, sorted by file name.
    pub fn scan(&self) -> Result<Vec<DocumentEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Cannot read input directory '{}'", self.dir.display()))?
        {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            match DocumentKind::from_path(&path) {
                Some(kind) => entries.push(DocumentEntry {
                    id: document_id(&path),
                    path,
                    kind,
                }),
                None => tracing::debug!("Ignoring unsupported file '{}'", path.display()),
            }
        }

        entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        for id in duplicate_ids(&entries) {
            tracing::warn!(
                "Several files in '{}' share the document id '{}'; they count as one document",
                self.dir.display(),
                id
            );
        }
        tracing::info!("Found {} documents in '{}'", entries.len(), self.dir.display());
        Ok(entries)
    }
}

/// Identifiers that more than one entry maps to, in sorted order.
pub fn duplicate_ids(entries: &[DocumentEntry]) -> Vec<&str> {
    let mut ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    ids.sort_unstable();
    let mut dups: Vec<&str> = ids.windows(2).filter(|w| w[0] == w[1]).map(|w| w[0]).collect();
    dups.dedup();
    dups
}

/// File name, with a trailing `.spans.json` removed so span files
/// are reported under the name of the document they describe.
pub fn document_id(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    match name.strip_suffix(".spans.json") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _                              => name.to_string(),
    }
}

/// Both span sources, dispatched by document kind.
pub struct SpanSources {
    json: JsonSpanSource,
    docx: DocxSpanSource,
}

impl SpanSources {
    pub fn new() -> Self {
        Self {
            json: JsonSpanSource::new(),
            docx: DocxSpanSource::new(),
        }
    }

    pub fn for_kind(&self, kind: DocumentKind) -> &dyn SpanSource {
        match kind {
            DocumentKind::SpanJson => &self.json,
            DocumentKind::Docx     => &self.docx,
        }
    }
}

/// Reads fragments straight out of Word documents.
#[derive(Default)]
pub struct DocxSpanSource {
    preprocessor: Preprocessor,
}

impl SpanSource for DocxSpanSource {
    fn extract(&self, path: &Path) -> Result<Vec<Fragment>> {
        // A .docx file is a ZIP archive of XML parts
        let bytes = fs::read(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;

        let docx = read_docx(&bytes)
            .map_err(|e| anyhow::anyhow!("docx-rs parse error in '{}': {:?}", path.display(), e))?;

        let mut fragments = Vec::new();
        let mut page      = 1u32;

        for child in &docx.document.children {
            // Tables, images and section properties carry no body text here
            if let DocumentChild::Paragraph(para) = child {
                let (fragment, page_breaks) = self.paragraph_fragment(para, page)?;
                if let Some(fragment) = fragment {
                    fragments.push(fragment);
                }
                page += page_breaks;
            }
        }

        Ok(fragments)
    }
}

impl DocxSpanSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the fragment for one paragraph and count the page
    /// breaks inside it.
    fn paragraph_fragment(&self, para: &Paragraph, page: u32) -> Result<(Option<Fragment>, u32)> {
        let mut text        = String::new();
        let mut font_size   = None;
        let mut all_bold    = true;
        let mut page_breaks = 0u32;

        for child in &para.children {
            let ParagraphChild::Run(run) = child else {
                continue;
            };

            let mut run_text = String::new();
            for rc in &run.children {
                match rc {
                    RunChild::Text(t)  => run_text.push_str(&t.text),
                    RunChild::Tab(_)   => run_text.push(' '),
                    RunChild::Break(b) => {
                        if is_page_break(b)? {
                            page_breaks += 1;
                        }
                    }
                    _ => {}
                }
            }

            if run_text.trim().is_empty() {
                continue;
            }

            let (size, bold) = run_style(&run.run_property)?;
            font_size.get_or_insert(size);
            all_bold &= bold;
            text.push_str(&run_text);
        }

        let text = self.preprocessor.clean_fragment(&text);
        if text.is_empty() {
            return Ok((None, page_breaks));
        }

        let fragment = Fragment::new(
            text,
            font_size.unwrap_or(DEFAULT_DOCX_FONT_SIZE),
            all_bold,
            page,
        );
        Ok((Some(fragment), page_breaks))
    }
}

/// Font size in points and boldness of a run.
///
/// docx-rs keeps the property values private, so they are read
/// back through the crate's JSON representation: `sz` is in
/// half-points, `bold` a boolean.
fn run_style(props: &docx_rs::RunProperty) -> Result<(f64, bool)> {
    let value = serde_json::to_value(props).context("Cannot inspect run properties")?;

    let size = value
        .get("sz")
        .and_then(|v| v.as_f64())
        .map(|half_points| half_points / 2.0)
        .unwrap_or(DEFAULT_DOCX_FONT_SIZE);

    let bold = value
        .get("bold")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    Ok((size, bold))
}

fn is_page_break(brk: &docx_rs::Break) -> Result<bool> {
    let value = serde_json::to_value(brk).context("Cannot inspect break")?;
    Ok(value.get("breakType").and_then(|v| v.as_str()) == Some("page"))
}
