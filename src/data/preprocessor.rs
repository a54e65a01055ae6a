// ============================================================
// Layer 4: Fragment Text Preprocessor
// ============================================================
// Cleans the raw text of one fragment before segmentation.
//
// Layout extractors and Word runs often carry:
//   - Non-breaking spaces (U+00A0)
//   - Zero-width spaces (U+200B) and byte order marks
//   - Tabs, carriage returns and stray newlines inside a run
//   - Control characters from special formatting
//   - Runs of spaces left by justification
//
// A fragment is a single line of text, so every whitespace
// variant becomes one plain space.
//
// Cleaning steps (applied in order):
//   1. Map whitespace variants and control characters to a space
//   2. Collapse consecutive spaces into one
//   3. Trim both ends
//
// Reference: Rust Book §8 (Strings in Rust)

pub struct Preprocessor;

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self
    }

    /// Clean one fragment's text into a single trimmed line.
    pub fn clean_fragment(&self, text: &str) -> String {
        let mut out        = String::with_capacity(text.len());
        let mut last_space = true;

        for c in text.chars() {
            let c = match c {
                '\t' | '\r' | '\n' => ' ',
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            };

            if c.is_whitespace() {
                // Leading whitespace is dropped because last_space starts true
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        // At most one trailing space can remain
        if out.ends_with(' ') {
            out.pop();
        }
        out
    }
}

/// Implement Default so Preprocessor can be created with Preprocessor::default()
impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
