// ============================================================
// Layer 3: Query Domain Type
// ============================================================
// The persona and job are folded into one descriptive string
// which every section is compared against.

use std::fmt;

/// The comparison target for the semantic and lexical signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    persona: String,
    job:     String,
    text:    String,
}

impl Query {
    /// Build the query from a persona and a job-to-be-done.
    ///
    /// Example:
    ///   Query::new("Travel planner", "Plan a 4-day trip")
    ///   → "Persona: Travel planner. Task: Plan a 4-day trip"
    pub fn new(persona: impl Into<String>, job: impl Into<String>) -> Self {
        let persona = persona.into();
        let job     = job.into();
        let text    = format!("Persona: {persona}. Task: {job}");
        Self { persona, job, text }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    /// The full descriptive string
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_text_format() {
        let q = Query::new("HR professional", "Create onboarding forms");
        assert_eq!(q.as_str(), "Persona: HR professional. Task: Create onboarding forms");
        assert_eq!(q.persona(), "HR professional");
        assert_eq!(q.job(), "Create onboarding forms");
    }
}
