use crate::domain::Category;
use std::fmt;

/// Diagnostics for a failed generation call, retaining the raw response body
/// for triage.
#[derive(Debug, Clone)]
pub struct GenerationDiagnostics {
    pub category: Category,
    pub stage: &'static str,
    pub detail: String,
    pub raw_body: Option<String>,
}

impl fmt::Display for GenerationDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation failed (category={}, stage={}): {}",
            self.category, self.stage, self.detail
        )
    }
}

impl std::error::Error for GenerationDiagnostics {}
