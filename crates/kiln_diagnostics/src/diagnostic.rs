//! Structured diagnostic messages with severity, codes, and locations.

use crate::code::DiagnosticCode;
use crate::location::Location;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A structured diagnostic produced by the compilation engine.
///
/// Diagnostics are the only user-visible detail of a failed request besides
/// the pass/fail verdict. A diagnostic without a location applies to the
/// build as a whole (e.g. a broken project manifest).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// Where the problem was detected, if it has a source position.
    pub location: Option<Location>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic with the given code and message.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic with the given code and message.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location: None,
            notes: Vec::new(),
        }
    }

    /// Attaches a source location.
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Error, 101);
        let diag = Diagnostic::error(code, "unclosed '{'");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "unclosed '{'");
        assert!(diag.location.is_none());
    }

    #[test]
    fn builder_methods() {
        let code = DiagnosticCode::new(Category::Error, 103);
        let diag = Diagnostic::error(code, "mismatched ')'")
            .at(Location::new("a.ts", 2, 4))
            .with_note("'[' opened at a.ts:1:9");
        assert_eq!(diag.location, Some(Location::new("a.ts", 2, 4)));
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn serde_roundtrip() {
        let diag = Diagnostic::warning(DiagnosticCode::new(Category::Config, 2), "odd")
            .at(Location::file("kiln.toml"));
        let json = serde_json::to_string(&diag).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(diag, back);
    }
}
