//! Formats diagnostics and writes them to the worker's log channel.

use kiln_diagnostics::{format_diagnostics, Diagnostic, DiagnosticRenderer, TextRenderer};
use tracing::warn;

/// Renders diagnostics to text and logs them.
///
/// The same text is kept on the failing [`Verdict`](crate::Verdict) so the
/// transport can hand it back with the response.
pub struct DiagnosticsReporter {
    renderer: Box<dyn DiagnosticRenderer + Send>,
}

impl DiagnosticsReporter {
    /// Creates a reporter using the default [`TextRenderer`].
    pub fn new() -> Self {
        Self::with_renderer(TextRenderer::new())
    }

    /// Creates a reporter with a custom renderer.
    pub fn with_renderer(renderer: impl DiagnosticRenderer + Send + 'static) -> Self {
        Self {
            renderer: Box::new(renderer),
        }
    }

    /// Formats `diagnostics`, one per line. Empty input gives empty text.
    pub fn format(&self, diagnostics: &[Diagnostic]) -> String {
        format_diagnostics(diagnostics, self.renderer.as_ref())
    }

    /// Writes formatted text to the log. Does nothing for empty text.
    pub fn report(&self, text: &str) {
        let text = text.trim_end();
        if text.is_empty() {
            return;
        }
        warn!(target: "kiln::diagnostics", "\n{text}");
    }
}

impl Default for DiagnosticsReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_diagnostics::{Category, DiagnosticCode, Location};

    #[test]
    fn format_uses_canonical_locations() {
        let reporter = DiagnosticsReporter::new();
        let diag = Diagnostic::error(DiagnosticCode::new(Category::Error, 101), "unclosed '('")
            .at(Location::new("src/a.ts", 1, 12));
        assert_eq!(
            reporter.format(&[diag]),
            "src/a.ts:1:12 - error E101: unclosed '('\n"
        );
    }

    #[test]
    fn custom_new_line() {
        let reporter = DiagnosticsReporter::with_renderer(TextRenderer::with_new_line("\r\n"));
        let diag = Diagnostic::error(DiagnosticCode::new(Category::Config, 1), "bad");
        assert!(reporter.format(&[diag]).ends_with("\r\n"));
    }

    #[test]
    fn empty_reports_nothing() {
        let reporter = DiagnosticsReporter::new();
        assert_eq!(reporter.format(&[]), "");
        reporter.report("");
    }
}
