//! Text rendering of diagnostics for the worker's log channel.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string, without a
    /// trailing newline.
    fn render(&self, diag: &Diagnostic) -> String;

    /// The line terminator placed between rendered lines.
    fn new_line(&self) -> &str;
}

/// Renders diagnostics in a compact compiler-style format.
///
/// Produces output like:
/// ```text
/// src/a.ts:3:7 - error E101: unclosed '{'
///   note: the file ends before the delimiter is closed
/// ```
pub struct TextRenderer {
    new_line: String,
}

impl TextRenderer {
    /// Creates a renderer using `\n` line endings.
    pub fn new() -> Self {
        Self::with_new_line("\n")
    }

    /// Creates a renderer using the given line terminator.
    pub fn with_new_line(new_line: impl Into<String>) -> Self {
        Self {
            new_line: new_line.into(),
        }
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticRenderer for TextRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = match &diag.location {
            Some(loc) => format!("{loc} - {} {}: {}", diag.severity, diag.code, diag.message),
            None => format!("{} {}: {}", diag.severity, diag.code, diag.message),
        };
        for note in &diag.notes {
            out.push_str(&self.new_line);
            out.push_str("  note: ");
            out.push_str(note);
        }
        out
    }

    fn new_line(&self) -> &str {
        &self.new_line
    }
}

/// Formats a batch of diagnostics, one rendered diagnostic per entry.
///
/// Every entry is terminated by the renderer's line terminator. Returns an
/// empty string when `diagnostics` is empty.
pub fn format_diagnostics(diagnostics: &[Diagnostic], renderer: &dyn DiagnosticRenderer) -> String {
    let mut out = String::new();
    for diag in diagnostics {
        out.push_str(&renderer.render(diag));
        out.push_str(renderer.new_line());
    }
    out
}
