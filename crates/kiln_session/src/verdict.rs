//! The pass/fail result of one request.

use kiln_diagnostics::Diagnostic;

use crate::engine::EmitOutput;

/// Success flag plus every diagnostic behind it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Verdict {
    /// `true` iff output was emitted and no diagnostics were reported.
    pub success: bool,
    /// Pre-emit diagnostics followed by emit diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    /// Formatted diagnostic text, empty on success.
    pub report: String,
}

impl Verdict {
    /// Combines an emit result with the program's pre-emit diagnostics.
    ///
    /// A skipped emit fails the request even without diagnostics.
    pub fn assemble(emit: EmitOutput, pre_emit: Vec<Diagnostic>) -> Self {
        let success = !emit.skipped && emit.diagnostics.is_empty() && pre_emit.is_empty();
        let mut diagnostics = pre_emit;
        diagnostics.extend(emit.diagnostics);
        Self {
            success,
            diagnostics,
            report: String::new(),
        }
    }

    /// The process-style exit code for this verdict.
    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            1
        }
    }
}
