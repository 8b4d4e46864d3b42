//! Delimiter balance checking.
//!
//! The check tracks `()`, `[]` and `{}` while skipping string literals
//! (`"`, `'`, `` ` ``), line comments (`//`) and block comments (`/* */`).

use kiln_diagnostics::{Category, Diagnostic, DiagnosticCode};

use crate::source::SourceText;

/// A delimiter was opened and never closed.
pub const UNCLOSED_DELIMITER: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);
/// A closing delimiter with no opener.
pub const UNEXPECTED_CLOSER: DiagnosticCode = DiagnosticCode::new(Category::Error, 102);
/// A closing delimiter that does not match the innermost opener.
pub const MISMATCHED_DELIMITER: DiagnosticCode = DiagnosticCode::new(Category::Error, 103);
/// The file ends inside a block comment or string literal.
pub const UNTERMINATED_REGION: DiagnosticCode = DiagnosticCode::new(Category::Error, 104);

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    LineComment,
    BlockComment,
    Str(u8),
}

fn closer_for(open: u8) -> u8 {
    match open {
        b'(' => b')',
        b'[' => b']',
        _ => b'}',
    }
}

/// Checks `source` and returns one diagnostic per problem found.
///
/// Scanning stops at the first mismatched closer, since everything after it
/// would only report follow-on errors.
pub fn check_delimiters(source: &SourceText) -> Vec<Diagnostic> {
    let bytes = source.content.as_bytes();
    let mut diagnostics = Vec::new();
    let mut open: Vec<(u8, u32)> = Vec::new();
    let mut state = Scan::Code;
    let mut region_start = 0u32;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            Scan::Code => match b {
                b'/' if next == Some(b'/') => {
                    state = Scan::LineComment;
                    i += 1;
                }
                b'/' if next == Some(b'*') => {
                    state = Scan::BlockComment;
                    region_start = i as u32;
                    i += 1;
                }
                b'"' | b'\'' | b'`' => {
                    state = Scan::Str(b);
                    region_start = i as u32;
                }
                b'(' | b'[' | b'{' => open.push((b, i as u32)),
                b')' | b']' | b'}' => match open.pop() {
                    None => diagnostics.push(
                        Diagnostic::error(
                            UNEXPECTED_CLOSER,
                            format!("unexpected closing delimiter '{}'", b as char),
                        )
                        .at(source.location(i as u32)),
                    ),
                    Some((opener, _)) if closer_for(opener) == b => {}
                    Some((opener, at)) => {
                        let opened = source.location(at);
                        diagnostics.push(
                            Diagnostic::error(
                                MISMATCHED_DELIMITER,
                                format!(
                                    "expected '{}' but found '{}'",
                                    closer_for(opener) as char,
                                    b as char
                                ),
                            )
                            .at(source.location(i as u32))
                            .with_note(format!("'{}' opened at {opened}", opener as char)),
                        );
                        return diagnostics;
                    }
                },
                _ => {}
            },
            Scan::LineComment => {
                if b == b'\n' {
                    state = Scan::Code;
                }
            }
            Scan::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    state = Scan::Code;
                    i += 1;
                }
            }
            Scan::Str(quote) => {
                if b == b'\\' {
                    i += 1;
                } else if b == quote {
                    state = Scan::Code;
                }
            }
        }
        i += 1;
    }

    let unterminated = match state {
        Scan::BlockComment => Some("block comment"),
        Scan::Str(_) => Some("string literal"),
        Scan::Code | Scan::LineComment => None,
    };
    if let Some(region) = unterminated {
        diagnostics.push(
            Diagnostic::warning(UNTERMINATED_REGION, format!("unterminated {region}"))
                .at(source.location(region_start)),
        );
    }

    for (opener, at) in open {
        diagnostics.push(
            Diagnostic::error(
                UNCLOSED_DELIMITER,
                format!("unclosed delimiter '{}'", opener as char),
            )
            .at(source.location(at)),
        );
    }
    diagnostics
}
