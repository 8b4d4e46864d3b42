//! Diagnostic creation and text rendering.
//!
//! This crate provides structured [`Diagnostic`] messages with severity levels,
//! codes, and optional source [`Location`]s, and [`format_diagnostics`] to
//! turn them into the human-readable text reported for a failed request.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod location;
pub mod renderer;
pub mod severity;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use location::Location;
pub use renderer::{format_diagnostics, DiagnosticRenderer, TextRenderer};
pub use severity::Severity;
