//! Reference compilation engine for the kiln worker.
//!
//! The engine is driven by a `kiln.toml` project manifest. It watches the
//! manifest and every source file it lists, checks sources for delimiter
//! balance, and emits each file into the output directory. Watch callbacks
//! only queue work; the queue is applied when the session asks the engine
//! to drain it, so invalidations never race with an emit.

#![warn(missing_docs)]

pub mod args;
pub mod check;
pub mod engine;
pub mod error;
pub mod layout;
pub mod program;
pub mod source;

pub use args::EngineArgs;
pub use engine::{SourceEngine, SourceEngineFactory};
pub use error::EngineError;
pub use layout::Layout;
pub use program::SourceProgram;
pub use source::{SourceState, SourceText};
