//! Errors that end the worker process.

use std::io;
use std::path::PathBuf;

use kiln_config::ConfigError;
use kiln_session::SessionError;

/// Failures outside the per-request protocol.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// Standalone mode was started without an arguments file.
    #[error("no arguments file given (expected `@<file>` as the last argument)")]
    MissingArgsFile,

    /// The arguments file could not be read.
    #[error("cannot read arguments file {}: {source}", path.display())]
    ArgsFile {
        /// The file that was named.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The worker configuration file is invalid.
    #[error("worker configuration: {0}")]
    Config(#[from] ConfigError),

    /// The build could not be set up.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Reading requests or writing responses failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
