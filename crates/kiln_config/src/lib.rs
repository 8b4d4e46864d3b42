//! Parsing and validation of kiln configuration files.
//!
//! Two documents are handled here: the `kiln.toml` project manifest that the
//! reference engine is pointed at with `--project`, and the optional worker
//! configuration that controls logging.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    load_project, load_project_from_str, load_worker_config, load_worker_config_from_str,
};
pub use types::*;
