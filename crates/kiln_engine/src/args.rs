//! The engine's command-line surface, as carried in each request.

use std::path::PathBuf;

use clap::Parser;

use crate::error::EngineError;

/// Arguments understood by the reference engine.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "kiln-engine", no_binary_name = true, disable_help_flag = true)]
pub struct EngineArgs {
    /// Path to the `kiln.toml` project manifest.
    #[arg(long)]
    pub project: PathBuf,

    /// Output directory, overriding `project.out_dir`.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Check only; never write outputs.
    #[arg(long)]
    pub no_emit: bool,
}

impl EngineArgs {
    /// Parses a request's argument list. Blank entries are ignored.
    pub fn parse_list(arguments: &[String]) -> Result<Self, EngineError> {
        let args = arguments.iter().filter(|a| !a.trim().is_empty());
        Self::try_parse_from(args).map_err(|e| EngineError::Arguments(e.to_string().trim().to_string()))
    }
}
