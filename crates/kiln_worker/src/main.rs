//! kiln worker: a persistent compilation worker.
//!
//! Started with `--persistent_worker`, it reads newline-delimited JSON work
//! requests on stdin and answers each on stdout, keeping one incremental
//! session alive between builds. Without the flag it performs a single
//! build from an `@`-prefixed arguments file and exits.

#![warn(missing_docs)]

mod error;
mod logging;
mod oneshot;
mod protocol;
mod worker;

use std::io;
use std::path::Path;
use std::process;

use clap::{Parser, ValueEnum};
use kiln_config::{LogFormat, WorkerConfig};
use kiln_engine::SourceEngineFactory;
use kiln_session::SessionManager;
use tracing::info;

use crate::error::WorkerError;
use crate::logging::LogSettings;

/// Persistent compilation worker.
#[derive(Parser, Debug)]
#[command(name = "kiln-worker", version, about = "Persistent compilation worker")]
pub struct Cli {
    /// Serve requests on stdin until it closes.
    #[arg(long = "persistent_worker")]
    pub persistent_worker: bool,

    /// Log output format.
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormatArg>,

    /// Log level when `RUST_LOG` is unset.
    #[arg(long, value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: Option<String>,

    /// Path to a worker configuration file.
    #[arg(long)]
    pub config: Option<String>,

    /// Remaining arguments; in standalone mode the last is the `@` arguments file.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub arguments: Vec<String>,
}

/// Log format as accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable output.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32, WorkerError> {
    let config = match &cli.config {
        Some(path) => kiln_config::load_worker_config(Path::new(path))?,
        None => WorkerConfig::default(),
    };
    let env_format = std::env::var("LOG_FORMAT").ok();
    let settings = LogSettings::resolve(
        &config.logging,
        cli.log_level.as_deref(),
        cli.log_format.map(LogFormat::from),
        env_format.as_deref(),
    );
    logging::initialize(&settings);

    let mut manager = SessionManager::new(SourceEngineFactory::new());
    if cli.persistent_worker {
        info!("serving work requests");
        worker::serve(&mut manager, io::stdin().lock(), io::stdout().lock())?;
        return Ok(0);
    }

    let args_file = cli.arguments.last().ok_or(WorkerError::MissingArgsFile)?;
    oneshot::run(&mut manager, args_file)
}
