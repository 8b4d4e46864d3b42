//! Tracing subscriber setup.
//!
//! Everything goes to stderr; stdout carries protocol responses only.
//!
//! Precedence, highest first:
//! - `RUST_LOG` replaces the level filter entirely.
//! - `--log-level` / `--log-format` on the command line.
//! - `LOG_FORMAT` in the environment (`json`, `pretty`).
//! - The `[logging]` table of the `--config` file.

use kiln_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The effective logging settings after all overrides are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Level filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl LogSettings {
    /// Applies command-line and environment overrides to the file settings.
    pub fn resolve(
        config: &LoggingConfig,
        cli_level: Option<&str>,
        cli_format: Option<LogFormat>,
        env_format: Option<&str>,
    ) -> Self {
        Self {
            level: cli_level.unwrap_or(&config.level).to_string(),
            format: cli_format
                .or_else(|| env_format.and_then(parse_format))
                .unwrap_or(config.format),
        }
    }
}

fn parse_format(value: &str) -> Option<LogFormat> {
    match value.to_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" | "human" => Some(LogFormat::Pretty),
        _ => None,
    }
}

/// Installs the global subscriber. Call once, before the first request.
pub fn initialize(settings: &LogSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    match settings.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
