//! Configuration types deserialized from TOML.

use serde::Deserialize;

/// The project manifest parsed from `kiln.toml`.
///
/// Names the source files that make up one build configuration and where
/// their outputs go. All paths are relative to the manifest's directory.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Core project settings.
    pub project: ProjectMeta,
    /// Output settings.
    #[serde(default)]
    pub emit: EmitConfig,
}

/// The `[project]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// Directory that output paths are computed relative to.
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
    /// Directory outputs are written into.
    #[serde(default)]
    pub out_dir: String,
    /// The root source files of the program.
    #[serde(default)]
    pub files: Vec<String>,
}

fn default_root_dir() -> String {
    ".".to_string()
}

/// The `[emit]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmitConfig {
    /// Skip writing outputs when the program has errors.
    #[serde(default)]
    pub no_emit_on_error: bool,
    /// Replacement extension for emitted files (without the dot).
    #[serde(default)]
    pub extension: Option<String>,
}

/// Worker process settings, read from the file given with `--config`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The `[logging]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default level filter (`trace`, `debug`, `info`, `warn`, `error`).
    #[serde(default = "default_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}
