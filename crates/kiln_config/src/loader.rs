//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{ProjectConfig, WorkerConfig};
use std::path::Path;

/// Loads and validates a project manifest from `path`.
pub fn load_project(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_project_from_str(&content)
}

/// Parses and validates a project manifest from a string.
pub fn load_project_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_project(&config)?;
    Ok(config)
}

/// Loads worker settings from `path`.
pub fn load_worker_config(path: &Path) -> Result<WorkerConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_worker_config_from_str(&content)
}

/// Parses worker settings from a string.
pub fn load_worker_config_from_str(content: &str) -> Result<WorkerConfig, ConfigError> {
    let config: WorkerConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    match config.logging.level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(config),
        other => Err(ConfigError::ValidationError(format!(
            "unknown log level '{other}'"
        ))),
    }
}

fn validate_project(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.out_dir.is_empty() {
        return Err(ConfigError::MissingField("project.out_dir".to_string()));
    }
    if config.project.files.is_empty() {
        return Err(ConfigError::ValidationError(
            "project.files must list at least one file".to_string(),
        ));
    }
    if let Some(ext) = &config.emit.extension {
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            return Err(ConfigError::ValidationError(format!(
                "emit.extension '{ext}' must be a bare extension"
            )));
        }
    }
    Ok(())
}
