//! Error types for engine construction.

use std::path::PathBuf;

use kiln_config::ConfigError;
use kiln_session::SessionError;

/// Errors that prevent an engine from being constructed.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The argument list could not be parsed.
    #[error("invalid arguments: {0}")]
    Arguments(String),

    /// The project manifest could not be loaded.
    #[error("{path}: {source}")]
    Config {
        /// The manifest path.
        path: PathBuf,
        /// The underlying configuration error.
        source: ConfigError,
    },
}

impl From<EngineError> for SessionError {
    fn from(err: EngineError) -> Self {
        SessionError::configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_manifest() {
        let err = EngineError::Config {
            path: PathBuf::from("app/kiln.toml"),
            source: ConfigError::MissingField("project.name".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "app/kiln.toml: missing required field: project.name"
        );
    }

    #[test]
    fn converts_to_configuration_error() {
        let err: SessionError = EngineError::Arguments("no --project".to_string()).into();
        assert!(matches!(err, SessionError::Configuration { message } if message.contains("no --project")));
    }
}
