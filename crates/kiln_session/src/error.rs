//! Error types for session management.

/// Errors surfaced to the dispatcher's caller.
///
/// Diagnostics are not errors: a request whose program has type or emit
/// errors still completes with a failing [`Verdict`](crate::Verdict).
/// Superseded requests are not errors either; see
/// [`Dispatch::Superseded`](crate::Dispatch::Superseded).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The engine could not be constructed from the request's arguments.
    ///
    /// No session is cached when this happens.
    #[error("invalid build configuration: {message}")]
    Configuration {
        /// The engine's description of the problem.
        message: String,
    },
}

impl SessionError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
