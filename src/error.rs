//! Error types for the handler pipeline.

use thiserror::Error;

/// Fatal errors that stop a handler run.
///
/// Template failures are not represented here: they degrade the description
/// and never abort a run (see [`crate::template::TemplateError`]).
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The event read from stdin could not be used.
    #[error("invalid event: {0}")]
    Event(String),

    /// The message could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The webhook request did not complete.
    #[error("transport error: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = HandlerError::Config("--webhook-url is required".to_string());
        assert_eq!(err.to_string(), "configuration error: --webhook-url is required");
    }

    #[test]
    fn test_transport_error_display() {
        let err = HandlerError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn test_serialization_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: HandlerError = serde_err.into();
        assert!(err.to_string().starts_with("serialization error:"));
    }
}
