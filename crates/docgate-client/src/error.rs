//! Error types for docgate-client

use thiserror::Error;

/// Result type alias for docgate-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving access tokens
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from docgate-core (configuration, lifecycle)
    #[error(transparent)]
    Core(#[from] docgate_core::Error),

    /// The authority service could not be reached or did not answer in time.
    #[error("Transport error: {message}")]
    Transport {
        /// What failed
        message: String,
        /// Underlying HTTP failure, if any
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The authority service answered with a non-success status.
    #[error("Couldn't fetch user's access tokens from authority service: {status}; {body}")]
    Resolution {
        /// HTTP status code
        status: u16,
        /// Full response body
        body: String,
    },
}

impl Error {
    /// Creates a transport error wrapping an HTTP failure.
    pub fn transport(context: impl AsRef<str>, source: reqwest::Error) -> Self {
        Error::Transport {
            message: format!("{}: {source}", context.as_ref()),
            source: Some(source),
        }
    }

    /// Creates a transport error with no underlying HTTP failure.
    pub fn transport_msg(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a resolution error.
    pub fn resolution(status: u16, body: impl Into<String>) -> Self {
        Error::Resolution {
            status,
            body: body.into(),
        }
    }

    /// Whether this error reflects deployment or wiring problems rather
    /// than a single failed request.
    pub fn is_fatal_configuration(&self) -> bool {
        match self {
            Error::Core(e) => e.is_fatal_configuration(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_message_has_status_and_body() {
        let err = Error::resolution(503, "service unavailable");
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("service unavailable"));
        assert!(!err.is_fatal_configuration());
    }

    #[test]
    fn test_core_errors_are_transparent() {
        let err: Error = docgate_core::Error::config("authority base URL is not configured").into();
        assert_eq!(
            err.to_string(),
            "Configuration error: authority base URL is not configured"
        );
        assert!(err.is_fatal_configuration());
    }

    #[test]
    fn test_transport_without_source() {
        let err = Error::transport_msg("timed out");
        assert_eq!(err.to_string(), "Transport error: timed out");
        assert!(std::error::Error::source(&err).is_none());
    }
}
