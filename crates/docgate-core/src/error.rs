//! Error types for docgate-core

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for docgate-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in docgate-core
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error, optionally tied to a file path.
    #[error("I/O error{}: {source}", .path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    Io {
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
        /// File involved, if known
        path: Option<PathBuf>,
    },

    /// A configuration document could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A shared resource was used outside its live window (before start-up
    /// failed or after teardown).
    #[error("Lifecycle error: resource '{resource}' is {state}")]
    Lifecycle {
        /// Name of the managed resource
        resource: String,
        /// State the resource was found in
        state: String,
    },
}

impl Error {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates an I/O error annotated with the file it concerns.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            source,
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Creates a lifecycle error for the named resource.
    pub fn lifecycle(resource: impl Into<String>, state: impl ToString) -> Self {
        Error::Lifecycle {
            resource: resource.into(),
            state: state.to_string(),
        }
    }

    /// Whether this error reflects deployment or wiring problems rather
    /// than a single failed request.
    pub fn is_fatal_configuration(&self) -> bool {
        matches!(self, Error::Config { .. } | Error::Lifecycle { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source, path: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = Error::config("authority base URL is required");
        assert_eq!(
            err.to_string(),
            "Configuration error: authority base URL is required"
        );
        assert!(err.is_fatal_configuration());
    }

    #[test]
    fn test_io_with_path_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::io_with_path(io, "/etc/docgate.toml");
        let msg = err.to_string();
        assert!(msg.contains("/etc/docgate.toml"));
        assert!(msg.contains("gone"));
        assert!(!err.is_fatal_configuration());
    }

    #[test]
    fn test_io_without_path_display() {
        let err: Error = std::io::Error::other("disk full").into();
        assert_eq!(err.to_string(), "I/O error: disk full");
    }

    #[test]
    fn test_lifecycle_error_display() {
        let err = Error::lifecycle("authority-pool", "closed");
        assert_eq!(
            err.to_string(),
            "Lifecycle error: resource 'authority-pool' is closed"
        );
        assert!(err.is_fatal_configuration());
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
