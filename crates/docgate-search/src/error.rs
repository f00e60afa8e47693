//! Error types for docgate-search

use thiserror::Error;

/// Result type alias for docgate-search operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or applying ACL filters
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from docgate-core (configuration, lifecycle, I/O)
    #[error(transparent)]
    Core(#[from] docgate_core::Error),

    /// Token resolution against the authority service failed
    #[error(transparent)]
    Client(#[from] docgate_client::Error),

    /// A configured ACL field is absent from the index schema
    #[error("ACL field '{name}' is not defined in the index schema")]
    MissingField {
        /// Configured field name
        name: String,
    },

    /// Tantivy failure
    #[error("Index error: {0}")]
    Index(#[from] tantivy::TantivyError),
}

impl Error {
    /// Creates a missing-field error.
    pub fn missing_field(name: impl Into<String>) -> Self {
        Error::MissingField { name: name.into() }
    }

    /// Whether this error reflects deployment or wiring problems rather
    /// than a single failed request.
    pub fn is_fatal_configuration(&self) -> bool {
        match self {
            Error::Core(e) => e.is_fatal_configuration(),
            Error::Client(e) => e.is_fatal_configuration(),
            Error::MissingField { .. } => true,
            Error::Index(_) => false,
        }
    }
}
