//! # docgate-client
//!
//! Client for the authority service that maps user identities to access
//! tokens.
//!
//! - [`AuthorityPool`]: the process-scoped, bounded HTTP connection pool
//! - [`request`]: `UserACLs` URL construction
//! - [`response`]: `TOKEN:` line parsing
//! - [`AuthorityClient`]: one GET per resolution over the shared pool

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod authority;
pub mod error;
pub mod pool;
pub mod request;
pub mod response;

pub use authority::AuthorityClient;
pub use error::{Error, Result};
pub use pool::AuthorityPool;
