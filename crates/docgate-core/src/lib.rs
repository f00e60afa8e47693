//! Docgate Core: shared errors, configuration, and lifecycle primitives.
//!
//! This crate provides the foundational types used across all Docgate crates.
//! It has no internal Docgate dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`config`]: Authority, ACL field, and search configuration
//! - [`lifecycle`]: Initialize-once / tear-down-once resource slot

pub mod config;
pub mod error;
pub mod lifecycle;

// Re-export key types at crate root for convenience
pub use config::{AclFieldConfig, AuthorityConfig, DocgateConfig, SearchSettings};
pub use error::{Error, Result};
pub use lifecycle::{Lifecycle, ResourceState};
