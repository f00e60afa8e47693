//! # docgate-cli
//!
//! Operator tooling for Docgate:
//! - `resolve`: show the access tokens a request's identity maps to
//! - `filter`: show the compiled ACL filter, optionally checking a document
//! - `config`: locate, print, or create the configuration file

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command, ConfigAction, RequestArgs};
pub use commands::run;
