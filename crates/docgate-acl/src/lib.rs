//! # docgate-acl
//!
//! Request-side access control for Docgate.
//!
//! This crate turns the parameters of one search request into a
//! non-scoring eligibility filter:
//! - [`RequestParams`]: ordered, multi-valued request parameters
//! - [`IdentityResolver`]: authenticated identities or anonymous group tokens
//! - [`TokenSet`]: de-duplicated opaque access tokens
//! - [`AclFieldNames`]: the six allow/deny × document/share/parent fields
//! - [`AclQueryCompiler`]: tokens → [`AclFilter`] predicate tree
//!
//! Everything here is pure and infallible; resolving identities to tokens
//! over the network lives in `docgate-client`.
//!
//! ```rust
//! use docgate_acl::{AclQueryCompiler, IdentityResolver, RequestIdentity, RequestParams};
//!
//! let params = RequestParams::new().with("UserTokens", "engineering");
//! let RequestIdentity::Anonymous(tokens) = IdentityResolver::resolve(&params) else {
//!     unreachable!("no user name supplied");
//! };
//!
//! let filter = AclQueryCompiler::default().compile(&tokens);
//! assert!(filter.to_string().contains("allow_token_document:engineering"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod compiler;
pub mod fields;
pub mod identity;
pub mod params;
pub mod predicate;
pub mod token;

pub use compiler::AclQueryCompiler;
pub use fields::{Access, AclField, AclFieldNames, AclRelation, FieldPair};
pub use identity::{Identity, IdentityResolver, RequestIdentity, UserMap};
pub use params::RequestParams;
pub use predicate::{AclFilter, FieldValues, Predicate};
pub use token::{AccessToken, TokenSet};
