//! # docgate-search
//!
//! Tantivy integration for document-level security.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    docgate-search                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  SecurityComponent                                       │
//! │  ├── prepare(params, user_query)   bypass rules + AND    │
//! │  └── filter_query(params)          standalone filter     │
//! ├──────────────────────────────────────────────────────────┤
//! │  query: Predicate → TermQuery / BooleanQuery / ConstScore│
//! │  AclSchema, AclFields (six raw ACL fields)               │
//! │  AclDocument (empty lists indexed as the sentinel)       │
//! │  AclIndex (writer + counting searches)                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod component;
pub mod document;
pub mod error;
pub mod indexer;
pub mod query;
pub mod schema;

pub use component::{Bypass, SecurityComponent};
pub use document::{AclDocument, AclDocumentBuilder, RelationAcl};
pub use error::{Error, Result};
pub use indexer::AclIndex;
pub use query::{filter_query, lower, restrict};
pub use schema::{AclFields, AclSchema};
