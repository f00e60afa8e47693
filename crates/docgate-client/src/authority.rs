//! Access-token resolution against the authority service.

use std::sync::Arc;

use docgate_acl::identity::UserMap;
use docgate_acl::token::TokenSet;

use crate::error::{Error, Result};
use crate::pool::AuthorityPool;
use crate::request::request_url;
use crate::response::parse_token_lines;

/// Charset used when the response does not declare a usable one.
const DEFAULT_CHARSET: &str = "utf-8";

/// Resolves user identities to access tokens.
///
/// Cheap to clone; clones share the same pool. Safe to use from many
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct AuthorityClient {
    pool: Arc<AuthorityPool>,
}

impl AuthorityClient {
    /// Create a client over a shared pool.
    pub fn new(pool: Arc<AuthorityPool>) -> Self {
        Self { pool }
    }

    /// The pool this client draws connections from.
    pub fn pool(&self) -> &Arc<AuthorityPool> {
        &self.pool
    }

    /// Fetch the access tokens of `users`.
    ///
    /// Issues exactly one GET. A non-success status fails with
    /// [`Error::Resolution`] carrying the status and the full body; network
    /// failures and timeouts fail with [`Error::Transport`]. Nothing is
    /// retried.
    pub async fn resolve_tokens(&self, users: &UserMap) -> Result<TokenSet> {
        let url = request_url(&self.pool.config().base_url, users)?;
        log::info!("Trying to match docs for user(s) {users}");

        // Held until this function returns, on every path.
        let slot = self.pool.checkout().await?;

        let response = slot
            .http()
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport("authority request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text_with_charset(DEFAULT_CHARSET)
                .await
                .map_err(|e| Error::transport("failed to read authority error body", e))?;
            return Err(Error::resolution(status.as_u16(), body));
        }

        let body = response
            .text_with_charset(DEFAULT_CHARSET)
            .await
            .map_err(|e| Error::transport("failed to read authority response", e))?;

        let tokens = parse_token_lines(&body);
        log::debug!("Authority returned {} token(s) for {users}", tokens.len());
        Ok(tokens)
    }
}

// ============================================================================
// Tests
// ============================================================================
