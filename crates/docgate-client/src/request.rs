//! Authority request construction.
//!
//! A lone identity in the default domain uses the simple form
//! `username=<u>`; anything else is sent as indexed pairs
//! `username_0=<u>&domain_0=<d>&username_1=…` in map order.

use docgate_acl::identity::UserMap;
use url::form_urlencoded::byte_serialize;

use crate::error::Result;

/// Path of the ACL lookup operation, relative to the base URL.
pub const USER_ACLS_PATH: &str = "/UserACLs";

/// Encode the query string for `users` (no leading `?`).
pub fn query_string(users: &UserMap) -> String {
    if let Some(username) = users.single_default_user() {
        return format!("username={}", encode(username));
    }

    let mut pairs = Vec::with_capacity(users.len());
    for (i, identity) in users.iter().enumerate() {
        pairs.push(format!(
            "username_{i}={}&domain_{i}={}",
            encode(&identity.username),
            encode(&identity.domain)
        ));
    }
    pairs.join("&")
}

/// Full lookup URL for `users` against `base_url`.
///
/// A trailing `/` on the base is ignored. An empty base is a configuration
/// error: the request cannot be resolved without an authority.
pub fn request_url(base_url: &str, users: &UserMap) -> Result<String> {
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(docgate_core::Error::config(
            "authority base URL is required to resolve user identities",
        )
        .into());
    }

    let query = query_string(users);
    if query.is_empty() {
        Ok(format!("{base}{USER_ACLS_PATH}"))
    } else {
        Ok(format!("{base}{USER_ACLS_PATH}?{query}"))
    }
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}
