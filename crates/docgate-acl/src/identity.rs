//! Identity extraction from request parameters.
//!
//! A request identifies its user in one of three ways:
//!
//! 1. `AuthenticatedUserName` (+ optional `AuthenticatedUserDomain`), a
//!    single identity. This form wins over the others.
//! 2. Indexed pairs `AuthenticatedUserName_0` / `AuthenticatedUserDomain_0`,
//!    `_1`, … read until the first missing name.
//! 3. Nothing: the caller is anonymous and may assert group tokens through
//!    repeated `UserTokens` parameters (e.g. from an upstream proxy).

use std::fmt;

use crate::params::RequestParams;
use crate::token::TokenSet;

/// Single authenticated user name.
pub const AUTHENTICATED_USER_NAME: &str = "AuthenticatedUserName";
/// Authorization domain paired with [`AUTHENTICATED_USER_NAME`].
pub const AUTHENTICATED_USER_DOMAIN: &str = "AuthenticatedUserDomain";
/// Prefix of indexed user names.
pub const AUTHENTICATED_USER_NAME_PREFIX: &str = "AuthenticatedUserName_";
/// Prefix of indexed authorization domains.
pub const AUTHENTICATED_USER_DOMAIN_PREFIX: &str = "AuthenticatedUserDomain_";
/// Caller-asserted group tokens for anonymous requests.
pub const USER_TOKENS: &str = "UserTokens";

/// One user within one authorization domain. `""` is the default domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Authorization domain.
    pub domain: String,
    /// User name within the domain.
    pub username: String,
}

/// Insertion-ordered mapping of domain → user name.
///
/// Each domain appears once. Re-inserting a domain replaces its user name
/// but keeps its original position, so request URLs built from the map are
/// reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserMap {
    entries: Vec<Identity>,
}

impl UserMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the user for `domain`.
    pub fn insert(&mut self, domain: impl Into<String>, username: impl Into<String>) {
        let domain = domain.into();
        let username = username.into();
        match self.entries.iter_mut().find(|e| e.domain == domain) {
            Some(entry) => entry.username = username,
            None => self.entries.push(Identity { domain, username }),
        }
    }

    /// User name for `domain`, if present.
    pub fn get(&self, domain: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.domain == domain)
            .map(|e| e.username.as_str())
    }

    /// Number of domains.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no identities.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Identity> {
        self.entries.iter()
    }

    /// The lone user of the default domain, if that is the whole map.
    pub fn single_default_user(&self) -> Option<&str> {
        match self.entries.as_slice() {
            [only] if only.domain.is_empty() => Some(&only.username),
            _ => None,
        }
    }
}

impl<D: Into<String>, U: Into<String>> FromIterator<(D, U)> for UserMap {
    fn from_iter<I: IntoIterator<Item = (D, U)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (domain, username) in iter {
            map.insert(domain, username);
        }
        map
    }
}

impl<'a> IntoIterator for &'a UserMap {
    type Item = &'a Identity;
    type IntoIter = std::slice::Iter<'a, Identity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for UserMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, identity) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}:{}", identity.domain, identity.username)?;
        }
        write!(f, "]")
    }
}

/// Who is asking, as far as the request parameters say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestIdentity {
    /// One or more authenticated identities; tokens must be resolved.
    Users(UserMap),
    /// No identity. Holds caller-asserted group tokens, possibly none.
    Anonymous(TokenSet),
}

/// Extracts the [`RequestIdentity`] from request parameters.
pub struct IdentityResolver;

impl IdentityResolver {
    /// Resolve the identity carried by `params`. Never fails: absence of an
    /// identity is a valid outcome.
    pub fn resolve(params: &RequestParams) -> RequestIdentity {
        let users = Self::users(params);
        if !users.is_empty() {
            return RequestIdentity::Users(users);
        }

        let tokens: TokenSet = params.get_all(USER_TOKENS).collect();
        if params.contains(USER_TOKENS) {
            log::info!("Group tokens received from caller");
        } else {
            log::info!("Default no-user response (open documents only)");
        }
        RequestIdentity::Anonymous(tokens)
    }

    /// The domain → user map alone; empty when the request is anonymous.
    pub fn users(params: &RequestParams) -> UserMap {
        let mut users = UserMap::new();

        if let Some(name) = params.get(AUTHENTICATED_USER_NAME) {
            let domain = params.get(AUTHENTICATED_USER_DOMAIN).unwrap_or("");
            users.insert(domain, name);
            return users;
        }

        for i in 0.. {
            let Some(name) = params.get(&format!("{AUTHENTICATED_USER_NAME_PREFIX}{i}")) else {
                break;
            };
            let domain = params
                .get(&format!("{AUTHENTICATED_USER_DOMAIN_PREFIX}{i}"))
                .unwrap_or("");
            users.insert(domain, name);
        }
        users
    }
}

// ============================================================================
// Tests
// ============================================================================
