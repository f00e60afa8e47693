//! Access tokens.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque access token. Only equality is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the raw value.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccessToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AccessToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Tokens held by one requester.
///
/// Insertion order is kept for logging and reproducible filters; repeated
/// tokens are dropped since they add nothing to the compiled predicate.
#[derive(Debug, Clone, Default)]
pub struct TokenSet {
    tokens: Vec<AccessToken>,
    seen: HashSet<AccessToken>,
}

impl TokenSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token. Returns `false` if it was already present.
    pub fn insert(&mut self, token: impl Into<AccessToken>) -> bool {
        let token = token.into();
        if self.seen.contains(&token) {
            return false;
        }
        self.seen.insert(token.clone());
        self.tokens.push(token);
        true
    }

    /// Whether `value` is one of the tokens.
    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(&AccessToken::new(value))
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, AccessToken> {
        self.tokens.iter()
    }

    /// Token values in insertion order.
    pub fn to_strings(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.as_str().to_string()).collect()
    }
}

impl PartialEq for TokenSet {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Eq for TokenSet {}

impl<T: Into<AccessToken>> FromIterator<T> for TokenSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Into<AccessToken>> Extend<T> for TokenSet {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for token in iter {
            self.insert(token);
        }
    }
}

impl<'a> IntoIterator for &'a TokenSet {
    type Item = &'a AccessToken;
    type IntoIter = std::slice::Iter<'a, AccessToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{token}")?;
        }
        write!(f, "]")
    }
}
