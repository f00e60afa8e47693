//! Docgate configuration.
//!
//! Configuration is loaded once at start-up from TOML. Every key has a
//! default, so an empty document (or no file at all) yields a working setup
//! pointed at a local authority service.
//!
//! ```toml
//! [authority]
//! base_url = "http://localhost:8345/mcf-authority-service"
//! connect_timeout_ms = 60000
//! socket_timeout_ms = 300000
//! pool_size = 50
//!
//! [fields]
//! allow_prefix = "allow_token_"
//! deny_prefix = "deny_token_"
//! sentinel = "__nosecurity__"
//!
//! [search]
//! enable_param = "acl"
//! bypass_queries = ["solrpingquery"]
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default authority service endpoint.
pub const DEFAULT_AUTHORITY_URL: &str = "http://localhost:8345/mcf-authority-service";

/// Default reserved value for "no security recorded".
pub const DEFAULT_SENTINEL: &str = "__nosecurity__";

/// Field suffixes for the three ACL relations, in compilation order.
pub const RELATION_SUFFIXES: [&str; 3] = ["document", "share", "parent"];

// ============================================================================
// Top-level configuration
// ============================================================================

/// Complete Docgate configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocgateConfig {
    /// Authority service connection settings.
    #[serde(default)]
    pub authority: AuthorityConfig,

    /// ACL field naming.
    #[serde(default)]
    pub fields: AclFieldConfig,

    /// Request-pipeline behaviour.
    #[serde(default)]
    pub search: SearchSettings,
}

impl DocgateConfig {
    /// Load configuration from an optional TOML file.
    ///
    /// With no path, defaults are returned. An explicit path that cannot be
    /// read is an error rather than a silent fallback.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
                log::debug!("Loading configuration from {}", path.display());
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Render configuration as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Check cross-field invariants.
    ///
    /// An empty authority URL is accepted here: it only matters once a
    /// request carries an identity that needs resolving.
    pub fn validate(&self) -> Result<()> {
        self.authority.validate()?;
        self.fields.validate()?;
        Ok(())
    }
}

// ============================================================================
// Authority
// ============================================================================

/// Authority service connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityConfig {
    /// Base URL of the authority service; `/UserACLs` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// TCP connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Socket read timeout in milliseconds. Also bounds the wait for a
    /// free pool slot.
    #[serde(default = "default_socket_timeout_ms")]
    pub socket_timeout_ms: u64,

    /// Maximum concurrent connections to the authority service.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl AuthorityConfig {
    /// Connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Socket timeout as a [`Duration`].
    pub fn socket_timeout(&self) -> Duration {
        Duration::from_millis(self.socket_timeout_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(Error::config("authority.pool_size must be at least 1"));
        }
        if self.connect_timeout_ms == 0 || self.socket_timeout_ms == 0 {
            return Err(Error::config("authority timeouts must be non-zero"));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    DEFAULT_AUTHORITY_URL.to_string()
}

fn default_connect_timeout_ms() -> u64 {
    60_000
}

fn default_socket_timeout_ms() -> u64 {
    300_000
}

fn default_pool_size() -> usize {
    50
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            socket_timeout_ms: default_socket_timeout_ms(),
            pool_size: default_pool_size(),
        }
    }
}

// ============================================================================
// ACL fields
// ============================================================================

/// ACL field naming: prefixes combined with the relation suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclFieldConfig {
    /// Prefix for allow fields.
    #[serde(default = "default_allow_prefix")]
    pub allow_prefix: String,

    /// Prefix for deny fields.
    #[serde(default = "default_deny_prefix")]
    pub deny_prefix: String,

    /// Reserved "no restriction" token.
    #[serde(default = "default_sentinel")]
    pub sentinel: String,
}

impl AclFieldConfig {
    /// All six field names, allow/deny interleaved per relation.
    pub fn field_names(&self) -> Vec<String> {
        RELATION_SUFFIXES
            .iter()
            .flat_map(|suffix| {
                [
                    format!("{}{suffix}", self.allow_prefix),
                    format!("{}{suffix}", self.deny_prefix),
                ]
            })
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.allow_prefix.is_empty() || self.deny_prefix.is_empty() {
            return Err(Error::config("ACL field prefixes must not be empty"));
        }
        if self.allow_prefix == self.deny_prefix {
            return Err(Error::config(format!(
                "allow and deny prefixes must differ (both '{}')",
                self.allow_prefix
            )));
        }
        if self.sentinel.is_empty() {
            return Err(Error::config("ACL sentinel must not be empty"));
        }

        let names = self.field_names();
        for (i, name) in names.iter().enumerate() {
            if names[i + 1..].contains(name) {
                return Err(Error::config(format!("duplicate ACL field name '{name}'")));
            }
        }
        if names.contains(&self.sentinel) {
            return Err(Error::config(format!(
                "ACL sentinel '{}' collides with a field name",
                self.sentinel
            )));
        }
        Ok(())
    }
}

fn default_allow_prefix() -> String {
    "allow_token_".to_string()
}

fn default_deny_prefix() -> String {
    "deny_token_".to_string()
}

fn default_sentinel() -> String {
    DEFAULT_SENTINEL.to_string()
}

impl Default for AclFieldConfig {
    fn default() -> Self {
        Self {
            allow_prefix: default_allow_prefix(),
            deny_prefix: default_deny_prefix(),
            sentinel: default_sentinel(),
        }
    }
}

// ============================================================================
// Search pipeline
// ============================================================================

/// How the security component interacts with incoming requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Request parameter that disables filtering when set to false.
    #[serde(default = "default_enable_param")]
    pub enable_param: String,

    /// Query strings passed through without filtering (health checks).
    /// Entries are trimmed; the incoming query is compared as sent,
    /// ignoring ASCII case.
    #[serde(default = "default_bypass_queries")]
    pub bypass_queries: Vec<String>,
}

fn default_enable_param() -> String {
    "acl".to_string()
}

fn default_bypass_queries() -> Vec<String> {
    vec!["solrpingquery".to_string()]
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            enable_param: default_enable_param(),
            bypass_queries: default_bypass_queries(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
