//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use docgate_acl::identity::{AUTHENTICATED_USER_DOMAIN, AUTHENTICATED_USER_NAME, USER_TOKENS};
use docgate_acl::params::RequestParams;

/// Docgate - document-level security for search
#[derive(Parser, Debug)]
#[command(name = "docgate", author, version)]
#[command(about = "Resolve access tokens and inspect ACL filters", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "DOCGATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a request's identity to access tokens
    Resolve(RequestArgs),

    /// Compile the ACL filter for a request
    Filter {
        #[command(flatten)]
        request: RequestArgs,

        /// Print the filter as JSON
        #[arg(long)]
        json: bool,

        /// Check a JSON document against the filter
        #[arg(long, value_name = "FILE")]
        document: Option<PathBuf>,
    },

    /// Configuration file operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Print the effective configuration as TOML
    Show,
    /// Write a default configuration file
    Init {
        /// Output path (defaults to the platform config directory)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// How the request identifies its caller.
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// Authenticated user name
    #[arg(short, long)]
    pub user: Option<String>,

    /// Authorization domain of --user
    #[arg(short, long, requires = "user")]
    pub domain: Option<String>,

    /// Caller-asserted group token (repeatable)
    #[arg(short, long = "token", value_name = "TOKEN")]
    pub tokens: Vec<String>,

    /// Extra request parameter as KEY=VALUE (repeatable)
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Raw request query string, e.g. "AuthenticatedUserName_0=alice&AuthenticatedUserDomain_0=ad"
    #[arg(long, value_name = "QUERY")]
    pub query_string: Option<String>,
}

impl RequestArgs {
    /// Assemble request parameters: raw query string first, then
    /// `--param`, then the shorthand flags.
    pub fn to_params(&self) -> RequestParams {
        let mut params = match &self.query_string {
            Some(query) => RequestParams::from_query_string(query),
            None => RequestParams::new(),
        };
        for (key, value) in &self.params {
            params.add(key.as_str(), value.as_str());
        }
        if let Some(user) = &self.user {
            params.add(AUTHENTICATED_USER_NAME, user.as_str());
            if let Some(domain) = &self.domain {
                params.add(AUTHENTICATED_USER_DOMAIN, domain.as_str());
            }
        }
        for token in &self.tokens {
            params.add(USER_TOKENS, token.as_str());
        }
        params
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}
