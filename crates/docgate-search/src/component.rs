//! Request-time security filtering.
//!
//! [`SecurityComponent`] ties the pieces together for a host search
//! pipeline: identity extraction, token resolution through the shared
//! authority pool, filter compilation, and lowering to Tantivy. It serves
//! two entry points:
//!
//! - [`prepare`](SecurityComponent::prepare) restricts an existing user
//!   query, honouring the enable flag and the bypass rules;
//! - [`filter_query`](SecurityComponent::filter_query) returns the
//!   standalone filter, for pipelines that add filters themselves.

use std::sync::Arc;

use docgate_acl::identity::{IdentityResolver, RequestIdentity};
use docgate_acl::params::RequestParams;
use docgate_acl::predicate::AclFilter;
use docgate_acl::token::TokenSet;
use docgate_acl::AclQueryCompiler;
use docgate_client::{AuthorityClient, AuthorityPool};
use docgate_core::config::{DocgateConfig, SearchSettings};
use docgate_core::lifecycle::ResourceState;
use tantivy::query::Query;
use tantivy::schema::Schema;

use crate::error::Result;
use crate::query::{filter_query, restrict};
use crate::schema::AclFields;

/// Request parameter carrying the user's query string.
pub const QUERY_PARAM: &str = "q";

/// Request parameter present on distributed sub-requests.
pub const SHARDS_PARAM: &str = "shards";

/// Why a request was passed through unfiltered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bypass {
    /// The enable parameter was false.
    Disabled,
    /// A distributed sub-request; the coordinating request is filtered.
    Distributed,
    /// The query string is on the bypass list.
    AllowListedQuery(String),
}

/// ACL filtering for one index schema.
#[derive(Debug)]
pub struct SecurityComponent {
    settings: SearchSettings,
    compiler: AclQueryCompiler,
    client: AuthorityClient,
    schema: Schema,
}

impl SecurityComponent {
    /// Create a component with its own authority pool.
    ///
    /// Validates the configuration and checks that `schema` defines every
    /// configured ACL field. The pool is not started.
    pub fn new(config: &DocgateConfig, schema: Schema) -> Result<Self> {
        let pool = Arc::new(AuthorityPool::new(config.authority.clone()));
        Self::with_pool(config, schema, pool)
    }

    /// Create a component over an existing shared pool.
    pub fn with_pool(
        config: &DocgateConfig,
        schema: Schema,
        pool: Arc<AuthorityPool>,
    ) -> Result<Self> {
        config.validate()?;
        let compiler = AclQueryCompiler::from_config(&config.fields);
        AclFields::from_schema(&schema, compiler.fields())?;

        Ok(Self {
            settings: config.search.clone(),
            compiler,
            client: AuthorityClient::new(pool),
            schema,
        })
    }

    /// Start the authority pool now instead of on first use.
    pub fn start(&self) -> Result<()> {
        self.client.pool().start()?;
        Ok(())
    }

    /// Tear the authority pool down. Only the first call has an effect.
    pub fn shutdown(&self) -> bool {
        self.client.pool().shutdown()
    }

    /// Lifecycle state of the authority pool.
    pub fn pool_state(&self) -> ResourceState {
        self.client.pool().state()
    }

    /// The compiler in use.
    pub fn compiler(&self) -> &AclQueryCompiler {
        &self.compiler
    }

    /// Whether `params` should skip filtering, and why.
    pub fn bypass(&self, params: &RequestParams) -> Option<Bypass> {
        if !params.get_bool(&self.settings.enable_param, true) {
            return Some(Bypass::Disabled);
        }
        if params.contains(SHARDS_PARAM) {
            return Some(Bypass::Distributed);
        }
        let query = params.get(QUERY_PARAM)?;
        self.settings
            .bypass_queries
            .iter()
            .find(|allowed| allowed.trim().eq_ignore_ascii_case(query))
            .map(|allowed| Bypass::AllowListedQuery(allowed.clone()))
    }

    /// Access tokens of the requester.
    ///
    /// Authenticated identities are resolved through the authority service;
    /// anonymous requests use the caller-asserted tokens, if any.
    pub async fn tokens(&self, params: &RequestParams) -> Result<TokenSet> {
        let tokens = match IdentityResolver::resolve(params) {
            RequestIdentity::Users(users) => self.client.resolve_tokens(&users).await?,
            RequestIdentity::Anonymous(tokens) => tokens,
        };
        if tokens.contains(self.compiler.sentinel()) {
            log::warn!(
                "Access token equals the reserved sentinel '{}'; open documents may match",
                self.compiler.sentinel()
            );
        }
        Ok(tokens)
    }

    /// Compile the filter for the requester.
    pub async fn compile(&self, params: &RequestParams) -> Result<AclFilter> {
        let tokens = self.tokens(params).await?;
        let filter = self.compiler.compile(&tokens);
        log::debug!("Compiled ACL filter: {filter}");
        Ok(filter)
    }

    /// The standalone, non-scoring filter query for the requester.
    pub async fn filter_query(&self, params: &RequestParams) -> Result<Box<dyn Query>> {
        let filter = self.compile(params).await?;
        filter_query(&filter, &self.schema)
    }

    /// Restrict `user_query` to documents the requester may see.
    ///
    /// Bypassed requests get `user_query` back unchanged.
    pub async fn prepare(
        &self,
        params: &RequestParams,
        user_query: Box<dyn Query>,
    ) -> Result<Box<dyn Query>> {
        if let Some(reason) = self.bypass(params) {
            log::info!("ACL filtering bypassed: {reason:?}");
            return Ok(user_query);
        }
        let filter = self.filter_query(params).await?;
        Ok(restrict(user_query, filter))
    }
}
