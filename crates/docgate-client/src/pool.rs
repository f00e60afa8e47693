//! Shared, bounded HTTP connection pool for the authority service.
//!
//! The pool is created at most once (eagerly through [`AuthorityPool::start`]
//! or lazily on first checkout) and torn down at most once through
//! [`AuthorityPool::shutdown`]. All state transitions go through a single
//! [`Lifecycle`] slot.

use std::sync::Arc;

use docgate_core::config::AuthorityConfig;
use docgate_core::lifecycle::{Lifecycle, ResourceState};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{Error, Result};

/// Maximum redirect hops followed per request. Loops are tolerated up to
/// this bound.
pub const MAX_REDIRECTS: usize = 10;

const RESOURCE_NAME: &str = "authority-pool";

/// Live pool: an HTTP client plus the permits that bound concurrent
/// connections.
pub(crate) struct PooledClient {
    http: reqwest::Client,
    permits: Arc<Semaphore>,
}

/// One borrowed connection slot. Dropping it returns the slot.
pub(crate) struct Checkout {
    client: Arc<PooledClient>,
    _permit: OwnedSemaphorePermit,
}

impl Checkout {
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client.http
    }
}

/// Owned handle to the authority connection pool.
///
/// Wrap in an `Arc` and share it between every [`AuthorityClient`](crate::AuthorityClient)
/// of the process.
pub struct AuthorityPool {
    config: AuthorityConfig,
    lifecycle: Lifecycle<PooledClient>,
}

impl AuthorityPool {
    /// Create an uninitialized pool.
    pub fn new(config: AuthorityConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::new(RESOURCE_NAME),
        }
    }

    /// Pool configuration.
    pub fn config(&self) -> &AuthorityConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ResourceState {
        self.lifecycle.state()
    }

    /// Initialize the pool now. Idempotent while the pool is live.
    pub fn start(&self) -> Result<()> {
        self.client().map(|_| ())
    }

    /// Tear the pool down.
    ///
    /// Callers waiting for a connection slot fail; requests already in
    /// flight finish on their own. Returns `true` for the call that closed
    /// the pool.
    pub fn shutdown(&self) -> bool {
        self.lifecycle.shutdown_with(|client| client.permits.close())
    }

    /// Borrow a connection slot, waiting at most the socket timeout.
    pub(crate) async fn checkout(&self) -> Result<Checkout> {
        let client = self.client()?;
        let wait = self.config.socket_timeout();
        let permit = Arc::clone(&client.permits).acquire_owned();
        let acquired = tokio::time::timeout(wait, permit).await;
        match acquired {
            Ok(Ok(permit)) => Ok(Checkout {
                client,
                _permit: permit,
            }),
            Ok(Err(_closed)) => {
                Err(docgate_core::Error::lifecycle(RESOURCE_NAME, ResourceState::Closed).into())
            }
            Err(_elapsed) => Err(Error::transport_msg(format!(
                "timed out after {:?} waiting for an authority connection (pool size {})",
                wait, self.config.pool_size
            ))),
        }
    }

    fn client(&self) -> Result<Arc<PooledClient>> {
        let client = self.lifecycle.get_or_try_init(|| build_client(&self.config))?;
        Ok(client)
    }
}

impl std::fmt::Debug for AuthorityPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorityPool")
            .field("base_url", &self.config.base_url)
            .field("pool_size", &self.config.pool_size)
            .field("state", &self.state())
            .finish()
    }
}

fn build_client(config: &AuthorityConfig) -> docgate_core::Result<PooledClient> {
    // reqwest never retries a failed request on its own; nothing to disable.
    let http = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout())
        .read_timeout(config.socket_timeout())
        .pool_max_idle_per_host(config.pool_size)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .tcp_nodelay(true)
        .build()
        .map_err(|e| {
            docgate_core::Error::config(format!("failed to build authority HTTP client: {e}"))
        })?;

    log::debug!(
        "Authority pool: size={} connect_timeout={:?} socket_timeout={:?}",
        config.pool_size,
        config.connect_timeout(),
        config.socket_timeout()
    );

    Ok(PooledClient {
        http,
        permits: Arc::new(Semaphore::new(config.pool_size)),
    })
}

// ============================================================================
// Tests
// ============================================================================
