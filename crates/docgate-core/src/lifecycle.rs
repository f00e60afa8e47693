//! Process-scoped resource lifecycle.
//!
//! Provides [`Lifecycle`], a slot holding a shared resource (such as a pooled
//! HTTP client) that is initialized at most once and torn down at most once.
//! Both eager start-up hooks and lazy first-use paths go through the same
//! [`Lifecycle::get_or_try_init`], so concurrent initializers converge on a
//! single instance.
//!
//! # Usage
//!
//! ```rust
//! use docgate_core::lifecycle::{Lifecycle, ResourceState};
//!
//! let slot: Lifecycle<String> = Lifecycle::new("greeting");
//! assert_eq!(slot.state(), ResourceState::Uninitialized);
//!
//! let value = slot.get_or_try_init(|| Ok("hello".to_string())).unwrap();
//! assert_eq!(value.as_str(), "hello");
//! assert!(slot.state().is_ready());
//!
//! assert!(slot.shutdown());
//! assert!(slot.get().is_err());
//! ```

use std::fmt;
use std::sync::{Arc, RwLock};

use tokio::sync::watch;

use crate::error::{Error, Result};

// ============================================================================
// ResourceState
// ============================================================================

/// State of a managed resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceState {
    /// Not yet created.
    Uninitialized,
    /// Created and serving callers.
    Ready,
    /// Torn down; no further use is valid.
    Closed,
}

impl ResourceState {
    /// Returns `true` if the resource is available.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns `true` once the resource has been torn down.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Ready => write!(f, "ready"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

enum Slot<T> {
    Empty,
    Ready(Arc<T>),
    Closed,
}

/// Initialize-once, tear-down-once holder for a shared resource.
///
/// Readers take a shared lock and clone the inner `Arc`, so in-flight users
/// keep the resource alive past teardown while new users are refused.
pub struct Lifecycle<T> {
    name: String,
    slot: RwLock<Slot<T>>,
    tx: watch::Sender<ResourceState>,
}

impl<T> Lifecycle<T> {
    /// Create an empty slot with the given resource name.
    pub fn new(name: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(ResourceState::Uninitialized);
        Self {
            name: name.into(),
            slot: RwLock::new(Slot::Empty),
            tx,
        }
    }

    /// Get the resource name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the current state.
    pub fn state(&self) -> ResourceState {
        *self.tx.borrow()
    }

    /// Return the live resource, creating it with `init` on first use.
    ///
    /// `init` runs at most once across all callers that race here; losers of
    /// the race receive the winner's instance. A failed `init` leaves the
    /// slot empty so a later call may try again. Calling this after
    /// [`shutdown`](Self::shutdown) is a lifecycle error.
    pub fn get_or_try_init<F>(&self, init: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        {
            let slot = self.slot.read().map_err(|_| self.poisoned())?;
            match &*slot {
                Slot::Ready(value) => return Ok(Arc::clone(value)),
                Slot::Closed => return Err(Error::lifecycle(&self.name, ResourceState::Closed)),
                Slot::Empty => {}
            }
        }

        let mut slot = self.slot.write().map_err(|_| self.poisoned())?;
        match &*slot {
            Slot::Ready(value) => Ok(Arc::clone(value)),
            Slot::Closed => Err(Error::lifecycle(&self.name, ResourceState::Closed)),
            Slot::Empty => {
                let value = Arc::new(init()?);
                *slot = Slot::Ready(Arc::clone(&value));
                log::info!("Resource '{}' → {}", self.name, ResourceState::Ready);
                self.tx.send_replace(ResourceState::Ready);
                Ok(value)
            }
        }
    }

    /// Return the live resource without initializing it.
    pub fn get(&self) -> Result<Arc<T>> {
        let slot = self.slot.read().map_err(|_| self.poisoned())?;
        match &*slot {
            Slot::Ready(value) => Ok(Arc::clone(value)),
            Slot::Empty => Err(Error::lifecycle(&self.name, ResourceState::Uninitialized)),
            Slot::Closed => Err(Error::lifecycle(&self.name, ResourceState::Closed)),
        }
    }

    /// Tear the resource down.
    ///
    /// Returns `true` only for the call that performed the transition to
    /// [`ResourceState::Closed`]; repeated calls are no-ops. Closing a slot
    /// that was never initialized still marks it closed.
    pub fn shutdown(&self) -> bool {
        self.shutdown_with(|_| {})
    }

    /// Tear the resource down, handing the live instance (if any) to
    /// `on_close` while initialization is still locked out.
    ///
    /// `on_close` runs at most once, and only when the slot held a value.
    pub fn shutdown_with<F>(&self, on_close: F) -> bool
    where
        F: FnOnce(&T),
    {
        let mut slot = match self.slot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match std::mem::replace(&mut *slot, Slot::Closed) {
            Slot::Closed => return false,
            Slot::Ready(value) => on_close(&value),
            Slot::Empty => {}
        }
        log::info!("Resource '{}' → {}", self.name, ResourceState::Closed);
        self.tx.send_replace(ResourceState::Closed);
        true
    }

    fn poisoned(&self) -> Error {
        Error::lifecycle(&self.name, "poisoned")
    }
}

impl<T> fmt::Debug for Lifecycle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
