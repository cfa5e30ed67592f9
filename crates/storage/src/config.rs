//! Store configuration: explicit context plus a process-wide default
//!
//! ## Design
//!
//! The record layer takes a [`StoreContext`] at construction, so the
//! active backend is injected rather than reached through a global. The
//! process-wide slot remains as a convenience for embedders that set one
//! connection at boot and use it everywhere; it is set once and read
//! thereafter. Reading the slot before it is set is a distinct
//! configuration error, not a panic.

use crate::store::Store;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;
use warren_core::error::{Error, Result};

static GLOBAL_STORE: Lazy<RwLock<Option<Arc<dyn Store>>>> = Lazy::new(|| RwLock::new(None));

/// Handle to the active store, passed to the persistence layer
#[derive(Clone)]
pub struct StoreContext {
    store: Arc<dyn Store>,
}

impl StoreContext {
    /// Context over an explicit backend
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Context over the process-wide configured backend
    ///
    /// Errors with [`Error::StoreNotConfigured`] when [`configure`] has
    /// not run yet.
    pub fn configured() -> Result<Self> {
        let guard = GLOBAL_STORE.read();
        match guard.as_ref() {
            Some(store) => Ok(Self::new(Arc::clone(store))),
            None => Err(Error::StoreNotConfigured),
        }
    }

    /// The backend behind this context
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreContext").finish_non_exhaustive()
    }
}

/// Set the process-wide store handle
///
/// Intended to be called once by the embedding application before any
/// record operation; a later call replaces the handle for subsequently
/// created contexts.
pub fn configure(store: Arc<dyn Store>) {
    debug!("configuring process-wide store handle");
    *GLOBAL_STORE.write() = Some(store);
}
