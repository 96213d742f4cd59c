//! Route cache: snapshot ownership and the refresh protocol.
//!
//! # Data Flow
//! ```text
//! store.fetch_enabled()
//!     → RouteSet::build (filter, compile, sort)
//!     → atomic swap of Arc<RouteSet>
//!     → request handlers load the snapshot lock-free
//! ```
//!
//! # Design Decisions
//! - The snapshot is the only shared mutable state; it is published through
//!   `ArcSwap`, so readers see either the old or the new set, never a mix
//! - The first load is fatal: the gateway cannot serve without a table
//! - Later refresh failures are logged and the previous snapshot stays current
//! - With a static single-target override there is no store and no refresh

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::time::MissedTickBehavior;

use crate::routes::record::RouteSet;
use crate::routes::store::{RouteStore, StoreError};

pub struct RouteCache {
    snapshot: ArcSwap<RouteSet>,
    store: Option<Arc<dyn RouteStore>>,
}

impl RouteCache {
    /// Build the cache with an initial full read. Failure here is fatal.
    pub async fn from_store(store: Arc<dyn RouteStore>) -> Result<Self, StoreError> {
        let records = store.fetch_enabled().await?;
        let set = RouteSet::build(records);
        tracing::info!(routes = set.len(), "initial route table loaded");
        Ok(Self {
            snapshot: ArcSwap::from_pointee(set),
            store: Some(store),
        })
    }

    /// Cache for the static single-target override: serves one synthetic
    /// wildcard route for the gateway's lifetime, no store access.
    pub fn with_static_target(target: &str) -> Self {
        tracing::info!(target = %target, "static target override active, route store disabled");
        Self {
            snapshot: ArcSwap::from_pointee(RouteSet::single_target(target)),
            store: None,
        }
    }

    /// The latest successfully built snapshot. Lock-free, never blocks.
    pub fn current(&self) -> Arc<RouteSet> {
        self.snapshot.load_full()
    }

    /// Re-read the store and atomically swap in a fresh snapshot.
    pub async fn refresh(&self) -> Result<(), StoreError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let records = store.fetch_enabled().await?;
        let set = RouteSet::build(records);
        tracing::debug!(routes = set.len(), "route table refreshed");
        self.snapshot.store(Arc::new(set));
        Ok(())
    }

    /// Spawn the periodic refresh task. Refresh errors keep the previous
    /// snapshot; they never affect in-flight requests.
    pub fn spawn_refresh(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            if cache.store.is_none() {
                return;
            }
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick fires immediately and the initial load already ran
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = cache.refresh().await {
                    tracing::error!(error = %e, "route refresh failed, keeping previous snapshot");
                }
            }
        })
    }
}
