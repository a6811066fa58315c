//! Read-through cache over the catalog store.
//!
//! A successful listing replaces the snapshot. A failed one is logged and the
//! previous snapshot (empty before the first success) is served instead.

use std::sync::Arc;
use std::time::{Duration, Instant};

use scentmap_core::HotplaceDestination;
use scentmap_store::FirestoreClient;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct CatalogCache {
    store: FirestoreClient,
    refresh_after: Duration,
    inner: Arc<RwLock<Snapshot>>,
}

#[derive(Default)]
struct Snapshot {
    places: Arc<Vec<HotplaceDestination>>,
    fetched_at: Option<Instant>,
}

impl CatalogCache {
    /// `refresh_after` of zero refetches on every read.
    pub fn new(store: FirestoreClient, refresh_after: Duration) -> Self {
        Self {
            store,
            refresh_after,
            inner: Arc::new(RwLock::new(Snapshot::default())),
        }
    }

    /// Current catalog, refreshed from the store when the snapshot is stale.
    pub async fn places(&self) -> Arc<Vec<HotplaceDestination>> {
        {
            let snapshot = self.inner.read().await;
            if snapshot
                .fetched_at
                .is_some_and(|at| at.elapsed() < self.refresh_after)
            {
                return Arc::clone(&snapshot.places);
            }
        }

        match self.store.get_all().await {
            Ok(places) => {
                let places = Arc::new(places);
                let mut snapshot = self.inner.write().await;
                snapshot.places = Arc::clone(&places);
                snapshot.fetched_at = Some(Instant::now());
                places
            }
            Err(e) => {
                let snapshot = self.inner.read().await;
                tracing::warn!(
                    error = %e,
                    cached = snapshot.places.len(),
                    "catalog refresh failed; serving last snapshot"
                );
                Arc::clone(&snapshot.places)
            }
        }
    }

    /// Looks up one place by id in the current catalog.
    pub async fn find(&self, id: &str) -> Option<HotplaceDestination> {
        self.places().await.iter().find(|p| p.id == id).cloned()
    }

    /// Forces the next read to go to the store.
    pub async fn invalidate(&self) {
        self.inner.write().await.fetched_at = None;
    }
}
