//! In-memory activity catalog
//!
//! Read-mostly snapshot of the activity definitions, refreshed from the
//! store on a fixed interval. The store fetch happens outside the lock; the
//! write lock is held only for the map swap, so readers are never blocked
//! behind a slow store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::stores::{ActivityDefinition, ActivityStore};
use crate::supervisor::spawn_supervised;
use crate::types::Result;

/// Cached activity catalog
pub struct ActivityCatalog {
    store: Arc<dyn ActivityStore>,
    map: RwLock<HashMap<i32, ActivityDefinition>>,
}

impl ActivityCatalog {
    /// Create an empty catalog; call `refresh` (or start the refresh task)
    /// to populate it
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self {
            store,
            map: RwLock::new(HashMap::new()),
        }
    }

    /// Look up one activity definition in the current snapshot
    pub async fn get(&self, code: i32) -> Option<ActivityDefinition> {
        self.map.read().await.get(&code).cloned()
    }

    /// Clone the whole current snapshot
    pub async fn snapshot_all(&self) -> HashMap<i32, ActivityDefinition> {
        self.map.read().await.clone()
    }

    /// Rebuild the snapshot from the store.
    ///
    /// The new map replaces the old one wholesale, so definitions removed
    /// from the store disappear from the catalog. On a store error the
    /// previous snapshot is left untouched.
    pub async fn refresh(&self) -> Result<usize> {
        let definitions = self.store.list_all().await?;

        let fresh: HashMap<i32, ActivityDefinition> =
            definitions.into_iter().map(|d| (d.code, d)).collect();
        let count = fresh.len();

        *self.map.write().await = fresh;
        Ok(count)
    }
}

/// Start the supervised catalog refresh loop.
///
/// Refreshes immediately, then on every interval tick. Store errors are
/// logged and skipped; a panicking iteration restarts the loop.
pub fn spawn_refresh_task(catalog: Arc<ActivityCatalog>, interval: Duration) -> JoinHandle<()> {
    spawn_supervised("catalog-refresh", move || {
        let catalog = Arc::clone(&catalog);
        async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match catalog.refresh().await {
                    Ok(count) => debug!(activities = count, "activity catalog refreshed"),
                    Err(e) => warn!("catalog refresh failed, keeping previous snapshot: {}", e),
                }
            }
        }
    })
}
