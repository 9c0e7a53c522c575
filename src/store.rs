//! Client cache layer — one cached copy of the remote task collection.
//!
//! `TaskStore` wraps a [`TaskGateway`] and owns the single cached
//! collection (logical key "tasks"). Reads go through the cache; every
//! successful mutation unconditionally invalidates it, so the next read
//! refetches. There is no optimistic merge and no partial patch of the
//! cache — the server's answer is the only authority. On a failed mutation
//! nothing is invalidated and the stale value stays authoritative until the
//! next natural refetch.
//!
//! The store is constructed once at startup and handed to callers
//! explicitly; there is no hidden global. Observers subscribe to a watch
//! channel carrying the cache generation and re-read when it bumps.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::gateway::{RemoteError, TaskGateway};
use crate::task::{CreateTaskInput, Task, UpdateTaskInput};

struct CacheSlot {
    tasks: Option<Arc<Vec<Task>>>,
    /// Bumped on every invalidation. A fetch only fills the slot if the
    /// generation it started under is still current, so a slow fetch that
    /// lost a race with an invalidation cannot resurrect stale data.
    generation: u64,
}

pub struct TaskStore {
    gateway: Arc<dyn TaskGateway>,
    slot: RwLock<CacheSlot>,
    notify: watch::Sender<u64>,
}

impl TaskStore {
    pub fn new(gateway: Arc<dyn TaskGateway>) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            gateway,
            slot: RwLock::new(CacheSlot {
                tasks: None,
                generation: 0,
            }),
            notify,
        }
    }

    /// Observe cache invalidations. The value is the cache generation;
    /// `changed()` resolving means the collection should be re-read.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    // ─── Reads ───────────────────────────────────────────────────────────────

    /// Read-through: the cached collection when present, otherwise a fresh
    /// fetch that fills the cache.
    pub async fn tasks(&self) -> Result<Arc<Vec<Task>>, RemoteError> {
        if let Some(tasks) = self.slot.read().await.tasks.clone() {
            return Ok(tasks);
        }
        self.refresh().await
    }

    /// Unconditional refetch — the manual "try again" path and the refetch
    /// after an invalidation.
    pub async fn refresh(&self) -> Result<Arc<Vec<Task>>, RemoteError> {
        let started_under = self.slot.read().await.generation;
        let tasks = Arc::new(self.gateway.list().await?);

        let mut slot = self.slot.write().await;
        if slot.generation == started_under {
            slot.tasks = Some(tasks.clone());
        } else {
            // Invalidated while we were fetching — the caller still gets the
            // result, but the cache stays empty so the next read refetches.
            debug!("discarding fetch result from a superseded generation");
        }
        Ok(tasks)
    }

    // ─── Mutations ───────────────────────────────────────────────────────────

    pub async fn create(&self, input: CreateTaskInput) -> Result<Task, RemoteError> {
        match self.gateway.create(input).await {
            Ok(task) => {
                info!(id = %task.id, "task created");
                self.invalidate().await;
                Ok(task)
            }
            Err(e) => {
                warn!("create failed: {e}");
                Err(e)
            }
        }
    }

    pub async fn update(&self, id: &str, input: UpdateTaskInput) -> Result<Task, RemoteError> {
        match self.gateway.update(id, input).await {
            Ok(task) => {
                info!(id = %task.id, "task updated");
                self.invalidate().await;
                Ok(task)
            }
            Err(e) => {
                warn!(id, "update failed: {e}");
                Err(e)
            }
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        match self.gateway.delete(id).await {
            Ok(()) => {
                info!(id, "task deleted");
                self.invalidate().await;
                Ok(())
            }
            Err(e) => {
                warn!(id, "delete failed: {e}");
                Err(e)
            }
        }
    }

    /// Drop the cached collection and wake subscribers. Runs only after a
    /// remote call has completed successfully.
    async fn invalidate(&self) {
        let generation = {
            let mut slot = self.slot.write().await;
            slot.tasks = None;
            slot.generation += 1;
            slot.generation
        };
        // No subscribers is fine.
        let _ = self.notify.send(generation);
    }
}
