//! Keeps one refresh coordinator per monitored account.
//!
//! Registration is gated on a first successful refresh: an account whose
//! credentials or bindings are broken is rejected up front instead of sitting
//! in the registry permanently unavailable.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::RefreshConfig;
use crate::error::{AizhongError, AizhongResult};
use crate::refresh::{AccountCoordinator, RefreshStatus, SnapshotSource};

pub struct CoordinatorRegistry {
    coordinators: RwLock<HashMap<String, Arc<AccountCoordinator>>>,
}

impl CoordinatorRegistry {
    pub fn new() -> Self {
        Self {
            coordinators: RwLock::new(HashMap::new()),
        }
    }

    /// Register an account, run its first refresh, and start its loop.
    ///
    /// The first refresh must succeed; on failure nothing is registered and
    /// the cause is wrapped in the returned error.
    pub async fn register(
        &self,
        name: String,
        source: Arc<dyn SnapshotSource>,
        config: RefreshConfig,
    ) -> AizhongResult<Arc<AccountCoordinator>> {
        if self.coordinators.read().await.contains_key(&name) {
            return Err(AizhongError::EntryAlreadyExists(name));
        }

        let coordinator = Arc::new(AccountCoordinator::new(name.clone(), source, config));

        let report = coordinator.refresh().await;
        if !report.success {
            return Err(AizhongError::InitialRefreshFailed {
                entry: name,
                message: report.error.unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        let mut coordinators = self.coordinators.write().await;
        if coordinators.contains_key(&name) {
            return Err(AizhongError::EntryAlreadyExists(name));
        }

        coordinator.start().await?;
        coordinators.insert(name.clone(), Arc::clone(&coordinator));

        info!("Registered account '{}'", name);
        Ok(coordinator)
    }

    /// Stop an account's loop and drop it from the registry.
    pub async fn unregister(&self, name: &str) -> AizhongResult<()> {
        let coordinator = {
            let mut coordinators = self.coordinators.write().await;
            coordinators
                .remove(name)
                .ok_or_else(|| AizhongError::EntryNotFound(name.to_string()))?
        };

        coordinator.stop().await;
        info!("Unregistered account '{}'", name);
        Ok(())
    }

    pub async fn get(&self, name: &str) -> Option<Arc<AccountCoordinator>> {
        let coordinators = self.coordinators.read().await;
        coordinators.get(name).cloned()
    }

    pub async fn names(&self) -> Vec<String> {
        let coordinators = self.coordinators.read().await;
        let mut names: Vec<String> = coordinators.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn count(&self) -> usize {
        let coordinators = self.coordinators.read().await;
        coordinators.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.count().await == 0
    }

    pub async fn all_statuses(&self) -> HashMap<String, RefreshStatus> {
        let coordinators = self.coordinators.read().await;
        let mut statuses = HashMap::new();

        for (name, coordinator) in coordinators.iter() {
            statuses.insert(name.clone(), coordinator.status().await);
        }

        statuses
    }

    /// Stop every loop and empty the registry.
    pub async fn shutdown_all(&self) {
        let mut coordinators = self.coordinators.write().await;

        for (name, coordinator) in coordinators.drain() {
            coordinator.stop().await;
            debug!("Stopped refresh loop for '{}'", name);
        }

        info!("All accounts shut down");
    }
}

impl Default for CoordinatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CoordinatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorRegistry").finish_non_exhaustive()
    }
}
