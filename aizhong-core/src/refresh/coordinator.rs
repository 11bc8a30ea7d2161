use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex, RwLock};
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use crate::config::RefreshConfig;
use crate::error::{AizhongError, AizhongResult};
use crate::models::Snapshot;

use super::traits::SnapshotSource;
use super::types::{RefreshHistory, RefreshHistoryEntry, RefreshReport, RefreshStatus};

/// Periodic refresh driver for one account.
///
/// Owns the published snapshot and its availability flag. A cycle either
/// replaces the whole snapshot or leaves it untouched: readers always see the
/// result of the last successful cycle, never a partial merge. Concurrent
/// `refresh` calls are serialized, and a caller whose wait overlaps a
/// completing cycle adopts that cycle's outcome instead of starting another.
pub struct AccountCoordinator {
    name: String,
    config: RefreshConfig,
    source: Arc<dyn SnapshotSource>,
    snapshot: Arc<RwLock<Snapshot>>,
    status: Arc<RwLock<RefreshStatus>>,
    history: Arc<Mutex<RefreshHistory>>,
    cycle_lock: Arc<Mutex<()>>,
    shutdown_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl std::fmt::Debug for AccountCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCoordinator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl AccountCoordinator {
    pub fn new(
        name: impl Into<String>,
        source: Arc<dyn SnapshotSource>,
        config: RefreshConfig,
    ) -> Self {
        let history = RefreshHistory::with_capacity(config.history_size);

        Self {
            name: name.into(),
            config,
            source,
            snapshot: Arc::new(RwLock::new(Snapshot::new())),
            status: Arc::new(RwLock::new(RefreshStatus::default())),
            history: Arc::new(Mutex::new(history)),
            cycle_lock: Arc::new(Mutex::new(())),
            shutdown_tx: Arc::new(Mutex::new(None)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clone of the currently published snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    /// Whether the most recent completed cycle succeeded.
    pub async fn is_available(&self) -> bool {
        self.status.read().await.last_success
    }

    pub async fn status(&self) -> RefreshStatus {
        self.status.read().await.clone()
    }

    pub async fn history(&self, limit: usize) -> Vec<RefreshHistoryEntry> {
        let history = self.history.lock().await;
        history.recent(limit).to_vec()
    }

    /// Run one refresh cycle, or adopt the one that just ran.
    ///
    /// Cycles are serialized on an internal lock. If another cycle completed
    /// while this caller waited for the lock, its outcome is returned as a
    /// coalesced report and no additional provider traffic is generated.
    pub async fn refresh(&self) -> RefreshReport {
        let observed_cycles = self.status.read().await.cycles_completed;
        let _cycle = self.cycle_lock.lock().await;

        let status = self.status.read().await;
        if status.cycles_completed != observed_cycles {
            debug!(
                "Refresh for {} coalesced into a cycle that finished while waiting",
                self.name
            );
            return RefreshReport::coalesced(
                status.last_success,
                status.sub_accounts,
                status.last_error.clone(),
            );
        }
        drop(status);

        self.run_cycle().await
    }

    async fn run_cycle(&self) -> RefreshReport {
        let start_time = std::time::Instant::now();
        info!("Starting refresh cycle for {}", self.name);

        self.status.write().await.last_attempt = Some(Utc::now());

        let report = match self.source.fetch_snapshot().await {
            Ok(snapshot) => {
                let sub_accounts = snapshot.len();
                *self.snapshot.write().await = snapshot;

                let mut status = self.status.write().await;
                status.last_success = true;
                status.last_success_time = Some(Utc::now());
                status.consecutive_failures = 0;
                status.last_error = None;
                status.sub_accounts = sub_accounts;
                status.cycles_completed += 1;

                RefreshReport::success(sub_accounts, start_time.elapsed().as_millis() as u64)
            }
            Err(e) => {
                e.log();
                let message = e.to_string();

                let mut status = self.status.write().await;
                status.last_success = false;
                status.consecutive_failures += 1;
                status.last_error = Some(message.clone());
                status.cycles_completed += 1;

                RefreshReport::failure(&message, start_time.elapsed().as_millis() as u64)
            }
        };

        let entry = if report.success {
            RefreshHistoryEntry::success(report.sub_accounts, report.duration_ms)
        } else {
            RefreshHistoryEntry::failure(
                report.error.as_deref().unwrap_or("Unknown error"),
                report.duration_ms,
            )
        };
        self.history.lock().await.add_entry(entry);

        info!(
            "Refresh cycle completed for {}: success={}, sub_accounts={}, duration={}ms",
            self.name, report.success, report.sub_accounts, report.duration_ms
        );

        report
    }

    /// Start the periodic loop. No-op when refresh is disabled by
    /// configuration; starting an already running loop is an error.
    pub async fn start(self: &Arc<Self>) -> AizhongResult<()> {
        if !self.config.enabled {
            info!("Periodic refresh is disabled for {}", self.name);
            return Ok(());
        }

        let mut status = self.status.write().await;
        if status.is_running {
            return Err(AizhongError::AlreadyRunning(self.name.clone()));
        }
        status.is_running = true;
        status.next_scheduled_refresh =
            Some(Utc::now() + chrono::Duration::seconds(self.config.scan_interval_secs as i64));
        drop(status);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        *self.shutdown_tx.lock().await = Some(shutdown_tx);

        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            coordinator.background_loop(shutdown_rx).await;
        });

        info!(
            "Refresh loop started for {} with interval {} seconds",
            self.name, self.config.scan_interval_secs
        );
        Ok(())
    }

    /// Stop the periodic loop. Safe to call when it is not running.
    pub async fn stop(&self) {
        if let Some(tx) = self.shutdown_tx.lock().await.take() {
            let _ = tx.send(());
        }

        let mut status = self.status.write().await;
        status.is_running = false;
        status.next_scheduled_refresh = None;
        drop(status);

        info!("Refresh loop stopped for {}", self.name);
    }

    async fn background_loop(self: Arc<Self>, mut shutdown_rx: oneshot::Receiver<()>) {
        let mut ticker = interval(Duration::from_secs(self.config.scan_interval_secs));

        // interval()'s first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !self.status.read().await.is_running {
                        break;
                    }

                    info!("Running scheduled refresh for {}", self.name);
                    self.refresh().await;

                    let mut status = self.status.write().await;
                    status.next_scheduled_refresh = Some(
                        Utc::now()
                            + chrono::Duration::seconds(self.config.scan_interval_secs as i64),
                    );
                }
                _ = &mut shutdown_rx => {
                    debug!("Refresh loop for {} received shutdown", self.name);
                    break;
                }
            }
        }
    }
}
