//! Refresh coordination for Nettleie
//!
//! Owns the polling schedule: a daily fetch through the tariff client, shape
//! validation of the result, and atomic commit of the last-known-good
//! snapshot. A separate minute cadence republishes derived values from the
//! cached snapshot so the current-hour price tracks hour boundaries without
//! network I/O.

use crate::error::{NettleieError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::tariff::{TariffSnapshot, TariffSource};
use crate::values;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::time::{Duration, Instant, interval_at};

/// Refresh cycle state as visible to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshState {
    /// No refresh attempted yet
    Idle,
    /// A fetch is in flight
    Fetching,
    /// Last refresh committed a snapshot
    Success,
    /// Last refresh failed; previous snapshot, if any, is still current
    Failed(String),
}

/// Commands accepted by the coordinator from external components
#[derive(Debug, Clone)]
pub enum CoordinatorCommand {
    /// Trigger an immediate refresh outside the schedule
    RefreshNow,
}

/// Published values map: named derived value -> JSON value
pub type PublishedValues = serde_json::Map<String, serde_json::Value>;

/// Coordinator for one configured credential set
pub struct RefreshCoordinator {
    /// Snapshot source (the tariff client in production)
    source: Arc<dyn TariffSource>,

    /// Interval between scheduled fetches
    refresh_interval: Duration,

    /// Interval between derived-value republications
    republish_interval: Duration,

    /// Last committed snapshot, replaced atomically
    snapshot_tx: watch::Sender<Option<Arc<TariffSnapshot>>>,

    /// Refresh state visible to the host
    state_tx: watch::Sender<RefreshState>,

    /// Latest published derived values
    values_tx: watch::Sender<PublishedValues>,

    /// Serializes fetches; an in-flight fetch suppresses redundant triggers
    in_flight: Mutex<()>,

    /// Logger with context
    logger: StructuredLogger,

    /// Command receiver for external control
    commands_rx: mpsc::UnboundedReceiver<CoordinatorCommand>,

    /// Shutdown signal
    shutdown_tx: mpsc::UnboundedSender<()>,

    /// Shutdown receiver
    shutdown_rx: mpsc::UnboundedReceiver<()>,
}

impl RefreshCoordinator {
    /// Create a new coordinator around a snapshot source
    pub fn new(
        source: Arc<dyn TariffSource>,
        refresh_interval: Duration,
        republish_interval: Duration,
        commands_rx: mpsc::UnboundedReceiver<CoordinatorCommand>,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(None);
        let (state_tx, _) = watch::channel(RefreshState::Idle);
        let (values_tx, _) = watch::channel(PublishedValues::new());
        let (shutdown_tx, shutdown_rx) = mpsc::unbounded_channel();

        Self {
            source,
            refresh_interval,
            republish_interval,
            snapshot_tx,
            state_tx,
            values_tx,
            in_flight: Mutex::new(()),
            logger: get_logger("coordinator"),
            commands_rx,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Run the coordinator loop: one eager refresh, then the daily schedule
    /// plus the minute republication cadence.
    pub async fn run(&mut self) -> Result<()> {
        self.logger.info("Starting refresh coordinator");

        // Eager refresh at startup; a failure here is visible to the host as
        // Failed state ("integration not ready"), not a crash.
        let _ = self.refresh().await;

        let mut fetch_ticks = interval_at(
            Instant::now() + self.refresh_interval,
            self.refresh_interval,
        );
        let mut republish_ticks = interval_at(
            Instant::now() + self.republish_interval,
            self.republish_interval,
        );

        loop {
            tokio::select! {
                _ = fetch_ticks.tick() => {
                    if let Err(e) = self.refresh().await {
                        self.logger.warn(&format!(
                            "Scheduled refresh failed, keeping previous snapshot: {}", e
                        ));
                    }
                }
                _ = republish_ticks.tick() => {
                    // Pure recomputation from the cached snapshot; never fetches
                    self.publish_values();
                }
                Some(cmd) = self.commands_rx.recv() => {
                    match cmd {
                        CoordinatorCommand::RefreshNow => {
                            if let Err(e) = self.refresh().await {
                                self.logger.warn(&format!("On-demand refresh failed: {}", e));
                            }
                        }
                    }
                }
                _ = self.shutdown_rx.recv() => {
                    self.logger.info("Shutdown signal received");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Perform one refresh cycle.
    ///
    /// A fetch already in flight suppresses this trigger. On any failure the
    /// previous last-known-good snapshot stays committed.
    pub async fn refresh(&self) -> Result<()> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            self.logger
                .debug("Refresh already in flight; suppressing redundant trigger");
            return Ok(());
        };

        self.state_tx.send_replace(RefreshState::Fetching);

        match self.source.fetch_data().await {
            Ok(snapshot) => {
                // Shape validation is a post-condition of a successful
                // refresh, not just a successful transport.
                if snapshot.grid_tariff_collections.is_empty() {
                    let reason = "no grid tariff collections in response";
                    self.logger.error(&format!("Refresh failed: {}", reason));
                    self.state_tx
                        .send_replace(RefreshState::Failed(reason.to_string()));
                    return Err(NettleieError::validation("gridTariffCollections", reason));
                }

                self.logger.info(&format!(
                    "Committed tariff snapshot: {} collection(s), {} hour bucket(s)",
                    snapshot.grid_tariff_collections.len(),
                    snapshot.hours().len()
                ));
                self.snapshot_tx.send_replace(Some(Arc::new(snapshot)));
                self.state_tx.send_replace(RefreshState::Success);
                self.publish_values();
                Ok(())
            }
            Err(e) => {
                self.logger.error(&format!("Refresh failed: {}", e));
                self.state_tx.send_replace(RefreshState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Recompute and publish the derived values from the cached snapshot
    pub fn publish_values(&self) {
        let snapshot = self.snapshot_tx.borrow().clone();
        let published = values::collect(snapshot.as_deref());
        self.values_tx.send_replace(published);
    }

    /// Latest committed snapshot, if any
    pub fn snapshot(&self) -> Option<Arc<TariffSnapshot>> {
        self.snapshot_tx.borrow().clone()
    }

    /// Current refresh state
    pub fn state(&self) -> RefreshState {
        self.state_tx.borrow().clone()
    }

    /// Whether the last refresh cycle succeeded.
    ///
    /// The host treats a failed first refresh as "not ready"; later failures
    /// merely leave stale data in place.
    pub fn last_refresh_ok(&self) -> bool {
        matches!(self.state(), RefreshState::Success)
    }

    /// Reachability of the upstream service, derived from fetch outcome
    pub fn is_reachable(&self) -> bool {
        self.last_refresh_ok()
    }

    /// Subscribe to snapshot replacements
    pub fn subscribe_snapshot(&self) -> watch::Receiver<Option<Arc<TariffSnapshot>>> {
        self.snapshot_tx.subscribe()
    }

    /// Subscribe to refresh state transitions
    pub fn subscribe_state(&self) -> watch::Receiver<RefreshState> {
        self.state_tx.subscribe()
    }

    /// Subscribe to published value updates
    pub fn subscribe_values(&self) -> watch::Receiver<PublishedValues> {
        self.values_tx.subscribe()
    }

    /// Request shutdown
    pub fn request_shutdown(&self) {
        self.shutdown_tx.send(()).ok();
    }
}
