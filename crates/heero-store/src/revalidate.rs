//! Stale-while-revalidate controller.
//!
//! On [`spawn`] the cached load is read on a blocking task while the first
//! network fetch runs. Whatever arrives is published through a
//! [`tokio::sync::watch`] channel as a [`LoadState`]. Afterwards the source is
//! refetched on a fixed interval, or on demand through
//! [`RevalidationHandle::refresh`]. Fetches never overlap.
//!
//! Every cache read and fetch takes a ticket from a monotonically increasing
//! counter, and a result is only published if its ticket is newer than the
//! last one published. A slow cache read therefore cannot replace data from a
//! fetch that started after it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use heero_core::{AppConfig, LocationRecord};
use heero_loader::{LoaderError, SourceLoader};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::cache::{now_ms, read_cache, write_cache, CacheEntry};
use crate::kv::KeyValueStore;

/// Anything that can produce the full location list.
pub trait LocationSource: Send + Sync + 'static {
    type Error: std::fmt::Display + Send;

    fn fetch(&self) -> impl Future<Output = Result<Vec<LocationRecord>, Self::Error>> + Send;
}

impl LocationSource for SourceLoader {
    type Error = LoaderError;

    fn fetch(&self) -> impl Future<Output = Result<Vec<LocationRecord>, LoaderError>> + Send {
        self.load_all()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Served from storage; `fresh` is false once the entry is older than the TTL.
    Cached { fresh: bool },
    Fresh,
}

#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Ready {
        records: Arc<Vec<LocationRecord>>,
        origin: Origin,
        /// Ticket of the read or fetch that produced `records`.
        generation: u64,
    },
    /// Nothing could be shown: no usable cache and the fetch failed.
    Failed { message: String },
}

impl LoadState {
    #[must_use]
    pub fn records(&self) -> Option<&Arc<Vec<LocationRecord>>> {
        match self {
            LoadState::Ready { records, .. } => Some(records),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevalidatorConfig {
    pub ttl: Duration,
    pub interval: Duration,
}

impl RevalidatorConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            ttl: Duration::from_secs(config.cache_ttl_secs),
            interval: Duration::from_secs(config.refresh_interval_secs),
        }
        .checked()
    }

    /// A zero refresh interval is replaced by the default one. A zero TTL is
    /// kept and marks every cache hit as stale.
    #[must_use]
    pub fn checked(self) -> Self {
        if !self.interval.is_zero() {
            return self;
        }
        let interval = Self::default().interval;
        tracing::warn!(
            interval_secs = interval.as_secs(),
            "refresh interval must be non-zero, using default"
        );
        Self { interval, ..self }
    }
}

impl Default for RevalidatorConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
            interval: Duration::from_secs(5 * 60),
        }
    }
}

/// Owner of the background task. Dropping it cancels the task.
pub struct RevalidationHandle {
    state: watch::Receiver<LoadState>,
    refresh: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl RevalidationHandle {
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.clone()
    }

    #[must_use]
    pub fn current(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Queue a fetch. Requests made while one is already queued are merged.
    /// Returns `false` once the task has stopped.
    pub fn refresh(&self) -> bool {
        match self.refresh.try_send(()) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(())) => true,
            Err(mpsc::error::TrySendError::Closed(())) => false,
        }
    }

    /// Cancel the task, including any fetch in flight, and wait for it to stop.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            // Cancellation is the expected outcome here.
            let _ = task.await;
        }
    }
}

impl Drop for RevalidationHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Start the revalidation loop for `source`, caching into `store`.
///
/// Must be called from within a tokio runtime. `config` goes through
/// [`RevalidatorConfig::checked`] first.
pub fn spawn<S>(store: Arc<dyn KeyValueStore>, source: Arc<S>, config: RevalidatorConfig) -> RevalidationHandle
where
    S: LocationSource,
{
    let config = config.checked();
    let (state_tx, state_rx) = watch::channel(LoadState::Loading);
    let (refresh_tx, refresh_rx) = mpsc::channel(1);

    let revalidator = Revalidator {
        store,
        source,
        config,
        state: state_tx,
        tickets: Tickets::default(),
        displayed: false,
    };
    let task = tokio::spawn(revalidator.run(refresh_rx));

    RevalidationHandle {
        state: state_rx,
        refresh: refresh_tx,
        task: Some(task),
    }
}

#[derive(Debug, Default)]
struct Tickets {
    issued: u64,
    applied: u64,
}

impl Tickets {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Marks `ticket` applied if it is newer than everything applied so far.
    fn accept(&mut self, ticket: u64) -> bool {
        if ticket > self.applied {
            self.applied = ticket;
            true
        } else {
            false
        }
    }
}

struct Revalidator<S> {
    store: Arc<dyn KeyValueStore>,
    source: Arc<S>,
    config: RevalidatorConfig,
    state: watch::Sender<LoadState>,
    tickets: Tickets,
    displayed: bool,
}

impl<S: LocationSource> Revalidator<S> {
    async fn run(mut self, mut refresh_rx: mpsc::Receiver<()>) {
        self.initial_load().await;

        let mut ticker = tokio::time::interval_at(Instant::now() + self.config.interval, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("periodic revalidation");
                }
                request = refresh_rx.recv() => {
                    if request.is_none() {
                        break;
                    }
                    tracing::debug!("manual revalidation");
                }
            }

            let ticket = self.tickets.issue();
            let result = self.source.fetch().await;
            if let Err(message) = self.apply_fetch(ticket, result).await {
                if !self.displayed {
                    self.publish_failure(&message);
                }
            }
        }
        tracing::debug!("revalidation loop stopped");
    }

    async fn initial_load(&mut self) {
        let cache_ticket = self.tickets.issue();
        let store = Arc::clone(&self.store);
        let mut cache_read = tokio::task::spawn_blocking(move || read_cache(store.as_ref()));

        let fetch_ticket = self.tickets.issue();
        let source = Arc::clone(&self.source);
        let fetch = source.fetch();
        tokio::pin!(fetch);

        let mut cache_pending = true;
        let fetched = loop {
            tokio::select! {
                cached = &mut cache_read, if cache_pending => {
                    cache_pending = false;
                    self.apply_cache(cache_ticket, cached.ok().flatten());
                }
                result = &mut fetch => break result,
            }
        };

        let outcome = self.apply_fetch(fetch_ticket, fetched).await;

        if cache_pending {
            let cached = cache_read.await.ok().flatten();
            self.apply_cache(cache_ticket, cached);
        }
        if let Err(message) = outcome {
            if !self.displayed {
                self.publish_failure(&message);
            }
        }
    }

    fn apply_cache(&mut self, ticket: u64, entry: Option<CacheEntry>) {
        let Some(entry) = entry.filter(|e| !e.data.is_empty()) else {
            tracing::debug!("no usable location cache");
            return;
        };
        if !self.tickets.accept(ticket) {
            tracing::debug!(ticket, "discarding cache read older than applied data");
            return;
        }

        let fresh = entry.is_fresh(now_ms(), self.config.ttl);
        let age_secs = entry.age(now_ms()).as_secs();
        tracing::info!(records = entry.data.len(), age_secs, fresh, "showing cached locations");
        self.displayed = true;
        self.state.send_replace(LoadState::Ready {
            records: Arc::new(entry.data),
            origin: Origin::Cached { fresh },
            generation: ticket,
        });
    }

    /// Publish a successful fetch. A failure is logged and handed back as a
    /// message; the caller decides whether it replaces the current state.
    async fn apply_fetch(
        &mut self,
        ticket: u64,
        result: Result<Vec<LocationRecord>, S::Error>,
    ) -> Result<(), String> {
        match result {
            Ok(records) => {
                if !self.tickets.accept(ticket) {
                    tracing::debug!(ticket, "discarding fetch older than applied data");
                    return Ok(());
                }
                tracing::info!(records = records.len(), generation = ticket, "locations revalidated");
                self.displayed = true;

                let entry = CacheEntry::new(now_ms(), records.clone());
                let store = Arc::clone(&self.store);
                if let Err(e) =
                    tokio::task::spawn_blocking(move || write_cache(store.as_ref(), &entry)).await
                {
                    tracing::warn!(error = %e, "cache write task failed");
                }

                self.state.send_replace(LoadState::Ready {
                    records: Arc::new(records),
                    origin: Origin::Fresh,
                    generation: ticket,
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, displayed = self.displayed, "location fetch failed");
                Err(e.to_string())
            }
        }
    }

    fn publish_failure(&self, message: &str) {
        tracing::error!(error = message, "no locations available");
        self.state.send_replace(LoadState::Failed {
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "revalidate_test.rs"]
mod tests;
