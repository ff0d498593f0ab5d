// ── Connection orchestrator ──
//
// Owns the authoritative connection state. User operations drive the
// engine through `Engine`; push events arrive via the event bridge and
// are applied unconditionally. Both write the same `watch` channel, so
// whichever lands last wins.

mod data;
mod lifecycle;
mod state;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::{Engine, Store};
use crate::bridge::{EngineEvent, LogBuffer};
use crate::catalog::Catalog;
use crate::config::CoreConfig;
use crate::error::CoreError;
use crate::model::{ProfileEntry, ProfileId, Settings, TrafficSample};
use crate::probe::{self, ProbeReport};

pub use state::{ConnectionPhase, ConnectionSnapshot, ErrorBanner, status};

// ── Orchestrator ─────────────────────────────────────────────────

/// The main entry point for hosts.
///
/// Cheaply cloneable via `Arc<OrchestratorInner>`. Generic over the
/// engine and store the host provides.
pub struct Orchestrator<E: Engine, S: Store> {
    inner: Arc<OrchestratorInner<E, S>>,
}

impl<E: Engine, S: Store> Clone for Orchestrator<E, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct OrchestratorInner<E, S> {
    config: CoreConfig,
    engine: E,
    store: S,
    catalog: Catalog,
    state: watch::Sender<ConnectionSnapshot>,
    banner: watch::Sender<Option<ErrorBanner>>,
    banner_generation: AtomicU64,
    logs: watch::Sender<LogBuffer>,
    /// Held for the whole of toggle / restart / switch / auto-connect.
    lifecycle: Mutex<()>,
    /// Held for the whole of a latency probe pass.
    probe: Mutex<()>,
    /// Cancels pending banner-clear timers on shutdown.
    cancel: CancellationToken,
}

impl<E: Engine, S: Store> Orchestrator<E, S> {
    /// Create an orchestrator. Nothing is loaded until
    /// [`bootstrap()`](Self::bootstrap) is called.
    pub fn new(engine: E, store: S, config: CoreConfig) -> Self {
        let (state, _) = watch::channel(ConnectionSnapshot::default());
        let (banner, _) = watch::channel(None);
        let (logs, _) = watch::channel(LogBuffer::new(config.log_capacity));

        Self {
            inner: Arc::new(OrchestratorInner {
                config,
                engine,
                store,
                catalog: Catalog::new(),
                state,
                banner,
                banner_generation: AtomicU64::new(0),
                logs,
                lifecycle: Mutex::new(()),
                probe: Mutex::new(()),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.inner.config
    }

    pub fn engine(&self) -> &E {
        &self.inner.engine
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Stop background timers. State stays readable.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        debug!("orchestrator shut down");
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        self.inner.state.borrow().clone()
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.inner.state.borrow().phase
    }

    pub fn status(&self) -> String {
        self.inner.state.borrow().status.clone()
    }

    pub fn traffic(&self) -> TrafficSample {
        self.inner.state.borrow().traffic
    }

    pub fn selected(&self) -> Option<ProfileId> {
        self.inner.state.borrow().selected.clone()
    }

    pub fn draft_settings(&self) -> Arc<Settings> {
        Arc::clone(self.inner.state.borrow().settings.draft())
    }

    pub fn active_settings(&self) -> Arc<Settings> {
        Arc::clone(self.inner.state.borrow().settings.active())
    }

    pub fn restart_required(&self) -> bool {
        self.inner.state.borrow().restart_required()
    }

    /// Subscribe to the transient error banner.
    pub fn subscribe_banner(&self) -> watch::Receiver<Option<ErrorBanner>> {
        self.inner.banner.subscribe()
    }

    pub fn error_banner(&self) -> Option<String> {
        self.inner
            .banner
            .borrow()
            .as_ref()
            .map(|b| b.message.clone())
    }

    // ── Logs ─────────────────────────────────────────────────────

    pub fn subscribe_logs(&self) -> watch::Receiver<LogBuffer> {
        self.inner.logs.subscribe()
    }

    /// Oldest-first copy of the retained engine log.
    pub fn log_tail(&self) -> Vec<String> {
        self.inner.logs.borrow().tail()
    }

    pub fn clear_logs(&self) {
        self.inner.logs.send_modify(LogBuffer::clear);
    }

    /// Replace the log with history fetched from the engine at startup.
    pub fn seed_logs<I, T>(&self, lines: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.inner.logs.send_modify(|buf| buf.seed(lines));
    }

    // ── Push events ──────────────────────────────────────────────

    /// Apply one decoded push event. Never blocks and never fails.
    pub fn apply_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::Log(line) => {
                self.inner.logs.send_modify(|buf| buf.push(&line));
            }
            EngineEvent::Traffic(sample) => {
                self.inner.state.send_modify(|s| s.traffic = sample);
            }
            EngineEvent::Error(message) => self.raise_error(message),
            EngineEvent::ConnectionLost(message) => {
                let (status_line, banner) = if message.is_empty() {
                    (status::CRASHED.to_owned(), status::CONNECTION_LOST.to_owned())
                } else {
                    (message.clone(), message)
                };
                warn!(status = %status_line, "engine reported connection lost");
                self.inner.state.send_modify(|s| s.disconnect(status_line));
                self.raise_error(banner);
            }
            EngineEvent::ConnectionStatus { connected: true } => {
                info!("engine reports connected");
                self.inner
                    .state
                    .send_modify(|s| s.set(ConnectionPhase::Connected, status::SECURED));
            }
            EngineEvent::ConnectionStatus { connected: false } => {
                info!("engine reports disconnected");
                self.inner
                    .state
                    .send_modify(|s| s.disconnect(status::DISCONNECTED));
            }
        }
    }

    /// Show `message` as the error banner and schedule its removal.
    ///
    /// A later banner supersedes this one; the earlier timer then finds a
    /// different generation and leaves it alone.
    pub fn raise_error(&self, message: impl Into<String>) {
        let message = message.into();
        let generation = self.inner.banner_generation.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(generation, message = %message, "raising error banner");
        self.inner.banner.send_modify(|banner| {
            *banner = Some(ErrorBanner {
                message,
                generation,
            });
        });

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no runtime to clear error banner; it stays until replaced");
            return;
        };
        let banner = self.inner.banner.clone();
        let ttl = self.inner.config.error_banner_ttl;
        let cancel = self.inner.cancel.clone();
        handle.spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(ttl) => {
                    banner.send_if_modified(|current| {
                        if current.as_ref().is_some_and(|b| b.generation == generation) {
                            *current = None;
                            true
                        } else {
                            false
                        }
                    });
                }
            }
        });
    }

    // ── Latency probe ────────────────────────────────────────────

    /// Probe every profile once, sequentially. A second pass while one is
    /// running is rejected.
    pub async fn probe_latencies(&self) -> Result<ProbeReport, CoreError> {
        let _pass = self
            .inner
            .probe
            .try_lock()
            .map_err(|_| CoreError::busy("latency probe"))?;
        Ok(probe::run(
            &self.inner.engine,
            &self.inner.catalog,
            self.inner.config.timeout_sentinel_ms,
        )
        .await)
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn selected_entry(&self) -> Option<Arc<ProfileEntry>> {
        let id = self.selected()?;
        self.inner.catalog.profile(&id)
    }

    fn update_state(&self, f: impl FnOnce(&mut ConnectionSnapshot)) {
        self.inner.state.send_modify(f);
    }
}
