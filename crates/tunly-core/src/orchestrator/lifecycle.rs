// ── Lifecycle operations ──
//
// toggle / restart / switch / auto-connect / bootstrap. Engine calls are
// awaited without holding the state channel, so push events may land in
// between; the lifecycle guard only keeps user operations from
// overlapping each other.

use std::sync::Arc;

use tokio::sync::MutexGuard;
use tracing::{debug, info, warn};

use super::{ConnectionPhase, Orchestrator, status};
use crate::backend::{CONNECTED_ACK, Engine, Store};
use crate::error::CoreError;
use crate::model::{ProfileEntry, ProfileId};

impl<E: Engine, S: Store> Orchestrator<E, S> {
    /// Connect when disconnected, disconnect when connected.
    ///
    /// Without a selected profile the status becomes "Select profile" and
    /// [`CoreError::NoProfileSelected`] is returned. A failed start rolls
    /// back to Disconnected with the engine's reason as status and banner.
    pub async fn toggle(&self) -> Result<ConnectionPhase, CoreError> {
        let _guard = self.lifecycle_guard("toggle")?;
        match self.phase() {
            ConnectionPhase::Disconnected => self.start_selected(status::STARTING).await,
            ConnectionPhase::Connected => {
                self.stop().await;
                Ok(ConnectionPhase::Disconnected)
            }
            ConnectionPhase::Connecting => Err(CoreError::InvalidState {
                operation: "toggle".into(),
                state: ConnectionPhase::Connecting.to_string(),
            }),
        }
    }

    /// Stop and start again against the selected profile, picking up the
    /// current draft settings. Only valid while connected.
    pub async fn restart(&self) -> Result<ConnectionPhase, CoreError> {
        let _guard = self.lifecycle_guard("restart")?;
        let phase = self.phase();
        if phase != ConnectionPhase::Connected {
            return Err(CoreError::InvalidState {
                operation: "restart".into(),
                state: phase.to_string(),
            });
        }

        self.update_state(|s| s.set(ConnectionPhase::Connecting, status::RESTARTING));
        self.stop_engine().await;

        let Some(entry) = self.selected_entry() else {
            self.update_state(|s| s.disconnect(status::SELECT_PROFILE));
            return Err(CoreError::NoProfileSelected);
        };
        self.launch(&entry).await
    }

    /// Select `id`. If connected, also move the tunnel over to it.
    pub async fn switch_profile(&self, id: &ProfileId) -> Result<ConnectionPhase, CoreError> {
        let Some(entry) = self.inner.catalog.profile(id) else {
            return Err(CoreError::ProfileNotFound {
                identifier: id.to_string(),
            });
        };

        if self.phase() != ConnectionPhase::Connected {
            self.update_state(|s| s.selected = Some(id.clone()));
            debug!(profile = %id, "selection changed");
            return Ok(self.phase());
        }

        let _guard = self.lifecycle_guard("switch")?;
        self.update_state(|s| {
            s.selected = Some(id.clone());
            s.set(ConnectionPhase::Connecting, status::SWITCHING);
        });
        self.stop_engine().await;
        self.launch(&entry).await
    }

    /// Reconnect to the last used profile if the user enabled it.
    ///
    /// Resolves to `None` when there was nothing to do: auto-connect off,
    /// no remembered profile, a remembered id that no longer exists, or a
    /// connection that is already up.
    pub async fn auto_connect(&self) -> Result<Option<ConnectionPhase>, CoreError> {
        let settings = self.draft_settings();
        if !settings.auto_connect {
            return Ok(None);
        }
        let Some(id) = settings.last_profile_id.clone() else {
            return Ok(None);
        };
        if self.inner.catalog.profile(&id).is_none() {
            debug!(profile = %id, "last profile no longer exists, skipping auto-connect");
            return Ok(None);
        }

        let _guard = self.lifecycle_guard("auto-connect")?;
        if self.phase() != ConnectionPhase::Disconnected {
            return Ok(None);
        }
        info!(profile = %id, "auto-connecting");
        self.update_state(|s| s.selected = Some(id));
        self.start_selected(status::STARTING).await.map(Some)
    }

    /// Load settings, profiles and subscriptions from the store, then adopt
    /// a tunnel the engine may already be running.
    pub async fn bootstrap(&self) -> Result<(), CoreError> {
        let settings = self.inner.store.get_settings().await?.normalized();
        self.update_state(|s| s.settings.reset(settings));

        self.refresh_profiles().await?;
        self.refresh_subscriptions().await?;

        match self.inner.engine.running_state().await {
            Ok(true) => {
                info!("engine already running, adopting connection");
                self.update_state(|s| s.set(ConnectionPhase::Connected, status::SECURED));
            }
            Ok(false) => {}
            Err(e) => warn!(error = %e, "could not query engine running state"),
        }

        debug!(
            profiles = self.inner.catalog.profile_count(),
            "bootstrap complete"
        );
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────

    fn lifecycle_guard(&self, operation: &str) -> Result<MutexGuard<'_, ()>, CoreError> {
        self.inner.lifecycle.try_lock().map_err(|_| {
            debug!(operation, "lifecycle operation already in progress");
            CoreError::busy(operation)
        })
    }

    async fn start_selected(&self, starting: &str) -> Result<ConnectionPhase, CoreError> {
        let Some(entry) = self.selected_entry() else {
            self.update_state(|s| s.status = status::SELECT_PROFILE.to_owned());
            return Err(CoreError::NoProfileSelected);
        };
        self.update_state(|s| s.set(ConnectionPhase::Connecting, starting));
        self.launch(&entry).await
    }

    /// Issue the start command and settle the outcome.
    async fn launch(&self, entry: &Arc<ProfileEntry>) -> Result<ConnectionPhase, CoreError> {
        let id = entry.id().clone();
        debug!(profile = %id, "starting connection");

        let reason = match self.inner.engine.start_connection(&entry.profile.key).await {
            Ok(ack) if ack == CONNECTED_ACK => {
                self.update_state(|s| {
                    s.set(ConnectionPhase::Connected, status::SECURED);
                    s.settings.commit();
                    s.settings.record_last_profile(&id);
                });
                info!(profile = %id, name = %entry.profile.name, "connected");
                self.persist_last_profile().await;
                return Ok(ConnectionPhase::Connected);
            }
            Ok(reason) => reason,
            Err(e) => failure_text(&e),
        };

        warn!(profile = %id, reason = %reason, "start failed");
        self.update_state(|s| s.disconnect(reason.clone()));
        self.raise_error(reason.clone());
        Err(CoreError::engine(reason))
    }

    /// The phase stays Connected until the engine confirms the stop.
    async fn stop(&self) {
        self.update_state(|s| s.status = status::STOPPING.to_owned());
        self.stop_engine().await;
        self.update_state(|s| s.disconnect(status::DISCONNECTED));
        info!("disconnected");
    }

    /// Stop errors are logged and otherwise ignored: the engine is expected
    /// to be down afterwards either way.
    async fn stop_engine(&self) {
        if let Err(e) = self.inner.engine.stop_connection().await {
            warn!(error = %e, "stop command failed");
        }
    }

    async fn persist_last_profile(&self) {
        let settings = self.draft_settings();
        if let Err(e) = self.inner.store.save_settings(&settings).await {
            warn!(error = %e, "failed to persist last profile");
        }
    }
}

/// Status text for an engine error: the bare message for engine-reported
/// failures, the full display text otherwise.
fn failure_text(err: &CoreError) -> String {
    match err {
        CoreError::Engine { message } => message.clone(),
        other => other.to_string(),
    }
}
