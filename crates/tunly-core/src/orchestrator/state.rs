// ── Observable connection state ──

use serde::Serialize;
use strum::Display;

use crate::model::{ProfileId, TrafficSample};
use crate::reconciler::SettingsReconciler;

/// User-visible status lines.
pub mod status {
    pub const READY: &str = "Ready";
    pub const SELECT_PROFILE: &str = "Select profile";
    pub const STARTING: &str = "Starting...";
    pub const SECURED: &str = "Secured";
    pub const STOPPING: &str = "Stopping...";
    pub const DISCONNECTED: &str = "Disconnected";
    pub const RESTARTING: &str = "Restarting...";
    pub const SWITCHING: &str = "Switching...";
    /// Status after `connection_lost` with an empty message.
    pub const CRASHED: &str = "Crashed";
    /// Banner after `connection_lost` with an empty message.
    pub const CONNECTION_LOST: &str = "Connection lost unexpectedly";
}

/// Lifecycle phase of the single active connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionPhase {
    #[default]
    Disconnected,
    /// A start, restart or switch is outstanding.
    Connecting,
    Connected,
}

/// Everything the orchestrator publishes through its state channel.
///
/// One value per `send_modify`, so observers never see a phase without
/// the status that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSnapshot {
    pub phase: ConnectionPhase,
    pub status: String,
    pub selected: Option<ProfileId>,
    pub traffic: TrafficSample,
    pub settings: SettingsReconciler,
}

impl Default for ConnectionSnapshot {
    fn default() -> Self {
        Self {
            phase: ConnectionPhase::Disconnected,
            status: status::READY.to_owned(),
            selected: None,
            traffic: TrafficSample::ZERO,
            settings: SettingsReconciler::default(),
        }
    }
}

impl ConnectionSnapshot {
    pub fn is_connected(&self) -> bool {
        self.phase == ConnectionPhase::Connected
    }

    pub fn restart_required(&self) -> bool {
        self.settings.restart_required(self.phase)
    }

    pub(crate) fn set(&mut self, phase: ConnectionPhase, status: impl Into<String>) {
        self.phase = phase;
        self.status = status.into();
    }

    /// Drop to Disconnected with `status`, zeroing traffic.
    pub(crate) fn disconnect(&mut self, status: impl Into<String>) {
        self.set(ConnectionPhase::Disconnected, status);
        self.traffic = TrafficSample::ZERO;
    }
}

/// Transient error message with the generation that raised it.
///
/// A clear timer only removes the banner it was started for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    pub(crate) generation: u64,
}
