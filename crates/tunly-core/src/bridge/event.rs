// ── Typed push events ──
//
// Engine payloads arrive as loosely typed strings. They are decoded here,
// once, before anything touches orchestrator state.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::debug;

use crate::model::TrafficSample;

/// Push channel names the engine emits on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    Log,
    Traffic,
    Error,
    ConnectionLost,
    ConnectionStatus,
}

/// A decoded push event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Log(String),
    Traffic(TrafficSample),
    Error(String),
    /// Engine died or dropped the tunnel. May carry an empty message.
    ConnectionLost(String),
    /// Authoritative "is the tunnel up" report.
    ConnectionStatus { connected: bool },
}

impl EngineEvent {
    /// Decode a raw payload for `kind`.
    ///
    /// Returns `None` for payloads that don't fit the channel (currently
    /// only malformed traffic JSON); those are dropped by the caller.
    pub fn decode(kind: EventKind, payload: String) -> Option<Self> {
        match kind {
            EventKind::Log => Some(Self::Log(payload)),
            EventKind::Error => Some(Self::Error(payload)),
            EventKind::ConnectionLost => Some(Self::ConnectionLost(payload)),
            EventKind::ConnectionStatus => Some(Self::ConnectionStatus {
                connected: payload == "connected",
            }),
            EventKind::Traffic => match serde_json::from_str::<TrafficSample>(&payload) {
                Ok(sample) => Some(Self::Traffic(sample)),
                Err(e) => {
                    debug!(error = %e, payload = %payload, "ignoring malformed traffic sample");
                    None
                }
            },
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Log(_) => EventKind::Log,
            Self::Traffic(_) => EventKind::Traffic,
            Self::Error(_) => EventKind::Error,
            Self::ConnectionLost(_) => EventKind::ConnectionLost,
            Self::ConnectionStatus { .. } => EventKind::ConnectionStatus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_parse_from_wire() {
        assert_eq!("connection_lost".parse::<EventKind>().ok(), Some(EventKind::ConnectionLost));
        assert_eq!(EventKind::ConnectionStatus.as_ref(), "connection_status");
        assert!("status".parse::<EventKind>().is_err());
    }

    #[test]
    fn traffic_decodes_json_and_drops_garbage() {
        assert_eq!(
            EngineEvent::decode(EventKind::Traffic, r#"{"up":10,"down":2048}"#.into()),
            Some(EngineEvent::Traffic(TrafficSample { up: 10, down: 2048 }))
        );
        assert_eq!(EngineEvent::decode(EventKind::Traffic, "not json".into()), None);
        assert_eq!(EngineEvent::decode(EventKind::Traffic, r#"{"up":-1}"#.into()), None);
    }

    #[test]
    fn only_exact_connected_means_connected() {
        for (payload, connected) in [("connected", true), ("disconnected", false), ("", false)] {
            assert_eq!(
                EngineEvent::decode(EventKind::ConnectionStatus, payload.into()),
                Some(EngineEvent::ConnectionStatus { connected })
            );
        }
    }
}
