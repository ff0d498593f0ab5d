// tunly-core: link codec and connection orchestration for the tunly proxy client.

pub mod backend;
pub mod bridge;
pub mod catalog;
pub mod config;
pub mod error;
pub mod link;
pub mod model;
pub mod orchestrator;
pub mod probe;
pub mod reconciler;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{CONNECTED_ACK, Engine, Store};
pub use bridge::{EngineEvent, EventBridge, EventKind, EventSink, LogBuffer};
pub use catalog::{Catalog, EntityStream, Snapshot};
pub use config::CoreConfig;
pub use error::CoreError;
pub use orchestrator::{ConnectionPhase, ConnectionSnapshot, ErrorBanner, Orchestrator};
pub use probe::{ProbeReport, ProbeResult};
pub use reconciler::SettingsReconciler;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Entities
    Latency, Profile, ProfileEntry, ProfileId, Subscription, SubscriptionId,
    // Settings
    Outbound, RoutingMode, RuleId, RuleType, RunMode, Settings, UserRule,
    // Link form and telemetry
    Security, TrafficSample, Transport, UnknownParam, VlessConfig,
};
