// ── Domain model ──
//
// Plain data shared by every other module. Nothing here talks to the
// engine or the store.

pub mod entity_id;
pub mod profile;
pub mod settings;
pub mod traffic;
pub mod vless;

pub use entity_id::{ProfileId, RuleId, SubscriptionId};
pub use profile::{Latency, Profile, ProfileEntry, Subscription};
pub use settings::{
    DEFAULT_MIXED_PORT, DEFAULT_RU_DOMAINS, Outbound, RoutingMode, RuleType, RunMode, Settings,
    UserRule,
};
pub use traffic::TrafficSample;
pub use vless::{Security, Transport, UnknownParam, VlessConfig};
