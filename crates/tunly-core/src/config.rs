// ── Runtime tuning for the core ──
//
// Describes buffer sizes and timings used by the orchestrator and the
// event bridge. Never touches disk: the config crate (or a test) builds
// a `CoreConfig` and hands it in.

use std::time::Duration;

/// Lines retained by the log ring buffer.
pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// How long a transient error banner stays visible.
pub const DEFAULT_ERROR_BANNER_TTL: Duration = Duration::from_secs(5);

/// Capacity of each per-event push channel.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Latency values at or above this are treated as "no response".
pub const DEFAULT_TIMEOUT_SENTINEL_MS: u32 = 999;

/// Configuration for one orchestrator / event bridge pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Maximum number of log lines kept in memory.
    pub log_capacity: usize,
    /// Lifetime of a transient error banner.
    pub error_banner_ttl: Duration,
    /// Bounded capacity of every push-event channel.
    pub event_channel_capacity: usize,
    /// Latency sentinel meaning "timed out".
    pub timeout_sentinel_ms: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            error_banner_ttl: DEFAULT_ERROR_BANNER_TTL,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            timeout_sentinel_ms: DEFAULT_TIMEOUT_SENTINEL_MS,
        }
    }
}
