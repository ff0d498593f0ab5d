use serde::{Deserialize, Serialize};

/// Instantaneous up/down byte rates reported by the engine.
///
/// Each sample replaces the previous one; nothing is accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrafficSample {
    pub up: u64,
    pub down: u64,
}

impl TrafficSample {
    pub const ZERO: Self = Self { up: 0, down: 0 };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}
