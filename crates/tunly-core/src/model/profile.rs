// ── Profiles and subscriptions ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::{ProfileId, SubscriptionId};

/// A stored connection profile.
///
/// `key` is the proxy link. Only the codec looks inside it; a key that
/// fails to decode is still a valid profile (raw editing mode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub key: String,
    /// Back-reference to the owning subscription, if any.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::entity_id::empty_as_none"
    )]
    pub subscription_id: Option<SubscriptionId>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Whether this profile was added by hand rather than by a subscription.
    pub fn is_manual(&self) -> bool {
        self.subscription_id.is_none()
    }
}

/// A remote source yielding a batch of profiles on refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub name: String,
    pub url: String,
    /// Unix epoch means "never refreshed".
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn never_updated(&self) -> bool {
        self.updated_at.timestamp() == 0
    }
}

/// Result of the most recent latency probe for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "ms", rename_all = "snake_case")]
pub enum Latency {
    /// Not measured yet (or cleared at the start of a probe pass).
    #[default]
    Unset,
    Measured(u32),
    /// No response; carries the sentinel value reported.
    Timeout(u32),
}

impl Latency {
    /// Classify a raw probe result against the timeout sentinel.
    pub fn from_millis(ms: u32, sentinel: u32) -> Self {
        if ms >= sentinel {
            Self::Timeout(ms)
        } else {
            Self::Measured(ms)
        }
    }

    pub fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }

    pub fn millis(self) -> Option<u32> {
        match self {
            Self::Unset => None,
            Self::Measured(ms) | Self::Timeout(ms) => Some(ms),
        }
    }
}

/// A profile as held by the orchestrator: the stored record plus UI-side
/// state that is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileEntry {
    #[serde(flatten)]
    pub profile: Profile,
    pub latency: Latency,
}

impl ProfileEntry {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            latency: Latency::Unset,
        }
    }

    pub fn id(&self) -> &ProfileId {
        &self.profile.id
    }
}
