// ── In-memory profile and subscription catalog ──
//
// Mirrors what the store last returned, plus per-profile latency that
// only lives here. Mutations are broadcast to subscribers via `watch`.

mod collection;
mod stream;

use std::collections::HashMap;
use std::sync::Arc;

use collection::{EntityCollection, Keyed};

pub use stream::{EntityStream, Snapshot};

use crate::model::{Latency, Profile, ProfileEntry, ProfileId, Subscription, SubscriptionId};

impl Keyed for ProfileEntry {
    type Key = ProfileId;

    fn key(&self) -> &ProfileId {
        self.id()
    }
}

impl Keyed for Subscription {
    type Key = SubscriptionId;

    fn key(&self) -> &SubscriptionId {
        &self.id
    }
}

/// Reactive view of the stored profiles and subscriptions.
pub struct Catalog {
    profiles: EntityCollection<ProfileEntry>,
    subscriptions: EntityCollection<Subscription>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            profiles: EntityCollection::new(),
            subscriptions: EntityCollection::new(),
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Replace the profile list with a fresh store read. Profiles whose id
    /// survives keep their last measured latency.
    pub(crate) fn apply_profiles(&self, profiles: Vec<Profile>) {
        let previous: HashMap<ProfileId, Latency> = self
            .profiles
            .snapshot()
            .iter()
            .map(|entry| (entry.id().clone(), entry.latency))
            .collect();

        let entries = profiles
            .into_iter()
            .map(|profile| {
                let latency = previous.get(&profile.id).copied().unwrap_or_default();
                ProfileEntry { profile, latency }
            })
            .collect();
        self.profiles.replace_all(entries);
    }

    pub(crate) fn apply_subscriptions(&self, subscriptions: Vec<Subscription>) {
        self.subscriptions.replace_all(subscriptions);
    }

    /// Record a probe result. Returns `false` if the profile is gone.
    pub(crate) fn set_latency(&self, id: &ProfileId, latency: Latency) -> bool {
        self.profiles.update(id, |entry| entry.latency = latency)
    }

    pub(crate) fn clear_latencies(&self) {
        self.profiles.update_all(|entry| {
            let was_set = entry.latency.is_set();
            entry.latency = Latency::Unset;
            was_set
        });
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn profile(&self, id: &ProfileId) -> Option<Arc<ProfileEntry>> {
        self.profiles.get(id)
    }

    pub fn first_profile(&self) -> Option<Arc<ProfileEntry>> {
        self.profiles.first()
    }

    pub fn subscription(&self, id: &SubscriptionId) -> Option<Arc<Subscription>> {
        self.subscriptions.get(id)
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn profiles_snapshot(&self) -> Arc<Vec<Arc<ProfileEntry>>> {
        self.profiles.snapshot()
    }

    pub fn subscriptions_snapshot(&self) -> Arc<Vec<Arc<Subscription>>> {
        self.subscriptions.snapshot()
    }

    // ── Stream accessors ─────────────────────────────────────────────

    pub fn subscribe_profiles(&self) -> EntityStream<ProfileEntry> {
        EntityStream::new(self.profiles.subscribe())
    }

    pub fn subscribe_subscriptions(&self) -> EntityStream<Subscription> {
        EntityStream::new(self.subscriptions.subscribe())
    }
}
