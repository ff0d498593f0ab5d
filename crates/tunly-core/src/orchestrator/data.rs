// ── Profile, subscription and settings operations ──
//
// Thin pass-throughs to the store. Each mutation re-reads the affected
// list so the catalog always mirrors what the store holds.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::Orchestrator;
use crate::backend::{Engine, Store};
use crate::error::CoreError;
use crate::model::{Profile, ProfileEntry, ProfileId, Settings, Subscription, SubscriptionId};

impl<E: Engine, S: Store> Orchestrator<E, S> {
    // ── Profiles ─────────────────────────────────────────────────

    /// Re-read profiles from the store. Latencies carry over for ids that
    /// still exist; a selection that vanished falls back to the first
    /// profile.
    pub async fn refresh_profiles(&self) -> Result<Arc<Vec<Arc<ProfileEntry>>>, CoreError> {
        let profiles = self.inner.store.list_profiles().await?;
        debug!(count = profiles.len(), "profiles refreshed");
        self.inner.catalog.apply_profiles(profiles);
        self.reconcile_selection();
        Ok(self.inner.catalog.profiles_snapshot())
    }

    /// Store a new profile from a link. Links that don't decode are still
    /// accepted (raw editing); only a blank link is rejected.
    pub async fn add_profile(&self, link: &str) -> Result<Profile, CoreError> {
        let link = link.trim();
        if link.is_empty() {
            return Err(CoreError::InvalidLink {
                reason: "link is empty".into(),
            });
        }
        let profile = self.inner.store.add_profile(link).await?;
        info!(profile = %profile.id, name = %profile.name, "profile added");
        self.refresh_profiles().await?;
        Ok(profile)
    }

    pub async fn update_profile(
        &self,
        id: &ProfileId,
        name: &str,
        key: &str,
    ) -> Result<(), CoreError> {
        self.require_profile(id)?;
        self.inner.store.update_profile(id, name, key).await?;
        debug!(profile = %id, "profile updated");
        self.refresh_profiles().await?;
        Ok(())
    }

    pub async fn delete_profile(&self, id: &ProfileId) -> Result<(), CoreError> {
        self.require_profile(id)?;
        self.inner.store.delete_profile(id).await?;
        info!(profile = %id, "profile deleted");
        self.refresh_profiles().await?;
        Ok(())
    }

    // ── Subscriptions ────────────────────────────────────────────

    pub async fn refresh_subscriptions(
        &self,
    ) -> Result<Arc<Vec<Arc<Subscription>>>, CoreError> {
        let subscriptions = self.inner.store.list_subscriptions().await?;
        debug!(count = subscriptions.len(), "subscriptions refreshed");
        self.inner.catalog.apply_subscriptions(subscriptions);
        Ok(self.inner.catalog.subscriptions_snapshot())
    }

    pub async fn create_subscription(&self, url: &str) -> Result<Subscription, CoreError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(CoreError::Config {
                message: "subscription URL is empty".into(),
            });
        }
        let subscription = self.inner.store.create_subscription(url).await?;
        info!(subscription = %subscription.id, "subscription created");
        self.refresh_subscriptions().await?;
        Ok(subscription)
    }

    /// Re-download a subscription. Its profiles are replaced by the store,
    /// so both lists are re-read. Resolves to the store's summary line.
    pub async fn update_subscription(&self, id: &SubscriptionId) -> Result<String, CoreError> {
        self.require_subscription(id)?;
        let summary = self.inner.store.update_subscription(id).await?;
        info!(subscription = %id, summary = %summary, "subscription updated");
        self.refresh_subscriptions().await?;
        self.refresh_profiles().await?;
        Ok(summary)
    }

    /// Delete a subscription and, through the store, every profile it owns.
    pub async fn delete_subscription(&self, id: &SubscriptionId) -> Result<(), CoreError> {
        self.require_subscription(id)?;
        self.inner.store.delete_subscription(id).await?;
        info!(subscription = %id, "subscription deleted");
        self.refresh_subscriptions().await?;
        self.refresh_profiles().await?;
        Ok(())
    }

    // ── Settings ─────────────────────────────────────────────────

    /// Make `settings` the new draft and persist it. The running engine is
    /// not touched; `restart_required()` reports the divergence.
    ///
    /// The draft is updated even if persisting fails; the failure is
    /// surfaced as a transient error and returned.
    pub async fn save_settings(&self, settings: Settings) -> Result<(), CoreError> {
        self.update_state(|s| s.settings.set_draft(settings));
        let draft = self.draft_settings();
        if let Err(e) = self.inner.store.save_settings(&draft).await {
            warn!(error = %e, "failed to save settings");
            self.raise_error(e.to_string());
            return Err(e);
        }
        debug!(restart_required = self.restart_required(), "settings saved");
        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn require_profile(&self, id: &ProfileId) -> Result<(), CoreError> {
        if self.inner.catalog.profile(id).is_some() {
            Ok(())
        } else {
            Err(CoreError::ProfileNotFound {
                identifier: id.to_string(),
            })
        }
    }

    fn require_subscription(&self, id: &SubscriptionId) -> Result<(), CoreError> {
        if self.inner.catalog.subscription(id).is_some() {
            Ok(())
        } else {
            Err(CoreError::SubscriptionNotFound {
                identifier: id.to_string(),
            })
        }
    }

    /// Keep the selection pointing at an existing profile.
    fn reconcile_selection(&self) {
        let catalog = &self.inner.catalog;
        self.inner.state.send_if_modified(|s| {
            let still_valid = s
                .selected
                .as_ref()
                .is_some_and(|id| catalog.profile(id).is_some());
            if still_valid {
                return false;
            }
            let fallback = catalog.first_profile().map(|e| e.id().clone());
            if fallback == s.selected {
                return false;
            }
            debug!(from = ?s.selected, to = ?fallback, "selection reset");
            s.selected = fallback;
            true
        });
    }
}
