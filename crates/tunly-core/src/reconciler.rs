// ── Draft vs. active settings ──
//
// The draft is what the user last saved; active is what the running
// engine was started with. They differ exactly when a restart would
// change something.

use std::sync::Arc;

use crate::model::{ProfileId, Settings};
use crate::orchestrator::ConnectionPhase;

/// Tracks the two settings views and whether they diverge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsReconciler {
    draft: Arc<Settings>,
    active: Arc<Settings>,
    dirty: bool,
}

impl Default for SettingsReconciler {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl SettingsReconciler {
    /// Start with draft and active both equal to `settings`.
    pub fn new(settings: Settings) -> Self {
        let shared = Arc::new(settings);
        Self {
            draft: Arc::clone(&shared),
            active: shared,
            dirty: false,
        }
    }

    pub fn draft(&self) -> &Arc<Settings> {
        &self.draft
    }

    pub fn active(&self) -> &Arc<Settings> {
        &self.active
    }

    /// Full structural comparison, rules and domain lists in order.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// "Restart required": connected with a draft the engine isn't running.
    pub fn restart_required(&self, phase: ConnectionPhase) -> bool {
        phase == ConnectionPhase::Connected && self.dirty
    }

    /// Replace the draft. Never touches active.
    pub fn set_draft(&mut self, settings: Settings) {
        self.draft = Arc::new(settings);
        self.recompute();
    }

    /// Snapshot draft into active after the engine accepted it.
    pub fn commit(&mut self) {
        self.active = Arc::clone(&self.draft);
        self.recompute();
    }

    /// Set both views, e.g. after loading from the store.
    pub fn reset(&mut self, settings: Settings) {
        *self = Self::new(settings);
    }

    /// Remember the profile the engine was last started with, in both views.
    pub(crate) fn record_last_profile(&mut self, id: &ProfileId) {
        for view in [&mut self.draft, &mut self.active] {
            if view.last_profile_id.as_ref() != Some(id) {
                Arc::make_mut(view).last_profile_id = Some(id.clone());
            }
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.dirty = !Arc::ptr_eq(&self.draft, &self.active) && self.draft != self.active;
    }
}
