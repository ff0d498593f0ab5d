// ── Host-provided collaborators ──
//
// The core never runs the tunnel or touches disk itself. The host
// application implements these two traits and hands them to the
// orchestrator; push events come back through `bridge::EventSink`.

use std::future::Future;

use crate::error::CoreError;
use crate::model::{Profile, ProfileId, Settings, Subscription, SubscriptionId};

/// Acknowledgement returned by [`Engine::start_connection`] on success.
/// Anything else is a human-readable failure reason.
pub const CONNECTED_ACK: &str = "Connected";

/// Command surface of the external tunnel engine.
pub trait Engine: Send + Sync + 'static {
    /// Start a tunnel for `link`. Resolves to [`CONNECTED_ACK`] on success.
    fn start_connection(
        &self,
        link: &str,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    fn stop_connection(&self) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Round-trip time in milliseconds; values at or above the timeout
    /// sentinel mean "no response".
    fn probe_latency(&self, id: &ProfileId) -> impl Future<Output = Result<u32, CoreError>> + Send;

    /// Whether a tunnel is already up (e.g. left running by a previous session).
    fn running_state(&self) -> impl Future<Output = Result<bool, CoreError>> + Send;
}

/// Persistence surface for profiles, subscriptions and settings.
pub trait Store: Send + Sync + 'static {
    fn list_profiles(&self) -> impl Future<Output = Result<Vec<Profile>, CoreError>> + Send;

    fn add_profile(&self, link: &str) -> impl Future<Output = Result<Profile, CoreError>> + Send;

    fn update_profile(
        &self,
        id: &ProfileId,
        name: &str,
        key: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete_profile(&self, id: &ProfileId) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn list_subscriptions(
        &self,
    ) -> impl Future<Output = Result<Vec<Subscription>, CoreError>> + Send;

    fn create_subscription(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Subscription, CoreError>> + Send;

    /// Re-download a subscription and replace its profiles. Resolves to a
    /// short summary line (e.g. `"Updated: 3 profiles"`).
    fn update_subscription(
        &self,
        id: &SubscriptionId,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Delete a subscription together with every profile it owns.
    fn delete_subscription(
        &self,
        id: &SubscriptionId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn get_settings(&self) -> impl Future<Output = Result<Settings, CoreError>> + Send;

    fn save_settings(
        &self,
        settings: &Settings,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}
