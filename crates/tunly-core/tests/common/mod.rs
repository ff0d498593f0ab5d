// Shared fakes for tunly-core integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};

use tunly_core::{
    CONNECTED_ACK, CoreConfig, CoreError, Engine, Orchestrator, Profile, ProfileId, Settings,
    Store, Subscription, SubscriptionId, link,
};

pub type TestOrchestrator = Orchestrator<FakeEngine, FakeStore>;

pub fn orchestrator(engine: FakeEngine, store: FakeStore) -> TestOrchestrator {
    Orchestrator::new(engine, store, CoreConfig::default())
}

/// Orchestrator bootstrapped against a store holding `profiles`.
pub async fn bootstrapped(engine: FakeEngine, profiles: Vec<Profile>) -> TestOrchestrator {
    let orch = orchestrator(engine, FakeStore::with_profiles(profiles));
    orch.bootstrap().await.unwrap();
    orch
}

pub fn profile(id: &str) -> Profile {
    Profile {
        id: ProfileId::from(id),
        name: id.to_uppercase(),
        key: key_for(id),
        subscription_id: None,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

pub fn key_for(id: &str) -> String {
    format!("vless://{id}@{id}.example.net:443?security=tls#{id}")
}

/// Let spawned tasks run until they block again.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

// ── FakeEngine ──────────────────────────────────────────────────────

/// Scriptable engine. Start replies are consumed in order; once the
/// script runs out every start succeeds.
#[derive(Default)]
pub struct FakeEngine {
    start_replies: Mutex<VecDeque<Result<String, CoreError>>>,
    latencies: Mutex<HashMap<String, Result<u32, CoreError>>>,
    running: AtomicBool,
    start_delay: Mutex<Duration>,
    stop_delay: Mutex<Duration>,
    probe_delay: Mutex<Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_start(self, reply: Result<&str, CoreError>) -> Self {
        self.start_replies
            .lock()
            .unwrap()
            .push_back(reply.map(str::to_owned));
        self
    }

    pub fn latency(self, id: &str, reply: Result<u32, CoreError>) -> Self {
        self.latencies.lock().unwrap().insert(id.to_owned(), reply);
        self
    }

    pub fn running(self, running: bool) -> Self {
        self.running.store(running, Ordering::SeqCst);
        self
    }

    pub fn start_delay(self, delay: Duration) -> Self {
        *self.start_delay.lock().unwrap() = delay;
        self
    }

    pub fn stop_delay(self, delay: Duration) -> Self {
        *self.stop_delay.lock().unwrap() = delay;
        self
    }

    pub fn probe_delay(self, delay: Duration) -> Self {
        *self.probe_delay.lock().unwrap() = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Engine for FakeEngine {
    async fn start_connection(&self, link: &str) -> Result<String, CoreError> {
        self.record(format!("start {link}"));
        let delay = *self.start_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        let reply = self.start_replies.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Ok(CONNECTED_ACK.to_owned()))
    }

    async fn stop_connection(&self) -> Result<(), CoreError> {
        self.record("stop".to_owned());
        let delay = *self.stop_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        Ok(())
    }

    async fn probe_latency(&self, id: &ProfileId) -> Result<u32, CoreError> {
        self.record(format!("probe {id}"));
        let delay = *self.probe_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        self.latencies
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .unwrap_or(Ok(50))
    }

    async fn running_state(&self) -> Result<bool, CoreError> {
        Ok(self.running.load(Ordering::SeqCst))
    }
}

// ── FakeStore ───────────────────────────────────────────────────────

/// In-memory store mirroring the original desktop backend's behavior.
#[derive(Default)]
pub struct FakeStore {
    profiles: Mutex<Vec<Profile>>,
    subscriptions: Mutex<Vec<Subscription>>,
    settings: Mutex<Settings>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl FakeStore {
    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        let store = Self::default();
        *store.profiles.lock().unwrap() = profiles;
        store
    }

    pub fn with_settings(self, settings: Settings) -> Self {
        *self.settings.lock().unwrap() = settings;
        self
    }

    pub fn with_subscription(self, subscription: Subscription) -> Self {
        self.subscriptions.lock().unwrap().push(subscription);
        self
    }

    pub fn failing_saves(self) -> Self {
        self.fail_saves.store(true, Ordering::SeqCst);
        self
    }

    pub fn saved_settings(&self) -> Settings {
        self.settings.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn remove_profile_directly(&self, id: &str) {
        self.profiles.lock().unwrap().retain(|p| p.id.as_str() != id);
    }
}

impl Store for FakeStore {
    async fn list_profiles(&self) -> Result<Vec<Profile>, CoreError> {
        Ok(self.profiles.lock().unwrap().clone())
    }

    async fn add_profile(&self, link: &str) -> Result<Profile, CoreError> {
        let profile = Profile {
            id: ProfileId::generate(),
            name: link::default_profile_name(link).unwrap_or_else(|| "New Profile".to_owned()),
            key: link.to_owned(),
            subscription_id: None,
            created_at: Utc::now(),
        };
        self.profiles.lock().unwrap().push(profile.clone());
        Ok(profile)
    }

    async fn update_profile(&self, id: &ProfileId, name: &str, key: &str) -> Result<(), CoreError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CoreError::Store {
                message: format!("no profile {id}"),
            })?;
        profile.name = name.to_owned();
        profile.key = key.to_owned();
        Ok(())
    }

    async fn delete_profile(&self, id: &ProfileId) -> Result<(), CoreError> {
        self.profiles.lock().unwrap().retain(|p| &p.id != id);
        Ok(())
    }

    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, CoreError> {
        Ok(self.subscriptions.lock().unwrap().clone())
    }

    async fn create_subscription(&self, url: &str) -> Result<Subscription, CoreError> {
        let subscription = Subscription {
            id: SubscriptionId::generate(),
            name: "New Subscription".to_owned(),
            url: url.to_owned(),
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        self.subscriptions.lock().unwrap().push(subscription.clone());
        Ok(subscription)
    }

    async fn update_subscription(&self, id: &SubscriptionId) -> Result<String, CoreError> {
        let body = "vless://x@one.example:443#One\nvless://y@two.example:443\n";
        let links = link::extract_links(body);
        let mut profiles = self.profiles.lock().unwrap();
        profiles.retain(|p| p.subscription_id.as_ref() != Some(id));
        for key in &links {
            profiles.push(Profile {
                id: ProfileId::generate(),
                name: link::default_profile_name(key).unwrap_or_default(),
                key: key.clone(),
                subscription_id: Some(id.clone()),
                created_at: Utc::now(),
            });
        }
        Ok(format!("Updated: {} profiles", links.len()))
    }

    async fn delete_subscription(&self, id: &SubscriptionId) -> Result<(), CoreError> {
        self.subscriptions.lock().unwrap().retain(|s| &s.id != id);
        self.profiles
            .lock()
            .unwrap()
            .retain(|p| p.subscription_id.as_ref() != Some(id));
        Ok(())
    }

    async fn get_settings(&self) -> Result<Settings, CoreError> {
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), CoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CoreError::Store {
                message: "disk full".to_owned(),
            });
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.settings.lock().unwrap() = settings.clone();
        Ok(())
    }
}
