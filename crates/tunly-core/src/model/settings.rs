// ── Routing / runtime settings ──
//
// `Settings` is treated as an immutable snapshot: edits produce a new
// value and the reconciler compares whole values structurally.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::{ProfileId, RuleId};

/// Port of the local mixed (HTTP + SOCKS) inbound when none is configured.
pub const DEFAULT_MIXED_PORT: u16 = 2080;

/// Domains routed direct out of the box.
pub const DEFAULT_RU_DOMAINS: [&str; 3] = [".ru", ".rf", ".xn--p1ai"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoutingMode {
    /// Split routing: listed domains and rules go direct, the rest via proxy.
    #[default]
    Smart,
    /// Everything through the proxy.
    Global,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunMode {
    #[default]
    Tun,
    /// Local mixed inbound on `mixed_port`.
    Proxy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuleType {
    Domain,
    Ip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Outbound {
    Direct,
    Proxy,
    Block,
}

/// A user routing override. Position in `Settings::user_rules` is priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRule {
    pub id: RuleId,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub value: String,
    pub outbound: Outbound,
}

impl UserRule {
    pub fn new(rule_type: RuleType, value: impl Into<String>, outbound: Outbound) -> Self {
        Self {
            id: RuleId::generate(),
            rule_type,
            value: value.into(),
            outbound,
        }
    }
}

/// The single live settings value. Held twice by the reconciler: as the
/// user-edited draft and as the snapshot the engine is running with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub routing_mode: RoutingMode,
    #[serde(default)]
    pub run_mode: RunMode,
    /// Only meaningful with [`RunMode::Proxy`].
    #[serde(default = "default_mixed_port")]
    pub mixed_port: u16,
    #[serde(default)]
    pub user_rules: Vec<UserRule>,
    #[serde(default = "default_ru_domains")]
    pub ru_domains: Vec<String>,
    #[serde(default)]
    pub auto_connect: bool,
    #[serde(default, deserialize_with = "super::entity_id::empty_as_none")]
    pub last_profile_id: Option<ProfileId>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            routing_mode: RoutingMode::default(),
            run_mode: RunMode::default(),
            mixed_port: DEFAULT_MIXED_PORT,
            user_rules: Vec::new(),
            ru_domains: default_ru_domains(),
            auto_connect: false,
            last_profile_id: None,
        }
    }
}

impl Settings {
    /// Fill fields a store left zeroed with their defaults.
    pub fn normalized(mut self) -> Self {
        if self.mixed_port == 0 {
            self.mixed_port = DEFAULT_MIXED_PORT;
        }
        if self.ru_domains.is_empty() {
            self.ru_domains = default_ru_domains();
        }
        self
    }

    pub fn with_routing_mode(mut self, mode: RoutingMode) -> Self {
        self.routing_mode = mode;
        self
    }

    pub fn with_run_mode(mut self, mode: RunMode) -> Self {
        self.run_mode = mode;
        self
    }

    pub fn with_mixed_port(mut self, port: u16) -> Self {
        self.mixed_port = port;
        self
    }

    pub fn with_auto_connect(mut self, enabled: bool) -> Self {
        self.auto_connect = enabled;
        self
    }

    /// Append a rule at the lowest priority.
    pub fn with_rule(mut self, rule: UserRule) -> Self {
        self.user_rules.push(rule);
        self
    }

    pub fn without_rule(mut self, id: &RuleId) -> Self {
        self.user_rules.retain(|r| &r.id != id);
        self
    }

    /// Replace the direct-domain list. Entries are trimmed, blanks dropped,
    /// and duplicates removed keeping the first occurrence.
    pub fn with_ru_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = indexmap::IndexSet::new();
        for domain in domains {
            let domain = domain.as_ref().trim();
            if !domain.is_empty() {
                seen.insert(domain.to_owned());
            }
        }
        self.ru_domains = seen.into_iter().collect();
        self
    }

    /// The proxy port the engine will listen on, if any.
    pub fn proxy_port(&self) -> Option<u16> {
        match self.run_mode {
            RunMode::Proxy => Some(self.mixed_port),
            RunMode::Tun => None,
        }
    }
}

fn default_mixed_port() -> u16 {
    DEFAULT_MIXED_PORT
}

fn default_ru_domains() -> Vec<String> {
    DEFAULT_RU_DOMAINS.iter().map(|d| (*d).to_owned()).collect()
}
