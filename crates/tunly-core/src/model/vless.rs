// ── Structured form of a proxy link ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `security=` or `type=` value outside the known set, kept verbatim so
/// an edit round trip never rewrites a parameter the engine understands
/// but we don't.
///
/// Only `from_param` builds one, so it is never empty and never spells a
/// known variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownParam(String);

impl UnknownParam {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Transport security layer of a link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Security {
    #[default]
    None,
    Tls,
    Reality,
    Other(UnknownParam),
}

impl Security {
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Tls => "tls",
            Self::Reality => "reality",
            Self::Other(value) => value.as_str(),
        }
    }

    /// Decode a query value. Empty means absent, which maps to the default.
    pub fn from_param(value: &str) -> Self {
        match value {
            "" | "none" => Self::None,
            "tls" => Self::Tls,
            "reality" => Self::Reality,
            other => Self::Other(UnknownParam(other.to_owned())),
        }
    }
}

/// Stream transport of a link (`type=` parameter).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Transport {
    #[default]
    Tcp,
    Ws,
    Grpc,
    Http,
    Other(UnknownParam),
}

impl Transport {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Tcp => "tcp",
            Self::Ws => "ws",
            Self::Grpc => "grpc",
            Self::Http => "http",
            Self::Other(value) => value.as_str(),
        }
    }

    pub fn from_param(value: &str) -> Self {
        match value {
            "" | "tcp" => Self::Tcp,
            "ws" => Self::Ws,
            "grpc" => Self::Grpc,
            "http" => Self::Http,
            other => Self::Other(UnknownParam(other.to_owned())),
        }
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Both enums travel as their wire string so JSON/YAML output matches the link.

impl Serialize for Security {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Security {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_param(&raw))
    }
}

impl Serialize for Transport {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Transport {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_param(&raw))
    }
}

/// Decoded `vless://` link.
///
/// Every string field defaults to empty. `port` stays textual: the codec
/// passes through exactly what the link carried.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VlessConfig {
    pub uuid: String,
    pub address: String,
    pub port: String,
    pub name: String,
    pub security: Security,
    #[serde(rename = "type")]
    pub transport: Transport,
    pub flow: String,
    pub sni: String,
    pub pbk: String,
    pub sid: String,
    pub fp: String,
    pub path: String,
    pub host: String,
}

impl VlessConfig {
    /// Whether the positional parts needed for a lossless round trip are set.
    pub fn has_endpoint(&self) -> bool {
        !self.uuid.is_empty() && !self.address.is_empty() && !self.port.is_empty()
    }

    /// The optional query parameters in canonical emission order.
    pub fn query_params(&self) -> [(&'static str, &str); 9] {
        [
            ("security", self.security.as_str()),
            ("type", self.transport.as_str()),
            ("flow", &self.flow),
            ("sni", &self.sni),
            ("pbk", &self.pbk),
            ("sid", &self.sid),
            ("fp", &self.fp),
            ("path", &self.path),
            ("host", &self.host),
        ]
    }
}
