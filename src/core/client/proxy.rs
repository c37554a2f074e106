//! Normalization of caller-supplied proxy settings into the shape the transport expects.

use std::collections::{BTreeMap, HashMap};

/// A proxy as callers pass it: either a bare address or a mapping keyed by scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProxySetting {
    /// A bare proxy address such as `http://127.0.0.1:8080`.
    Address(String),
    /// Addresses keyed by scheme (`"https"`, `"http"`).
    Schemes(BTreeMap<String, String>),
}

impl From<&str> for ProxySetting {
    fn from(addr: &str) -> Self {
        Self::Address(addr.to_string())
    }
}

impl From<String> for ProxySetting {
    fn from(addr: String) -> Self {
        Self::Address(addr)
    }
}

impl From<BTreeMap<String, String>> for ProxySetting {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::Schemes(map)
    }
}

impl From<HashMap<String, String>> for ProxySetting {
    fn from(map: HashMap<String, String>) -> Self {
        Self::Schemes(map.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for ProxySetting {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::Schemes(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Transport-level proxy configuration: all traffic is tunnelled through `https`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyConfig {
    /// Proxy address used for HTTPS requests. Not validated.
    pub https: String,
}

impl ProxySetting {
    /// Normalizes this setting.
    ///
    /// A mapping uses its `https` entry, falling back to `http`. A mapping with neither
    /// yields `None` and logs a warning.
    pub fn normalize(&self) -> Option<ProxyConfig> {
        let addr = match self {
            Self::Address(addr) => addr.clone(),
            Self::Schemes(map) => match map.get("https").or_else(|| map.get("http")) {
                Some(addr) => addr.clone(),
                None => {
                    tracing::warn!(
                        schemes = ?map.keys().collect::<Vec<_>>(),
                        "proxy mapping has no https or http entry, connecting directly"
                    );
                    return None;
                }
            },
        };
        Some(ProxyConfig { https: addr })
    }
}

/// Normalizes an optional proxy setting.
pub fn normalize_proxy(proxy: Option<&ProxySetting>) -> Option<ProxyConfig> {
    proxy.and_then(ProxySetting::normalize)
}
