//! Configuration schema.
//!
//! Every field is optional in the YAML file; defaults match the deployed
//! WaterSafe setup. CLI flags and environment variables override file
//! values (see [`crate::config::loader`]).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Proxy ingress and upstream settings.
    pub proxy: ProxySettings,
    /// Catalog sourcing.
    pub catalog: CatalogSettings,
    /// Preference file location.
    pub prefs: PrefsSettings,
}

/// Proxy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Address to bind the ingress listener to. `:8787` and bare `8787`
    /// are accepted shorthands for all interfaces.
    pub bind: String,
    /// The single fixed upstream origin (scheme + host + port).
    pub upstream: String,
    /// Path prefix stripped from inbound requests before forwarding.
    pub ingress_prefix: String,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
            upstream: "http://13.239.237.65:8000".to_string(),
            ingress_prefix: "/api".to_string(),
        }
    }
}

/// Catalog sourcing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Path to an external catalog YAML file. Unset means the compiled-in
    /// dataset.
    pub path: Option<PathBuf>,
}

/// Preference file settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefsSettings {
    /// Path to the preference JSON file. Unset means the default location.
    pub path: Option<PathBuf>,
}

impl PrefsSettings {
    /// Resolves the preference file path: the configured one, else
    /// `$HOME/.config/watersafe/prefs.json`, else `watersafe-prefs.json`
    /// in the working directory.
    #[must_use]
    pub fn resolve_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        std::env::var_os("HOME").map_or_else(
            || PathBuf::from("watersafe-prefs.json"),
            |home| {
                PathBuf::from(home)
                    .join(".config")
                    .join("watersafe")
                    .join("prefs.json")
            },
        )
    }
}
