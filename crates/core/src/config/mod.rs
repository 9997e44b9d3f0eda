//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PRECACHE_*)
//! 2. TOML config file (if PRECACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Named routing configurations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PolicyName {
    /// Network-first navigation with preload, cache-first core assets and an
    /// offline fallback for everything else.
    #[default]
    OfflineFirst,
    /// Every request served from cache, then network, with no fallback.
    CacheThenNetwork,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PRECACHE_*)
/// 2. TOML config file (if PRECACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via PRECACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Origin of the application being served, e.g. `https://lectura.app`.
    ///
    /// Core asset paths resolve against it, and it decides which requests
    /// count as same-origin.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Prefix of the cache store name.
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,

    /// Cache version. Bumping it replaces every stored entry on activation.
    ///
    /// Set via PRECACHE_CACHE_VERSION environment variable.
    #[serde(default = "default_cache_version")]
    pub cache_version: String,

    /// Paths precached on install and served cache-first.
    ///
    /// Set via PRECACHE_CORE_ASSETS as an array, e.g. `["/","/index.html"]`.
    #[serde(default = "default_core_assets")]
    pub core_assets: Vec<String>,

    /// Key under which every live navigation response is stored.
    #[serde(default = "default_document_path")]
    pub document_path: String,

    /// Page returned when neither network nor cache can answer.
    #[serde(default = "default_offline_path")]
    pub offline_path: String,

    /// Routing configuration.
    ///
    /// Set via PRECACHE_POLICY (`offline_first` or `cache_then_network`).
    #[serde(default)]
    pub policy: PolicyName,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Transport timeout in milliseconds.
    ///
    /// Set via PRECACHE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects the transport follows.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./precache.sqlite")
}

fn default_origin() -> String {
    "http://localhost:8080".into()
}

fn default_cache_prefix() -> String {
    "lectura-static".into()
}

fn default_cache_version() -> String {
    "v3".into()
}

fn default_core_assets() -> Vec<String> {
    ["/", "/index.html", "/style.css", "/manifest.json", "/icon-192.png", "/icon-512.png", "/offline.html"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_document_path() -> String {
    "/index.html".into()
}

fn default_offline_path() -> String {
    "/offline.html".into()
}

fn default_user_agent() -> String {
    "precache/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            origin: default_origin(),
            cache_prefix: default_cache_prefix(),
            cache_version: default_cache_version(),
            core_assets: default_core_assets(),
            document_path: default_document_path(),
            offline_path: default_offline_path(),
            policy: PolicyName::default(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Name of the one cache store valid for this configuration.
    pub fn store_name(&self) -> String {
        crate::cache::store_name(&self.cache_prefix, &self.cache_version)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PRECACHE_`
    /// 2. TOML file from `PRECACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PRECACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PRECACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
