//! Configuration management for amap-tools.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::endpoint::Operation;
use crate::error::AmapError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub amap: AmapConfig,
    /// Per-operation URL overrides, keyed by tool name.
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Values taken from the environment at load time.
    #[serde(skip)]
    pub env: EnvOverrides,
}

/// Environment snapshot captured by [`AppConfig::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Value of the variable named by `amap.api_key_env`.
    pub api_key: Option<String>,
    /// Per-operation URLs from the `AMAP_*_URL` variables, keyed by tool name.
    pub endpoints: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmapConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_key_env() -> String {
    "AMAP_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for AmapConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".amap-tools").join("config.toml"))
    }

    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Copy every environment override into the config. `lookup` returns
    /// the value of a variable, if set.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(timeout) = set("AMAP_TOOLS_TIMEOUT") {
            self.amap.request_timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("AMAP_TOOLS_TIMEOUT is not a number: {}", timeout))?;
        }

        self.env.api_key = set(&self.amap.api_key_env).map(|k| k.trim().to_string());
        self.env.endpoints = Operation::ALL
            .iter()
            .filter_map(|op| {
                let endpoint = op.endpoint();
                set(endpoint.env_var).map(|url| (endpoint.name.to_string(), url))
            })
            .collect();
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Pick the API key: the caller's own, then the config file, then the
    /// environment.
    pub fn resolve_api_key(&self, explicit: Option<&str>) -> Result<String, AmapError> {
        if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }
        if let Some(key) = self.amap.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }
        match self.env.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => Ok(key.to_string()),
            None => Err(AmapError::Configuration(format!(
                "AMap API key not found. Either:\n  \
                 1. Pass `key` with the request\n  \
                 2. Set api_key in config file: {}\n  \
                 3. Set environment variable: export {}=your-key",
                Self::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                self.amap.api_key_env
            ))),
        }
    }

    /// Environment variable, then `[endpoints]`, then the built-in URL.
    pub fn endpoint_url(&self, operation: Operation) -> String {
        let endpoint = operation.endpoint();
        self.env
            .endpoints
            .get(endpoint.name)
            .or_else(|| self.endpoints.get(endpoint.name))
            .filter(|url| !url.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| endpoint.url.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.amap.request_timeout_secs.max(1))
    }

    /// Write the default config file on first run. Returns the path when a
    /// file was created.
    pub fn ensure_default() -> Result<Option<PathBuf>> {
        let config_path = Self::config_path()?;
        Ok(Self::ensure_default_at(&config_path)?.then_some(config_path))
    }

    pub fn ensure_default_at(config_path: &Path) -> Result<bool> {
        if config_path.exists() {
            return Ok(false);
        }
        Self::save_default_to(config_path)?;
        Ok(true)
    }

    pub fn save_default_to(config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content =
            toml::to_string_pretty(&Self::default()).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))
    }
}
