mod defaults;


use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::WeComError;
use defaults::*;

/// Environment variable overriding `corp_id`.
pub const ENV_CORP_ID: &str = "WECOM_CORP_ID";
/// Environment variable overriding `corp_secret`.
pub const ENV_CORP_SECRET: &str = "WECOM_CORP_SECRET";

/// Top-level config file layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub wecom: WeComConfig,
}

/// WeCom application client settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct WeComConfig {
    #[serde(default)]
    pub corp_id: String,
    #[serde(default)]
    pub corp_secret: String,
    /// Default application used when building messages through the client.
    #[serde(default)]
    pub agent_id: Option<i64>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout (connect + transfer).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Share of `expires_in` the token is cached for, in (0, 1].
    #[serde(default = "default_token_lifetime_fraction")]
    pub token_lifetime_fraction: f64,
}

impl WeComConfig {
    /// Config with every optional field at its default.
    pub fn new(corp_id: impl Into<String>, corp_secret: impl Into<String>) -> Self {
        Self {
            corp_id: corp_id.into(),
            corp_secret: corp_secret.into(),
            agent_id: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            token_lifetime_fraction: default_token_lifetime_fraction(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_agent_id(mut self, agent_id: i64) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Base URL without a trailing slash.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Replace identity fields with non-empty values from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup(ENV_CORP_ID).filter(|v| !v.is_empty()) {
            self.corp_id = id;
        }
        if let Some(secret) = lookup(ENV_CORP_SECRET).filter(|v| !v.is_empty()) {
            self.corp_secret = secret;
        }
    }

    pub fn validate(&self) -> Result<(), WeComError> {
        if self.corp_id.trim().is_empty() {
            return Err(WeComError::Config("corp_id is empty".to_string()));
        }
        if self.corp_secret.trim().is_empty() {
            return Err(WeComError::Config("corp_secret is empty".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(WeComError::Config(format!(
                "base_url must be http(s), got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(WeComError::Config("timeouts must be non-zero".to_string()));
        }
        let fraction = self.token_lifetime_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(WeComError::Config(format!(
                "token_lifetime_fraction must be in (0, 1], got {fraction}"
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for WeComConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeComConfig")
            .field("corp_id", &self.corp_id)
            .field("corp_secret", &"<redacted>")
            .field("agent_id", &self.agent_id)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("token_lifetime_fraction", &self.token_lifetime_fraction)
            .finish()
    }
}

/// Parse a config document and validate it after environment overrides.
pub fn from_toml_str<F>(content: &str, lookup: F) -> Result<WeComConfig, WeComError>
where
    F: Fn(&str) -> Option<String>,
{
    let config: Config = toml::from_str(content)
        .map_err(|e| WeComError::Config(format!("failed to parse config: {e}")))?;
    let mut wecom = config.wecom;
    wecom.apply_overrides(lookup);
    wecom.validate()?;
    Ok(wecom)
}

/// Load config from a TOML file, falling back to `WECOM_*` environment
/// variables when the file does not exist.
pub fn load(path: &str) -> Result<WeComConfig, WeComError> {
    let path = Path::new(path);
    let env = |key: &str| std::env::var(key).ok();

    if !path.exists() {
        info!(
            "Config file not found at {}, using environment",
            path.display()
        );
        let mut config = WeComConfig::new(String::new(), String::new());
        config.apply_overrides(env);
        config.validate()?;
        return Ok(config);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| WeComError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    from_toml_str(&content, env)
}
