use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::minutes::PollPolicy;
use crate::uploads::CollisionPolicy;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Parent of every session upload directory
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Where generated minutes are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub upload_collision: CollisionPolicy,

    #[serde(default)]
    pub output_collision: CollisionPolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            output_dir: default_output_dir(),
            upload_collision: CollisionPolicy::default(),
            output_collision: CollisionPolicy::default(),
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("dir")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Deserialize)]
pub struct OpenAiConfig {
    /// Provider API key; falls back to `OPENAI_API_KEY` when left empty
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_initial_interval_ms")]
    pub initial_interval_ms: u64,
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: default_initial_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
            multiplier: default_multiplier(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_initial_interval_ms() -> u64 {
    500
}

fn default_max_interval_ms() -> u64 {
    5000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_timeout_secs() -> u64 {
    600
}

/// Floor for configured poll intervals
const MIN_POLL_INTERVAL_MS: u64 = 100;

impl PollingConfig {
    /// Intervals below `MIN_POLL_INTERVAL_MS` are raised to it
    pub fn policy(&self) -> PollPolicy {
        let initial_ms = self.initial_interval_ms.max(MIN_POLL_INTERVAL_MS);
        let max_ms = self.max_interval_ms.max(initial_ms);
        PollPolicy {
            initial_interval: Duration::from_millis(initial_ms),
            max_interval: Duration::from_millis(max_ms),
            multiplier: self.multiplier,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl Config {
    /// Load `path` (any format the `config` crate knows) overlaid with
    /// `MEETING_MINUTES__SECTION__KEY` environment variables.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("MEETING_MINUTES")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let mut cfg: Config = settings
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {}", path))?;

        if cfg.openai.api_key.trim().is_empty() {
            cfg.openai.api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        }
        if cfg.openai.api_key.trim().is_empty() {
            anyhow::bail!(
                "No provider API key configured (set openai.api_key or OPENAI_API_KEY)"
            );
        }

        Ok(cfg)
    }
}
