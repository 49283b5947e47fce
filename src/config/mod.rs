use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub webdriver: WebDriverConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub digest: DigestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebDriverConfig {
    /// Endpoint of a running WebDriver server (geckodriver).
    #[serde(default = "default_webdriver_url")]
    pub url: String,
    #[serde(default = "default_true")]
    pub headless: bool,
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: default_webdriver_url(),
            headless: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds between presence polls.
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,
    /// Seconds to wait for a UI marker to render.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    /// Seconds to wait for the logged-in marker during verification.
    #[serde(default = "default_login_timeout")]
    pub login_timeout_secs: u64,
}

fn default_poll_interval() -> u64 {
    2
}

fn default_probe_timeout() -> u64 {
    10
}

fn default_login_timeout() -> u64 {
    5
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            probe_timeout_secs: default_probe_timeout(),
            login_timeout_secs: default_login_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Session snapshot file. Defaults to `session.json` in the data dir.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    /// Transition log directory. Defaults to `logs` in the data dir.
    #[serde(default)]
    pub logs_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Model identifier passed to the summarization service.
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
        }
    }
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.polling.probe_timeout_secs)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.polling.login_timeout_secs)
    }

    pub fn session_file(&self) -> Result<PathBuf> {
        match &self.storage.session_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("session.json")),
        }
    }

    pub fn logs_dir(&self) -> Result<PathBuf> {
        match &self.storage.logs_dir {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("logs")),
        }
    }
}

pub fn config_dir() -> Result<PathBuf> {
    let dir = directories::ProjectDirs::from("", "", "argus")
        .context("Could not determine config directory")?
        .config_dir()
        .to_path_buf();
    Ok(dir)
}

pub fn data_dir() -> Result<PathBuf> {
    let dir = directories::ProjectDirs::from("", "", "argus")
        .context("Could not determine data directory")?
        .data_dir()
        .to_path_buf();
    Ok(dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load the config file, falling back to defaults when none exists.
///
/// Nothing in the config is mandatory, so a missing file is not an error.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        tracing::info!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

    Ok(config)
}
