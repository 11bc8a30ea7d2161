use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AizhongError, AizhongResult, DEFAULT_REQUEST_TIMEOUT_SECS};

/// History entries a coordinator keeps when no size is configured.
pub const DEFAULT_HISTORY_SIZE: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AizhongConfig {
    pub account: AccountConfig,
    pub provider: ProviderConfig,
    pub refresh: RefreshConfig,
    pub logging: LoggingConfig,
}

/// The credential pair collected once at setup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AccountConfig {
    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider host. Overridable mainly for tests.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout applied to every provider exchange.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between automatic refresh cycles.
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,

    /// Number of per-cycle history entries retained by a coordinator.
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_base_url() -> String {
    "https://yxxt2.aaapublic.com".to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_scan_interval() -> u64 {
    3600
}

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scan_interval_secs: default_scan_interval(),
            history_size: default_history_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl RefreshConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }
}

impl AizhongConfig {
    pub fn load() -> AizhongResult<Self> {
        Self::load_from_paths(get_config_paths())
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> AizhongResult<Self> {
        load_dotenv_files();

        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("AIZHONG")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;

        let mut aizhong_config: AizhongConfig = config.try_deserialize().unwrap_or_default();

        // Short-form environment names take precedence over file values.
        if let Ok(phone) = std::env::var("AIZHONG_PHONE") {
            aizhong_config.account.phone = phone;
        }
        if let Ok(password) = std::env::var("AIZHONG_PASSWORD") {
            aizhong_config.account.password = password;
        }
        if let Ok(base_url) = std::env::var("AIZHONG_BASE_URL") {
            aizhong_config.provider.base_url = base_url;
        }
        if let Ok(interval) = std::env::var("AIZHONG_SCAN_INTERVAL") {
            if let Ok(secs) = interval.parse() {
                aizhong_config.refresh.scan_interval_secs = secs;
            }
        }
        if let Ok(timeout) = std::env::var("AIZHONG_REQUEST_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                aizhong_config.provider.request_timeout_secs = secs;
            }
        }
        if let Ok(level) = std::env::var("AIZHONG_LOG_LEVEL") {
            aizhong_config.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            aizhong_config.logging.level = level;
        }

        aizhong_config.validate()?;

        Ok(aizhong_config)
    }

    pub fn validate(&self) -> AizhongResult<()> {
        if self.account.phone.is_empty() {
            return Err(AizhongError::MissingEnvVar("AIZHONG_PHONE".to_string()));
        }

        if self.account.password.is_empty() {
            return Err(AizhongError::MissingEnvVar("AIZHONG_PASSWORD".to_string()));
        }

        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            return Err(AizhongError::InvalidConfigValue {
                key: "provider.base_url".to_string(),
                message: "Must be an http:// or https:// URL".to_string(),
            });
        }

        if self.provider.request_timeout_secs == 0 {
            return Err(AizhongError::InvalidConfigValue {
                key: "provider.request_timeout_secs".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.refresh.scan_interval_secs == 0 {
            return Err(AizhongError::InvalidConfigValue {
                key: "refresh.scan_interval_secs".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !valid_levels.contains(&level_lower.as_str()) && !level_lower.contains('=') {
            return Err(AizhongError::InvalidConfigValue {
                key: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Must be one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    /// The credential this configuration describes.
    pub fn credential(&self) -> crate::models::Credential {
        crate::models::Credential::new(&self.account.phone, &self.account.password)
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("aizhong.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("aizhong").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".aizhong").join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    let env_paths = get_dotenv_paths();

    for path in env_paths {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

fn get_dotenv_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".env"));
        paths.push(cwd.join(".env.local"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".aizhong").join(".env"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("aizhong").join(".env"));
    }

    paths
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("aizhong"))
}

pub fn ensure_config_dir() -> Result<PathBuf, std::io::Error> {
    let config_dir = get_config_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine config directory",
        )
    })?;

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}
