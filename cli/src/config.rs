//! Layered configuration for the `lancer` binary.
//!
//! Precedence, lowest first: built-in defaults, a TOML file, then
//! `LANCER_*` environment variables (`__` separates nesting, e.g.
//! `LANCER_API__BASE_URL`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::TimeDelta;
use config::{Config, Environment, File, FileFormat};
use lancer_backend_client::{BackendConfig, DEFAULT_BASE_URL, DEFAULT_UPLOAD_FIELD};
use lancer_stats::{ActivityWindows, StatsOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(String),

    #[error("configuration file not found at path: {0}")]
    FileNotFound(PathBuf),

    #[error("invalid configuration value: {0}")]
    Validation(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub activity: ActivityConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_upload_field")]
    pub upload_field: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file backing the client key-value store.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityConfig {
    #[serde(default = "default_milestone_days")]
    pub milestone_days: i64,

    #[serde(default = "default_file_days")]
    pub file_days: i64,

    #[serde(default = "default_message_hours")]
    pub message_hours: i64,

    #[serde(default = "default_activity_limit")]
    pub limit: usize,

    #[serde(default = "default_recent_files")]
    pub recent_files: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_upload_field() -> String {
    DEFAULT_UPLOAD_FIELD.to_string()
}
fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("lancer").join("storage.json"))
        .unwrap_or_else(|| PathBuf::from("lancer-storage.json"))
}
fn default_milestone_days() -> i64 {
    7
}
fn default_file_days() -> i64 {
    7
}
fn default_message_hours() -> i64 {
    24
}
fn default_activity_limit() -> usize {
    5
}
fn default_recent_files() -> usize {
    3
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            upload_field: default_upload_field(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            milestone_days: default_milestone_days(),
            file_days: default_file_days(),
            message_hours: default_message_hours(),
            limit: default_activity_limit(),
            recent_files: default_recent_files(),
        }
    }
}

impl AppConfig {
    fn validate(&self) -> Result<()> {
        let a = &self.activity;
        if a.milestone_days < 0 || a.file_days < 0 || a.message_hours < 0 {
            return Err(ConfigError::Validation(
                "activity windows must not be negative".to_string(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.api.upload_field.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api.upload_field must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn stats_options(&self) -> StatsOptions {
        let a = &self.activity;
        StatsOptions {
            windows: ActivityWindows {
                milestones: TimeDelta::days(a.milestone_days),
                files: TimeDelta::days(a.file_days),
                messages: TimeDelta::hours(a.message_hours),
                limit: a.limit,
            },
            recent_files: a.recent_files,
        }
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
            upload_field: self.api.upload_field.clone(),
        }
    }
}

pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn load(&self) -> Result<AppConfig> {
        let defaults = serde_json::to_string(&AppConfig::default())?;
        let mut builder = Config::builder().add_source(File::from_str(&defaults, FileFormat::Json));

        if let Some(ref path) = self.config_path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("LANCER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let app_config: AppConfig = builder.build()?.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// `./lancer.toml`, then `<config dir>/lancer/config.toml`.
    pub fn find_config_file() -> Option<PathBuf> {
        let cwd_config = PathBuf::from("./lancer.toml");
        if cwd_config.exists() {
            return Some(cwd_config);
        }
        dirs::config_dir()
            .map(|dir| dir.join("lancer").join("config.toml"))
            .filter(|path| path.exists())
    }

    /// An explicit path must exist; otherwise the first discovered file,
    /// if any, is used.
    pub fn load_default(explicit: Option<&Path>) -> Result<AppConfig> {
        let loader = match explicit.map(Path::to_path_buf).or_else(Self::find_config_file) {
            Some(path) => ConfigLoader::new().with_file(path),
            None => ConfigLoader::new(),
        };
        loader.load()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
