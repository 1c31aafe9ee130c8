use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use url::Url;

/// Result page fetched when no sources are configured
pub const DEFAULT_SOURCE: &str =
    "https://www.dltcdirectory.net/result/6908e46ec0192a8ab45480f5/693ffbaa4b2dded509dcc64e";

/// Errors raised while loading or validating a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid source URL {url:?}: {source}")]
    InvalidSource {
        url: String,
        source: url::ParseError,
    },
}

/// What a run does with the loaded state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Fetch every source and record a debug summary per page
    #[default]
    Debug,
    /// Only stamp `lastUpdated` and `sources`; no network traffic
    Timestamp,
}

/// Configuration for a snapshot run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotConfig {
    /// Result page URLs, fetched in order
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    /// `user-agent` header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// `accept` header sent with every request
    #[serde(default = "default_accept")]
    pub accept: String,

    /// Path of the persisted state document
    #[serde(default = "default_out_path")]
    pub out_path: PathBuf,

    /// Whether to fetch sources or only stamp the timestamp
    #[serde(default)]
    pub mode: RunMode,
}

fn default_sources() -> Vec<String> {
    vec![DEFAULT_SOURCE.to_string()]
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; TennisResultsBot/1.0; +https://github.com/)".to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml".to_string()
}

fn default_out_path() -> PathBuf {
    PathBuf::from("data").join("results.json")
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            user_agent: default_user_agent(),
            accept: default_accept(),
            out_path: default_out_path(),
            mode: RunMode::default(),
        }
    }
}

impl SnapshotConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every source is an absolute URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        for url in &self.sources {
            Url::parse(url).map_err(|source| ConfigError::InvalidSource {
                url: url.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
