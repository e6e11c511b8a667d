use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub trending_window: TrendingWindow,
}

/// Time window for the trending list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingWindow {
    Day,
    #[default]
    Week,
}

impl fmt::Display for TrendingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendingWindow::Day => write!(f, "day"),
            TrendingWindow::Week => write!(f, "week"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Name of the persisted collection; also the snapshot file stem.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Overrides the platform data directory for snapshots.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub json: Option<bool>,
}

fn default_api_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_collection() -> String {
    "watchlist".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            timeout_seconds: default_timeout_seconds(),
            trending_window: TrendingWindow::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let collection = self.storage.collection.trim();
        if collection.is_empty() {
            return Err(anyhow::anyhow!("storage.collection cannot be empty"));
        }
        if collection.contains(['/', '\\']) || collection == "." || collection == ".." {
            return Err(anyhow::anyhow!(
                "storage.collection must be a plain name, got {:?}",
                self.storage.collection
            ));
        }

        for (name, url) in [
            ("tmdb.api_base_url", &self.tmdb.api_base_url),
            ("tmdb.image_base_url", &self.tmdb.image_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("{} must be an http(s) URL, got {:?}", name, url));
            }
        }

        if self.tmdb.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("tmdb.timeout_seconds must be greater than zero"));
        }

        Ok(())
    }

    /// Snapshot directory: explicit override or the platform default.
    pub fn store_dir(&self, default_dir: PathBuf) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or(default_dir)
    }
}
