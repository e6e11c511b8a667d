pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, LoggingConfig, StorageConfig, TmdbConfig, TrendingWindow};
pub use credentials::{CredentialStore, TMDB_API_KEY_ENV};
pub use paths::{PathManager, container_base_path};
