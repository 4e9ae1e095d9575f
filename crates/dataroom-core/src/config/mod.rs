//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! an optional TOML file plus `DATAROOM__*` environment variables. Every
//! field has a serde default, so an empty configuration is valid.

pub mod cache;
pub mod logging;
pub mod sync;
pub mod workspace;

use serde::{Deserialize, Serialize};

pub use self::cache::{CacheConfig, LocalCacheConfig, MemoryCacheConfig};
pub use self::logging::LoggingConfig;
pub use self::sync::SyncConfig;
pub use self::workspace::WorkspaceConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Naming defaults and local state location.
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    /// Content cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Remote feed settings.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `config/default.toml` (if present), the explicit file (if
    /// given) and environment variables prefixed with `DATAROOM__`.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("DATAROOM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
