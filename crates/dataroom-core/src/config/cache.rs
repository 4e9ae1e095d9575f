//! Content cache provider configuration.

use serde::{Deserialize, Serialize};

/// Top-level content cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache provider type: `"memory"` or `"local"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// How long a delete keeps blocking late writes for the same key.
    #[serde(default = "default_tombstone_ttl")]
    pub tombstone_ttl_seconds: u64,
    /// In-memory cache configuration.
    #[serde(default)]
    pub memory: MemoryCacheConfig,
    /// On-disk cache configuration.
    #[serde(default)]
    pub local: LocalCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            tombstone_ttl_seconds: default_tombstone_ttl(),
            memory: MemoryCacheConfig::default(),
            local: LocalCacheConfig::default(),
        }
    }
}

/// In-memory cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum total payload size held in memory.
    #[serde(default = "default_max_capacity_bytes")]
    pub max_capacity_bytes: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity_bytes: default_max_capacity_bytes(),
        }
    }
}

/// On-disk cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalCacheConfig {
    /// Directory holding one sub-directory per owner.
    #[serde(default = "default_local_root")]
    pub root: String,
}

impl Default for LocalCacheConfig {
    fn default() -> Self {
        Self {
            root: default_local_root(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_tombstone_ttl() -> u64 {
    30
}

fn default_max_capacity_bytes() -> u64 {
    512 * 1024 * 1024
}

fn default_local_root() -> String {
    "data/content".to_string()
}
