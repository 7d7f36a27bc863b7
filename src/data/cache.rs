//! Local data caching
//!
//! Keeps the raw response body per ticker so later runs are served from disk
//! without touching the network. The cached file is the exact body that was
//! fetched; parsing it again yields the same snapshot.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::GexResult;

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory
    pub cache_dir: PathBuf,
    /// Whether to use cache
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("data"),
            enabled: true,
        }
    }
}

/// Raw response cache, one `<TICKER>.json` file per ticker
#[derive(Debug, Clone)]
pub struct DataCache {
    config: CacheConfig,
}

impl DataCache {
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Cache file for a ticker
    pub fn path(&self, ticker: &str) -> PathBuf {
        self.config.cache_dir.join(format!("{}.json", ticker))
    }

    /// Load the cached body, if present
    pub fn load_raw(&self, ticker: &str) -> GexResult<Option<String>> {
        if !self.config.enabled {
            return Ok(None);
        }

        let path = self.path(ticker);
        if !path.exists() {
            return Ok(None);
        }

        let body = fs::read_to_string(&path)?;
        tracing::info!("Loaded {} from cache at {:?}", ticker, path);
        Ok(Some(body))
    }

    /// Persist a fetched body
    pub fn save_raw(&self, ticker: &str, body: &str) -> GexResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        if !self.config.cache_dir.exists() {
            fs::create_dir_all(&self.config.cache_dir)?;
        }

        let path = self.path(ticker);
        fs::write(&path, body)?;

        tracing::info!("Cached {} at {:?}", ticker, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cache_operations() {
        let temp_dir = tempdir().unwrap();
        let config = CacheConfig {
            cache_dir: temp_dir.path().join("nested"),
            enabled: true,
        };

        let cache = DataCache::new(config);
        assert!(cache.load_raw("SPY").unwrap().is_none());

        let body = r#"{"data":{"current_price":1.5,"options":[]}}"#;
        cache.save_raw("SPY", body).unwrap();

        assert!(cache.path("SPY").ends_with("nested/SPY.json"));
        assert_eq!(cache.load_raw("SPY").unwrap().as_deref(), Some(body));
    }

    #[test]
    fn test_disabled_cache() {
        let temp_dir = tempdir().unwrap();
        let config = CacheConfig {
            cache_dir: temp_dir.path().to_path_buf(),
            enabled: false,
        };

        let cache = DataCache::new(config);
        cache.save_raw("SPY", "{}").unwrap();

        assert!(!cache.path("SPY").exists());
        assert!(cache.load_raw("SPY").unwrap().is_none());
    }
}
