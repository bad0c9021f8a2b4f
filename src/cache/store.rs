//! Cache region storage trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use super::fetch::Response;

/// Errors that can occur in a cache storage backend
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache storage error: {0}")]
    Storage(String),
}

/// Named, version-tagged cache regions mapping request keys to responses
///
/// Regions are keyed by the deployment version string; the controller
/// garbage-collects every region that does not match its own version on
/// activation. Reads return owned copies.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Ensure a region with this name exists
    async fn open(&self, region: &str) -> Result<(), CacheError>;

    /// Names of all existing regions
    async fn region_names(&self) -> Result<Vec<String>, CacheError>;

    /// Delete a region and everything in it; returns whether it existed
    async fn delete_region(&self, region: &str) -> Result<bool, CacheError>;

    /// Look up a stored response by request key
    async fn get(&self, region: &str, key: &str) -> Result<Option<Response>, CacheError>;

    /// Store a response under a request key, replacing any previous value
    async fn put(&self, region: &str, key: &str, response: Response) -> Result<(), CacheError>;
}

/// In-memory cache store
///
/// Per-key atomicity comes from the single mutex; nothing is held across an
/// await point.
#[derive(Default)]
pub struct MemoryCacheStore {
    regions: Mutex<HashMap<String, HashMap<String, Response>>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, HashMap<String, Response>>>, CacheError> {
        self.regions
            .lock()
            .map_err(|e| CacheError::Storage(format!("cache mutex poisoned: {}", e)))
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn open(&self, region: &str) -> Result<(), CacheError> {
        self.lock()?.entry(region.to_string()).or_default();
        Ok(())
    }

    async fn region_names(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    async fn delete_region(&self, region: &str) -> Result<bool, CacheError> {
        Ok(self.lock()?.remove(region).is_some())
    }

    async fn get(&self, region: &str, key: &str) -> Result<Option<Response>, CacheError> {
        Ok(self
            .lock()?
            .get(region)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn put(&self, region: &str, key: &str, response: Response) -> Result<(), CacheError> {
        self.lock()?
            .entry(region.to_string())
            .or_default()
            .insert(key.to_string(), response);
        Ok(())
    }
}
