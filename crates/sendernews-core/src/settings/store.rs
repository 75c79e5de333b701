//! Option store port
//!
//! The host platform owns persistence; the core reads and writes its
//! options through [`ConfigStore`].

use async_trait::async_trait;
use sendernews_common::Result;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Key-value option store provided by the host
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read an option, `None` when it was never set
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write an option
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Read an option, falling back to `default`
    async fn get_or(&self, key: &str, default: Value) -> Result<Value> {
        Ok(self.get(key).await?.unwrap_or(default))
    }
}

/// In-memory option store
#[derive(Debug, Default)]
pub struct MemoryStore {
    options: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing options
    pub fn with_options(options: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            options: RwLock::new(options.into_iter().collect()),
        }
    }

    /// Copy of every stored option
    pub async fn snapshot(&self) -> HashMap<String, Value> {
        self.options.read().await.clone()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.options.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.options.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
