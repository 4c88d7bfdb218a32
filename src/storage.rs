//! Host-provided client storage: a small persistent string map.

use crate::error::DesignError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;

pub const API_KEY_STORAGE_KEY: &str = "openai-api-key";

#[async_trait]
pub trait ClientStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DesignError>;
    async fn set(&mut self, key: &str, value: &str) -> Result<(), DesignError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, DesignError> {
        Ok(self.values.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), DesignError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores values as one JSON object on disk, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_all(&self) -> Result<Map<String, Value>, DesignError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(Map::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ClientStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, DesignError> {
        let values = self.read_all().await?;
        Ok(values.get(key).and_then(|v| v.as_str()).map(str::to_string))
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), DesignError> {
        let mut values = self.read_all().await?;
        values.insert(key.to_string(), Value::String(value.to_string()));
        let text = serde_json::to_string_pretty(&values)?;
        tokio::fs::write(&self.path, text).await?;
        log::debug!("Persisted '{key}' to {}", self.path.display());
        Ok(())
    }
}
