//! Credential storage
//!
//! The client keeps exactly one credential pair, stored under two fixed keys.
//! Stores are injected into [`crate::ApiClient`] so tests and tools can choose where
//! credentials live.

use crate::error::{ClientError, Result};
use crate::types::{ACCESS_TOKEN_KEY, AuthTokens, REFRESH_TOKEN_KEY};
use papaya::HashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Key-value store for the persisted credential pair
pub trait TokenStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY)
    }

    fn refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_KEY)
    }

    /// Persist both tokens of a freshly issued pair
    fn store_tokens(&self, tokens: &AuthTokens) -> Result<()> {
        self.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)
    }

    /// Remove both tokens
    fn clear(&self) -> Result<()> {
        self.remove(ACCESS_TOKEN_KEY)?;
        self.remove(REFRESH_TOKEN_KEY)
    }
}

/// Thread-safe in-memory store using Papaya HashMap
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    values: Arc<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `tokens`
    pub fn with_tokens(tokens: &AuthTokens) -> Self {
        let store = Self::new();
        let map = store.values.pin();
        map.insert(ACCESS_TOKEN_KEY.to_string(), tokens.access_token.clone());
        map.insert(REFRESH_TOKEN_KEY.to_string(), tokens.refresh_token.clone());
        drop(map);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.pin().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.pin().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.pin().remove(key);
        Ok(())
    }
}

/// Store backed by a JSON file, so credentials survive restarts.
///
/// The file holds a flat object (`{"accessToken": "...", "refreshToken": "..."}`) and is
/// rewritten in full on every change.
pub struct FileTokenStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileTokenStore {
    /// Open the store at `path`. A missing file is treated as empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(ClientError::Storage(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        debug!(path = %path.display(), entries = values.len(), "Opened credential file");

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| ClientError::Storage("credential store lock poisoned".to_string()))?;
        // Memory only changes once the file write has succeeded
        let mut next = values.clone();
        f(&mut next);

        let bytes = serde_json::to_vec_pretty(&next)?;
        std::fs::write(&self.path, bytes).map_err(|e| {
            ClientError::Storage(format!("failed to write {}: {e}", self.path.display()))
        })?;

        *values = next;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|values| {
            values.remove(key);
        })
    }

    fn store_tokens(&self, tokens: &AuthTokens) -> Result<()> {
        self.update(|values| {
            values.insert(ACCESS_TOKEN_KEY.to_string(), tokens.access_token.clone());
            values.insert(REFRESH_TOKEN_KEY.to_string(), tokens.refresh_token.clone());
        })
    }

    fn clear(&self) -> Result<()> {
        self.update(|values| {
            values.remove(ACCESS_TOKEN_KEY);
            values.remove(REFRESH_TOKEN_KEY);
        })
    }
}
