use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// The session credentials handed out by the backend on login and refresh.
///
/// Both fields travel together: a pair with only one half set is treated as
/// no session at all. The client never inspects token contents or tracks
/// expiry locally - validity is only known empirically, via request outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived credential sent with each authenticated request
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,

    /// Longer-lived credential exchanged for a new pair once the access
    /// token expires
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: Option<String>,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        TokenPair { access_token: Some(access_token), refresh_token: Some(refresh_token) }
    }

    /// True when neither half of the pair is present.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

#[derive(Error, Debug)]
pub enum TokenStoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Home directory not available")]
    NoHomeDirectory,
}

/// Persistence seam for the session token pair.
///
/// `get` never fails: missing or unreadable state comes back as an empty
/// pair so a corrupt store degrades to "not logged in" instead of an error.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> TokenPair;

    fn set(&self, pair: &TokenPair) -> Result<(), TokenStoreError>;

    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// File-backed store keeping the pair at `~/.cardback/tokens.json` so the
/// session survives across invocations.
pub struct FileTokenStore {
    path_override: Option<PathBuf>,
}

impl FileTokenStore {
    pub fn new() -> Self {
        FileTokenStore { path_override: None }
    }

    /// Store the pair at an explicit path instead of the home directory.
    pub fn with_path(path: PathBuf) -> Self {
        FileTokenStore { path_override: Some(path) }
    }

    fn token_file_path(&self) -> Result<PathBuf, TokenStoreError> {
        if let Some(path) = &self.path_override {
            return Ok(path.clone());
        }
        let home_dir = std::env::var("HOME").map_err(|_| TokenStoreError::NoHomeDirectory)?;
        Ok(PathBuf::from(home_dir).join(".cardback").join("tokens.json"))
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> TokenPair {
        let Ok(path) = self.token_file_path() else {
            return TokenPair::default();
        };
        match fs::read_to_string(&path) {
            Ok(json_data) => serde_json::from_str(&json_data).unwrap_or_default(),
            Err(_) => TokenPair::default(),
        }
    }

    fn set(&self, pair: &TokenPair) -> Result<(), TokenStoreError> {
        let path = self.token_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| TokenStoreError::Io(format!("Failed to create directory: {}", e)))?;
        }
        let json_data = serde_json::to_string_pretty(pair)?;
        fs::write(&path, json_data)
            .map_err(|e| TokenStoreError::Io(format!("Failed to write tokens: {}", e)))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let path = self.token_file_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| TokenStoreError::Io(format!("Failed to delete tokens: {}", e)))?;
        }
        Ok(())
    }
}

/// In-memory store for tests and embedders that manage persistence
/// themselves.
pub struct MemoryTokenStore {
    inner: Mutex<TokenPair>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        MemoryTokenStore { inner: Mutex::new(TokenPair::default()) }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> TokenPair {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, pair: &TokenPair) -> Result<(), TokenStoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = pair.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = TokenPair::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_store(dir: &tempfile::TempDir) -> FileTokenStore {
        FileTokenStore::with_path(dir.path().join("tokens.json"))
    }

    #[test]
    fn file_store_round_trips_a_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        let pair = TokenPair::new("access-1".to_string(), "refresh-1".to_string());
        store.set(&pair).unwrap();

        assert_eq!(store.get(), pair);
    }

    #[test]
    fn file_store_clear_leaves_an_empty_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        store.set(&TokenPair::new("access-1".to_string(), "refresh-1".to_string())).unwrap();
        store.clear().unwrap();

        assert!(store.get().is_empty());
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        store.clear().unwrap();
        store.clear().unwrap();

        assert!(store.get().is_empty());
    }

    #[test]
    fn missing_file_reads_as_empty_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        assert_eq!(store.get(), TokenPair::default());
    }

    #[test]
    fn corrupt_file_reads_as_empty_pair() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, "{not json at all").unwrap();

        let store = FileTokenStore::with_path(path);
        assert_eq!(store.get(), TokenPair::default());
    }

    #[test]
    fn partial_json_keeps_the_readable_half() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, r#"{"accessToken":"access-1"}"#).unwrap();

        let store = FileTokenStore::with_path(path);
        let pair = store.get();
        assert_eq!(pair.access_token.as_deref(), Some("access-1"));
        assert!(pair.refresh_token.is_none());
    }

    #[test]
    fn memory_store_round_trips_and_clears() {
        let store = MemoryTokenStore::new();
        let pair = TokenPair::new("access-1".to_string(), "refresh-1".to_string());

        store.set(&pair).unwrap();
        assert_eq!(store.get(), pair);

        store.clear().unwrap();
        assert!(store.get().is_empty());
    }
}
