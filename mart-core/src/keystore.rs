//! API-key storage.
//!
//! A single JSON document on disk:
//!
//! ```json
//! { "api_key": "…", "saved_at": "2026-10-19T09:00:00Z" }
//! ```
//!
//! The key that is actually used resolves in this order: an explicit key
//! passed by the caller, the saved key, then the configured environment
//! variable.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::error::{MartError, Result};

#[derive(Debug, Serialize, Deserialize)]
struct StoredKey {
    api_key: String,
    saved_at: DateTime<Utc>,
}

/// File-backed store for the content API key.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
    env_var: String,
}

impl KeyStore {
    /// Create a store at `path`, falling back to `env_var` when empty.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, env_var: impl Into<String>) -> Self {
        Self { path: path.into(), env_var: env_var.into() }
    }

    /// Create a store from the `[storage]` config section.
    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.key_file, &config.api_key_env)
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved key, if any.
    ///
    /// An unreadable or corrupt file is logged and treated as empty.
    #[must_use]
    pub fn load(&self) -> Option<String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), "failed to read key file: {e}");
                return None;
            }
        };
        match serde_json::from_str::<StoredKey>(&raw) {
            Ok(stored) if !stored.api_key.trim().is_empty() => Some(stored.api_key),
            Ok(_) => None,
            Err(e) => {
                warn!(path = %self.path.display(), "corrupt key file ignored: {e}");
                None
            }
        }
    }

    /// Timestamp of the last save.
    #[must_use]
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str::<StoredKey>(&raw).ok().map(|s| s.saved_at)
    }

    /// Persist a key, replacing any previous one.
    ///
    /// # Errors
    /// Rejects blank keys; propagates I/O and serialization failures.
    pub fn save(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(MartError::Config("API key must not be empty".into()));
        }
        let stored = StoredKey { api_key: key.to_string(), saved_at: Utc::now() };
        let json = serde_json::to_string_pretty(&stored)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;
        info!(path = %self.path.display(), "API key saved");
        Ok(())
    }

    /// Forget the saved key. Clearing an absent key is not an error.
    ///
    /// # Errors
    /// Propagates I/O failures other than "not found".
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "API key cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve the key to use: explicit, then saved, then environment.
    #[must_use]
    pub fn resolve(&self, explicit: Option<&str>) -> Option<String> {
        if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
            return Some(key.to_string());
        }
        if let Some(key) = self.load() {
            return Some(key);
        }
        let from_env = std::env::var(&self.env_var).ok().filter(|k| !k.trim().is_empty());
        if from_env.is_some() {
            debug!(var = %self.env_var, "using API key from environment");
        }
        from_env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> KeyStore {
        KeyStore::new(dir.path().join("key.json"), "MART_TEST_UNSET_KEY_VAR")
    }

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ks = store(&dir);

        assert_eq!(ks.load(), None);
        ks.save("  secret-123 ").expect("save");
        assert_eq!(ks.load().as_deref(), Some("secret-123"));
        assert!(ks.saved_at().is_some());

        ks.clear().expect("clear");
        assert_eq!(ks.load(), None);
        ks.clear().expect("clearing twice is fine");
    }

    #[test]
    fn blank_key_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ks = store(&dir);
        assert!(ks.save("   ").is_err());
        assert!(!ks.path().exists());
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ks = store(&dir);
        std::fs::write(ks.path(), "not json").expect("write");
        assert_eq!(ks.load(), None);
    }

    #[test]
    fn explicit_key_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ks = store(&dir);
        ks.save("saved").expect("save");
        assert_eq!(ks.resolve(Some("typed")).as_deref(), Some("typed"));
        assert_eq!(ks.resolve(Some("  ")).as_deref(), Some("saved"));
        assert_eq!(ks.resolve(None).as_deref(), Some("saved"));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ks = KeyStore::new(dir.path().join("nested/deeper/key.json"), "MART_TEST_UNSET_KEY_VAR");
        ks.save("k").expect("save");
        assert_eq!(ks.load().as_deref(), Some("k"));
    }

    #[test]
    fn environment_is_the_last_resort() {
        let dir = tempfile::tempdir().expect("tempdir");
        // PATH is always set, so no env mutation is needed
        let from_env = std::env::var("PATH").expect("PATH set");
        let ks = KeyStore::new(dir.path().join("key.json"), "PATH");

        assert_eq!(ks.resolve(None), Some(from_env.clone()));

        ks.save("saved").expect("save");
        assert_eq!(ks.resolve(None).as_deref(), Some("saved"), "saved key beats env");

        ks.clear().expect("clear");
        assert_eq!(ks.resolve(None), Some(from_env));
    }
}
