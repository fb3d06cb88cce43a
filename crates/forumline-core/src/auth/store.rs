use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::credentials::KeyringStore;
use super::session::FileStore;

/// Fixed name the bearer credential is stored under.
pub const CREDENTIAL_KEY: &str = "jwt_token";

/// Key-value slot holding at most one bearer credential.
///
/// Presence of a value is the only "authenticated" signal in the client; no
/// expiry is tracked. `clear` must succeed when nothing is stored.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn store(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Process-lifetime store. Cheap to clone; clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    token: Arc<RwLock<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token.into()))),
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.read().clone())
    }

    fn store(&self, token: &str) -> Result<()> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.token.write().take();
        Ok(())
    }
}

/// Where the credential lives between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

impl std::str::FromStr for CredentialBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(CredentialBackend::File),
            "keyring" => Ok(CredentialBackend::Keyring),
            "memory" => Ok(CredentialBackend::Memory),
            other => Err(anyhow::anyhow!(
                "Unknown credential backend {:?} (expected file, keyring or memory)",
                other
            )),
        }
    }
}

/// Build the configured store. `cache_dir` is only used by the file backend.
pub fn open_store(backend: CredentialBackend, cache_dir: &Path) -> Arc<dyn SessionStore> {
    match backend {
        CredentialBackend::File => Arc::new(FileStore::new(cache_dir.to_path_buf())),
        CredentialBackend::Keyring => Arc::new(KeyringStore::new()),
        CredentialBackend::Memory => Arc::new(MemoryStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.store("abc").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc"));

        store.store("def").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("def"));

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_memory_store_clones_share_slot() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.store("shared").unwrap();
        assert_eq!(other.load().unwrap().as_deref(), Some("shared"));
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!("File".parse::<CredentialBackend>().unwrap(), CredentialBackend::File);
        assert_eq!("keyring".parse::<CredentialBackend>().unwrap(), CredentialBackend::Keyring);
        assert_eq!(" memory ".parse::<CredentialBackend>().unwrap(), CredentialBackend::Memory);
        assert!("cookie".parse::<CredentialBackend>().is_err());
    }

    #[test]
    fn test_open_store_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(CredentialBackend::File, dir.path());
        store.store("T1").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("T1"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
