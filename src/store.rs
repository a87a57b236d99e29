//! Credential store collaborator
//!
//! Request interceptors consult a persistent credential store when injecting
//! authorization headers. The store is external to this crate; the trait here
//! is the synchronous read surface it must provide.

use std::collections::HashMap;
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};

/// Synchronous key/value read surface of the credential store.
pub trait CredentialStore: Send + Sync {
    /// Read the credential stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;
}

/// In-memory credential store for tests and embedding.
#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, SecretString>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a credential under `key`, replacing any existing value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        let secret = SecretString::new(value.into().into_boxed_str());
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), secret);
        }
    }

    /// Remove the credential under `key`.
    pub fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

impl CredentialStore for InMemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).map(|s| s.expose_secret().to_string()))
    }
}
