//! In-memory credential storage

use parking_lot::RwLock;

use crate::traits::TokenStore;
use crate::types::Credential;

/// Process-local credential store
///
/// Thread-safe and non-persistent; suitable for tests and for applications
/// that keep credentials for the lifetime of the process only. Applications
/// wanting persistence use [`crate::keychain::KeychainTokenStore`] or their
/// own [`TokenStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    credential: RwLock<Option<Credential>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a credential
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self { credential: RwLock::new(Some(credential)) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<Credential> {
        self.credential.read().clone()
    }

    fn set(&self, credential: Option<Credential>) {
        *self.credential.write() = credential;
    }
}
