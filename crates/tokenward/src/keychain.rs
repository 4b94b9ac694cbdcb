//! Credential storage in the platform keychain
//!
//! Persists the credential as a single JSON secret under a service/account
//! pair via the `keyring` crate (macOS Keychain, Windows Credential Manager,
//! Linux Secret Service).
//!
//! [`TokenStore`]'s contract is infallible, so the trait implementation logs
//! keychain failures and degrades: a failed read behaves like an empty store,
//! a failed write leaves the previous secret in place. Applications that need
//! the underlying error use the fallible [`KeychainTokenStore::load`],
//! [`KeychainTokenStore::save`], and [`KeychainTokenStore::delete`] directly.

use keyring::Entry;
use tracing::{debug, warn};

use crate::traits::TokenStore;
use crate::types::Credential;

/// Errors from keychain-backed credential storage
#[derive(Debug, thiserror::Error)]
pub enum KeychainError {
    /// Platform keychain access failed
    #[error("keychain access failed: {0}")]
    Keyring(#[from] keyring::Error),

    /// The stored secret is not a valid credential
    #[error("stored credential is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Platform-keychain credential store
pub struct KeychainTokenStore {
    service: String,
    account: String,
}

impl KeychainTokenStore {
    /// Create a store bound to a keychain service/account pair
    ///
    /// # Arguments
    /// * `service` - Keychain service name (e.g. "MyApp.oauth")
    /// * `account` - Keychain account name (e.g. "main")
    #[must_use]
    pub fn new(service: String, account: String) -> Self {
        Self { service, account }
    }

    fn entry(&self) -> Result<Entry, keyring::Error> {
        Entry::new(&self.service, &self.account)
    }

    /// Load the stored credential
    ///
    /// A missing keychain entry is `Ok(None)`, not an error.
    ///
    /// # Errors
    /// Returns an error if the keychain is inaccessible or the stored secret
    /// does not decode as a credential.
    pub fn load(&self) -> Result<Option<Credential>, KeychainError> {
        match self.entry()?.get_password() {
            Ok(secret) => {
                let credential = serde_json::from_str(&secret)?;
                Ok(Some(credential))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Persist a credential, replacing any previous one
    ///
    /// # Errors
    /// Returns an error if the keychain write fails.
    pub fn save(&self, credential: &Credential) -> Result<(), KeychainError> {
        let secret = serde_json::to_string(credential)?;
        self.entry()?.set_password(&secret)?;
        debug!(service = %self.service, account = %self.account, "stored credential in keychain");
        Ok(())
    }

    /// Delete the stored credential; already-absent entries are fine
    ///
    /// # Errors
    /// Returns an error if the keychain delete fails for a reason other than
    /// the entry not existing.
    pub fn delete(&self) -> Result<(), KeychainError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                debug!(service = %self.service, account = %self.account, "deleted keychain credential");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl TokenStore for KeychainTokenStore {
    fn get(&self) -> Option<Credential> {
        match self.load() {
            Ok(credential) => credential,
            Err(err) => {
                warn!(error = %err, "keychain read failed, treating store as empty");
                None
            }
        }
    }

    fn set(&self, credential: Option<Credential>) {
        let result = match &credential {
            Some(credential) => self.save(credential),
            None => self.delete(),
        };
        if let Err(err) = result {
            warn!(error = %err, "keychain write failed, stored credential unchanged");
        }
    }
}
