//! secrets::keychain_store
//!
//! OS keychain secret storage via the `keyring` crate (macOS Keychain,
//! Windows Credential Manager, Linux Secret Service).
//!
//! Only functional with the `keychain` feature; without it the type exists so
//! provider selection can report a clear error.

#[cfg(feature = "keychain")]
use keyring::Entry;

use super::traits::{SecretError, SecretStore};

/// Keychain service name used for every entry.
pub const KEYCHAIN_SERVICE: &str = "partnerlink";

/// Keychain-backed secret storage.
#[cfg(feature = "keychain")]
#[derive(Debug)]
pub struct KeychainSecretStore {
    service: String,
}

#[cfg(feature = "keychain")]
impl KeychainSecretStore {
    /// Create a store using the [`KEYCHAIN_SERVICE`] service name.
    pub fn new() -> Result<Self, SecretError> {
        Ok(Self::with_service(KEYCHAIN_SERVICE))
    }

    /// Create a store with a custom service name (tests, side-by-side installs).
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Service name for entries.
    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, key: &str) -> Result<Entry, SecretError> {
        Entry::new(&self.service, key)
            .map_err(|e| SecretError::ReadError(format!("cannot create keyring entry: {}", e)))
    }
}

#[cfg(feature = "keychain")]
impl SecretStore for KeychainSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(SecretError::ReadError(format!(
                "cannot read '{}' from keychain: {}",
                key, e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        self.entry(key)?.set_password(value).map_err(|e| {
            SecretError::WriteError(format!("cannot write '{}' to keychain: {}", key, e))
        })
    }

    fn delete(&self, key: &str) -> Result<(), SecretError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(SecretError::DeleteError(format!(
                "cannot delete '{}' from keychain: {}",
                key, e
            ))),
        }
    }
}

#[cfg(not(feature = "keychain"))]
#[derive(Debug)]
pub struct KeychainSecretStore {
    _private: (),
}

#[cfg(not(feature = "keychain"))]
impl KeychainSecretStore {
    /// Always fails when compiled without the `keychain` feature.
    pub fn new() -> Result<Self, SecretError> {
        Err(SecretError::ProviderNotAvailable(
            "keychain support not enabled (compile with --features keychain)".into(),
        ))
    }
}

#[cfg(not(feature = "keychain"))]
impl SecretStore for KeychainSecretStore {
    fn get(&self, _key: &str) -> Result<Option<String>, SecretError> {
        Err(SecretError::ProviderNotAvailable("keychain".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), SecretError> {
        Err(SecretError::ProviderNotAvailable("keychain".into()))
    }

    fn delete(&self, _key: &str) -> Result<(), SecretError> {
        Err(SecretError::ProviderNotAvailable("keychain".into()))
    }
}


#[cfg(all(test, not(feature = "keychain")))]
mod tests {
    use super::*;

    #[test]
    fn new_fails_without_feature() {
        let err = KeychainSecretStore::new().unwrap_err().to_string();
        assert!(err.contains("keychain"));
        assert!(err.contains("not enabled"));
    }
}
