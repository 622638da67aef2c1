//! secrets
//!
//! Durable secret storage backing the session Token Store.
//!
//! # Providers
//!
//! - [`FileSecretStore`]: `<home>/secrets.toml` with 0600 permissions (default)
//! - [`KeychainSecretStore`]: OS keychain (requires the `keychain` feature)
//!
//! Secrets are never logged or included in error messages, and file writes are
//! atomic (temp file + rename).
//!
//! # Example
//!
//! ```ignore
//! use partnerlink::secrets::create_store;
//!
//! let store = create_store(config.secrets_provider())?;
//! store.set("session.bearer_token", &token)?;
//! ```

mod file_store;
mod keychain_store;
mod traits;

use std::sync::Arc;

pub use file_store::FileSecretStore;
pub use keychain_store::{KeychainSecretStore, KEYCHAIN_SERVICE};
pub use traits::{SecretError, SecretStore};

/// The default secret store provider name.
pub const DEFAULT_PROVIDER: &str = "file";

/// Valid provider names, in the order shown to users.
pub const VALID_PROVIDERS: &[&str] = &["file", "keychain"];

/// Create a secret store by provider name.
///
/// # Errors
///
/// - Unknown provider name
/// - `"keychain"` without the `keychain` feature
/// - Initialization errors from the store
pub fn create_store(provider: &str) -> Result<Arc<dyn SecretStore>, SecretError> {
    match provider {
        "file" => Ok(Arc::new(FileSecretStore::new()?)),
        "keychain" => Ok(Arc::new(KeychainSecretStore::new()?)),
        other => Err(SecretError::ProviderNotAvailable(format!(
            "unknown secret provider: '{}' (valid: {})",
            other,
            VALID_PROVIDERS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_unknown_provider() {
        match create_store("vault") {
            Err(SecretError::ProviderNotAvailable(msg)) => {
                assert!(msg.contains("vault"));
                assert!(msg.contains("file, keychain"));
            }
            Err(e) => panic!("unexpected error type: {:?}", e),
            Ok(_) => panic!("expected error"),
        }
    }

    #[cfg(not(feature = "keychain"))]
    #[test]
    fn create_keychain_without_feature() {
        let err = create_store("keychain").err().expect("expected error");
        assert!(err.to_string().contains("not enabled"));
    }

    #[test]
    fn default_provider_is_valid() {
        assert!(VALID_PROVIDERS.contains(&DEFAULT_PROVIDER));
    }
}
