//! secrets::traits
//!
//! Secret storage trait definition.
//!
//! # Design
//!
//! `SecretStore` is a flat, synchronous key-value interface. Keys are
//! namespaced (`session.bearer_token`, `session.user_id`) so several
//! consumers can share one backing store.
//!
//! Implementations MUST:
//! - Never log, print, or include secret values in error messages
//! - Be thread-safe (Send + Sync)
//! - Treat deleting a missing key as success

use thiserror::Error;

/// Errors from secret storage operations.
///
/// Messages carry keys and causes, never values.
#[derive(Debug, Error)]
pub enum SecretError {
    /// Failed to read from secret storage.
    #[error("failed to read secret: {0}")]
    ReadError(String),

    /// Failed to write to secret storage.
    #[error("failed to write secret: {0}")]
    WriteError(String),

    /// Failed to delete from secret storage.
    #[error("failed to delete secret: {0}")]
    DeleteError(String),

    /// Provider not available or not configured.
    #[error("secret provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// Trait for secret storage providers.
///
/// Blocking by design: callers on an async runtime move calls onto a
/// blocking thread (see [`crate::auth::SecretTokenStore`]).
pub trait SecretStore: Send + Sync {
    /// Get a secret by key. `Ok(None)` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, SecretError>;

    /// Set a secret, overwriting any existing value.
    fn set(&self, key: &str, value: &str) -> Result<(), SecretError>;

    /// Delete a secret. Idempotent.
    fn delete(&self, key: &str) -> Result<(), SecretError>;

    /// Delete several secrets.
    ///
    /// The default deletes one key at a time and stops at the first error.
    /// Stores that can batch (one file rewrite) should override this.
    fn delete_all(&self, keys: &[&str]) -> Result<(), SecretError> {
        for key in keys {
            self.delete(key)?;
        }
        Ok(())
    }

    /// Check if a secret exists.
    fn exists(&self, key: &str) -> Result<bool, SecretError> {
        Ok(self.get(key)?.is_some())
    }
}
