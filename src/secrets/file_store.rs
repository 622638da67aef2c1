//! secrets::file_store
//!
//! File-based secret storage.
//!
//! # Security
//!
//! - Secrets live in `<home>/secrets.toml` (see [`crate::core::paths`])
//! - File permissions are 0600 on Unix
//! - Writes are atomic (temp file, then rename)
//! - Values never appear in errors or logs
//!
//! # Concurrency
//!
//! Every mutation is a read-modify-write of the whole file. A process-local
//! mutex serializes them so concurrent blocking tasks cannot lose updates.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use super::traits::{SecretError, SecretStore};
use crate::core::paths::PartnerlinkPaths;

/// File-based secret storage (the default provider).
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
    write_guard: Mutex<()>,
}

impl FileSecretStore {
    /// Create a store at the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, SecretError> {
        let paths = PartnerlinkPaths::discover()
            .ok_or_else(|| SecretError::ReadError("cannot determine home directory".into()))?;
        Ok(Self::with_path(paths.secrets_path()))
    }

    /// Create a store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            write_guard: Mutex::new(()),
        }
    }

    /// Path to the secrets file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_secrets(&self) -> Result<HashMap<String, String>, SecretError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| SecretError::ReadError(format!("cannot read secrets file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SecretError::ReadError(format!("cannot parse secrets file: {}", e)))
    }

    fn write_secrets(&self, secrets: &HashMap<String, String>) -> Result<(), SecretError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SecretError::WriteError(format!("cannot create directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(secrets)
            .map_err(|e| SecretError::WriteError(format!("cannot serialize secrets: {}", e)))?;

        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| SecretError::WriteError(format!("cannot create temp file: {}", e)))?;

            // Restrict before any content lands on disk.
            #[cfg(unix)]
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| SecretError::WriteError(format!("cannot set permissions: {}", e)))?;

            file.write_all(content.as_bytes())
                .map_err(|e| SecretError::WriteError(format!("cannot write secrets: {}", e)))?;
            file.sync_all()
                .map_err(|e| SecretError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| SecretError::WriteError(format!("cannot rename temp file: {}", e)))
    }

    /// Apply a mutation under the write guard.
    fn update<F>(&self, mutate: F) -> Result<(), SecretError>
    where
        F: FnOnce(&mut HashMap<String, String>) -> bool,
    {
        let _guard = self
            .write_guard
            .lock()
            .map_err(|_| SecretError::WriteError("secret store lock poisoned".into()))?;
        let mut secrets = self.read_secrets()?;
        if mutate(&mut secrets) {
            self.write_secrets(&secrets)?;
        }
        Ok(())
    }

    /// Returns true if the file is missing or has 0600 permissions.
    #[cfg(unix)]
    pub fn verify_permissions(&self) -> Result<bool, SecretError> {
        if !self.path.exists() {
            return Ok(true);
        }
        let metadata = fs::metadata(&self.path)
            .map_err(|e| SecretError::ReadError(format!("cannot read file metadata: {}", e)))?;
        Ok(metadata.permissions().mode() & 0o777 == 0o600)
    }

    #[cfg(not(unix))]
    pub fn verify_permissions(&self) -> Result<bool, SecretError> {
        Ok(true)
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        Ok(self.read_secrets()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        self.update(|secrets| {
            secrets.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn delete(&self, key: &str) -> Result<(), SecretError> {
        self.update(|secrets| secrets.remove(key).is_some())
            .map_err(|e| SecretError::DeleteError(e.to_string()))
    }

    fn delete_all(&self, keys: &[&str]) -> Result<(), SecretError> {
        self.update(|secrets| {
            let before = secrets.len();
            for key in keys {
                secrets.remove(*key);
            }
            secrets.len() != before
        })
        .map_err(|e| SecretError::DeleteError(e.to_string()))
    }
}
