//! core::paths
//!
//! Centralized path routing for partnerlink storage locations.
//!
//! # Storage Layout
//!
//! All user data lives under the partnerlink home directory:
//! - `config.toml` - Global configuration
//! - `secrets.toml` - File-backed secret store (0600)
//!
//! # Home Resolution
//!
//! 1. `$PARTNERLINK_HOME` if set
//! 2. `~/.partnerlink`
//!
//! # Example
//!
//! ```
//! use partnerlink::core::paths::PartnerlinkPaths;
//! use std::path::PathBuf;
//!
//! let paths = PartnerlinkPaths::new(PathBuf::from("/home/ana/.partnerlink"));
//! assert_eq!(
//!     paths.secrets_path(),
//!     PathBuf::from("/home/ana/.partnerlink/secrets.toml")
//! );
//! ```

use std::path::{Path, PathBuf};

/// Environment variable overriding the home directory.
pub const HOME_ENV: &str = "PARTNERLINK_HOME";

/// Directory name under the user's home directory.
const HOME_DIR_NAME: &str = ".partnerlink";

/// Path helper rooted at the partnerlink home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerlinkPaths {
    home: PathBuf,
}

impl PartnerlinkPaths {
    /// Create paths rooted at an explicit home directory.
    pub fn new(home: PathBuf) -> Self {
        Self { home }
    }

    /// Resolve the home directory from the environment.
    ///
    /// Returns `None` when neither `$PARTNERLINK_HOME` is set nor the user's
    /// home directory can be determined.
    pub fn discover() -> Option<Self> {
        if let Ok(home) = std::env::var(HOME_ENV) {
            if !home.is_empty() {
                return Some(Self::new(PathBuf::from(home)));
            }
        }
        dirs::home_dir().map(|h| Self::new(h.join(HOME_DIR_NAME)))
    }

    /// The home directory itself.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Canonical global config location.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// File secret store location.
    pub fn secrets_path(&self) -> PathBuf {
        self.home.join("secrets.toml")
    }
}
