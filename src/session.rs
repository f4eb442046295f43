//! File-backed session state for the offline demo mode.
//!
//! When `offline_auth` is enabled the client never contacts the auth API;
//! instead the logged-in email is kept in a small JSON file so the demo
//! session survives between invocations, the way the original dashboard
//! kept it in browser session storage.
//!
//! # Storage Location
//!
//! The session file lives in the platform cache directory:
//! - Linux: `~/.cache/surascan/session.json`
//! - macOS: `~/Library/Caches/surascan/session.json`
//! - Windows: `%LOCALAPPDATA%\surascan\session.json`
//!
//! # Example
//!
//! ```no_run
//! use surascan::SessionStore;
//!
//! let store = SessionStore::new();
//! store.save("founder@startup.test").unwrap();
//!
//! let session = store.load().unwrap();
//! assert_eq!(session.email, "founder@startup.test");
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const SESSION_FILE: &str = "session.json";

/// A persisted demo session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub email: String,
}

/// Stores the offline demo session on disk.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Creates a store rooted at the platform cache directory.
    pub fn new() -> Self {
        Self {
            dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join("surascan"),
        }
    }

    /// Creates a store rooted at an explicit directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Reads the stored session, if any.
    ///
    /// A missing or unreadable file simply means no session.
    pub fn load(&self) -> Option<StoredSession> {
        let content = fs::read_to_string(self.path()).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Persists a session for the given email.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self, email: &str) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let session = StoredSession {
            email: email.to_string(),
        };
        fs::write(self.path(), serde_json::to_string(&session)?)?;
        Ok(())
    }

    /// Removes the stored session.
    pub fn clear(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
