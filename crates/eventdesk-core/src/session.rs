//! Single-slot persistence for the admin access token.
//!
//! Stores the token in `<base>/session.json` with restricted permissions (0600).
//! Tokens are never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Holds at most one access token.
pub trait SessionStore: Send + Sync {
    /// Returns the stored token, or `None` when nothing (or nothing usable) is stored.
    ///
    /// # Errors
    /// Returns an error if the backing storage exists but cannot be read.
    fn load(&self) -> Result<Option<String>>;

    /// Replaces the stored token.
    ///
    /// # Errors
    /// Returns an error if the token cannot be persisted.
    fn save(&self, token: &str) -> Result<()>;

    /// Removes the stored token. Returns whether one was present.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be removed.
    fn clear(&self) -> Result<bool>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    #[serde(default)]
    access_token: Option<String>,
}

/// File-backed store at `<home>/session.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: Option<PathBuf>,
}

impl FileSessionStore {
    /// Store at the default location under the eventdesk home.
    ///
    /// When no home can be determined the store has no storage:
    /// `load` returns `None` and `save` fails.
    pub fn new() -> Self {
        Self {
            path: paths::session_path(),
        }
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>> {
        let Some(path) = self.path.as_deref() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session from {}", path.display()))?;
        let session: SessionFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", path.display()))?;

        Ok(session.access_token.filter(|t| !t.trim().is_empty()))
    }

    fn save(&self, token: &str) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            bail!("No home directory available to store the session");
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(&SessionFile {
            access_token: Some(token.to_string()),
        })
        .context("Failed to serialize session")?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(path)
            .with_context(|| format!("Failed to open {} for writing", path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write to {}", path.display()))?;

        tracing::debug!(path = %path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<bool> {
        let Some(path) = self.path.as_deref() else {
            return Ok(false);
        };
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(path)
            .with_context(|| format!("Failed to remove session {}", path.display()))?;
        tracing::debug!(path = %path.display(), "session cleared");
        Ok(true)
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a token.
    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Mutex::new(Some(token.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.clone().filter(|t| !t.trim().is_empty()))
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<bool> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some())
    }
}

/// Masks a token for display: first 12 characters, or `***` when short.
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 16 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(12).collect();
    format!("{prefix}...")
}
