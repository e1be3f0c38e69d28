//! Persisted user identity.
//!
//! The session core never touches the filesystem directly; it goes
//! through [`DetailsStore`] so tests can swap in the in-memory fake.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use poker_common::SessionError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The `(voter, room, scale)` triple that survives reloads. Written after
/// a successful name submission or a scale change, read at every connect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    pub voter: String,
    #[serde(rename = "roomID")]
    pub room_id: String,
    #[serde(rename = "votingCard")]
    pub voting_card: String,
    /// RFC 3339 timestamp of the last write.
    pub saved_at: String,
}

impl UserDetails {
    pub fn new(voter: &str, room_id: &str, voting_card: &str) -> Self {
        Self {
            voter: voter.trim().to_string(),
            room_id: room_id.to_string(),
            voting_card: voting_card.to_string(),
            saved_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Narrow read/write interface over wherever the identity blob lives.
pub trait DetailsStore {
    fn load(&self) -> Result<Option<UserDetails>, SessionError>;
    fn save(&self, details: &UserDetails) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// JSON blob under the platform config directory.
pub struct FileDetailsStore {
    path: PathBuf,
}

impl FileDetailsStore {
    /// Store at the platform default path
    /// (`~/.config/planning-poker/session.json` on Linux).
    pub fn new() -> Result<Self, SessionError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SessionError::Storage("could not determine config directory".into()))?;
        Ok(Self {
            path: config_dir.join("planning-poker").join("session.json"),
        })
    }

    /// Store at a specific path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DetailsStore for FileDetailsStore {
    fn load(&self) -> Result<Option<UserDetails>, SessionError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SessionError::Storage(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };
        match serde_json::from_str(&text) {
            Ok(details) => Ok(Some(details)),
            Err(e) => {
                // A corrupt blob is treated as absent, not fatal.
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable session blob");
                Ok(None)
            }
        }
    }

    fn save(&self, details: &UserDetails) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(details)
            .map_err(|e| SessionError::Storage(format!("failed to serialize details: {e}")))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SessionError::Storage(format!(
                    "failed to create config directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        // Atomic write: write to .tmp, then rename.
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(|e| {
            SessionError::Storage(format!("failed to write {}: {e}", tmp_path.display()))
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            SessionError::Storage(format!("failed to move {}: {e}", tmp_path.display()))
        })?;

        info!(path = %self.path.display(), "Saved session details");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Storage(format!(
                "failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Storage fake for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryDetailsStore {
    inner: Mutex<Option<UserDetails>>,
}

impl DetailsStore for MemoryDetailsStore {
    fn load(&self) -> Result<Option<UserDetails>, SessionError> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| SessionError::Storage("poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, details: &UserDetails) -> Result<(), SessionError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| SessionError::Storage("poisoned".into()))?;
        *guard = Some(details.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| SessionError::Storage("poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}
