//! The signed-in user's session, persisted to session.toml.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::base_dir;
use crate::error::{SchedularrError, SchedularrResult};

/// Refresh a little before Google actually expires the token.
const EXPIRY_LEEWAY_SECS: i64 = 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
}

impl Session {
    pub fn is_signed_in(&self) -> bool {
        !self.access_token.is_empty()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now + Duration::seconds(EXPIRY_LEEWAY_SECS) >= expires_at,
            None => false,
        }
    }
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    pub fn open_default() -> SchedularrResult<Self> {
        Ok(Self::new(base_dir()?.join("session.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` when nobody is signed in.
    pub fn load(&self) -> SchedularrResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let session: Session = toml::from_str(&contents).map_err(|e| {
            SchedularrError::Config(format!(
                "Failed to parse session from {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(Some(session).filter(Session::is_signed_in))
    }

    pub fn save(&self, session: &Session) -> SchedularrResult<()> {
        let contents = toml::to_string_pretty(session)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.path, contents)?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn clear(&self) -> SchedularrResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
