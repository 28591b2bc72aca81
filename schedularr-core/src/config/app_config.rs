//! OAuth client configuration.
//!
//! User-provided OAuth credentials stored at:
//!   ~/.config/schedularr/app_config.toml
//!
//! `SCHEDULARR_GOOGLE_CLIENT_ID` and `SCHEDULARR_GOOGLE_CLIENT_SECRET`
//! take precedence over the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::base_dir;
use crate::error::{SchedularrError, SchedularrResult};

pub const CLIENT_ID_ENV: &str = "SCHEDULARR_GOOGLE_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "SCHEDULARR_GOOGLE_CLIENT_SECRET";

/// Google OAuth client credentials.
///
/// Desktop clients still get a secret from the Google console, but it is
/// not confidential; PKCE is what protects the code exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl AppConfig {
    pub fn path() -> SchedularrResult<PathBuf> {
        Ok(base_dir()?.join("app_config.toml"))
    }

    pub fn load() -> SchedularrResult<Self> {
        let from_file = Self::load_from(&Self::path()?)?;
        Self::with_env_overrides(from_file)
    }

    /// Load from a specific file. Returns `None` if it doesn't exist.
    pub fn load_from(path: &Path) -> SchedularrResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents).map_err(|e| {
            SchedularrError::Config(format!(
                "Failed to parse credentials from {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Some(config))
    }

    fn with_env_overrides(from_file: Option<Self>) -> SchedularrResult<Self> {
        let env_id = std::env::var(CLIENT_ID_ENV).ok().filter(|v| !v.is_empty());
        let env_secret = std::env::var(CLIENT_SECRET_ENV)
            .ok()
            .filter(|v| !v.is_empty());

        match (env_id, from_file) {
            (Some(client_id), file) => Ok(AppConfig {
                client_id,
                client_secret: env_secret.or(file.and_then(|f| f.client_secret)),
            }),
            (None, Some(mut file)) => {
                if env_secret.is_some() {
                    file.client_secret = env_secret;
                }
                Ok(file)
            }
            (None, None) => Err(SchedularrError::Config(format!(
                "Google credentials not found.\n\n\
                Create {} with:\n\n\
                client_id = \"your-client-id.apps.googleusercontent.com\"\n\
                client_secret = \"your-client-secret\"\n\n\
                or set {}.\n\
                See https://console.cloud.google.com/apis/credentials for setup.",
                Self::path()?.display(),
                CLIENT_ID_ENV
            ))),
        }
    }

    pub fn save(&self) -> SchedularrResult<()> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}
