//! Publishing configuration.

use crate::error::{PlayError, Result};
use crate::types::ReleaseStatus;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Google service account credentials.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[allow(dead_code)]
    pub token_uri: Option<String>,
}

/// Configuration for talking to the Play Developer API.
#[derive(Debug, Clone)]
pub struct PlayConfig {
    /// Application package name (e.g., "com.example.app").
    pub package_name: String,
    /// Path to a service account JSON key file.
    pub service_account_key_path: Option<PathBuf>,
    /// Or the JSON content directly.
    pub service_account_key_json: Option<String>,
}

impl PlayConfig {
    /// Creates a config from a service account key file path.
    pub fn from_key_file(package_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            package_name: package_name.into(),
            service_account_key_path: Some(path.into()),
            service_account_key_json: None,
        }
    }

    /// Creates a config from service account JSON content.
    pub fn from_key_json(package_name: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            service_account_key_path: None,
            service_account_key_json: Some(json.into()),
        }
    }

    /// Creates a config from environment variables.
    ///
    /// Looks for:
    /// - `GOOGLE_PLAY_SERVICE_ACCOUNT_KEY` (JSON content or path to file)
    /// - `GOOGLE_APPLICATION_CREDENTIALS` (path to file, fallback)
    pub fn from_env(package_name: impl Into<String>) -> Result<Self> {
        let package_name = package_name.into();

        if let Ok(key_value) = std::env::var("GOOGLE_PLAY_SERVICE_ACCOUNT_KEY") {
            let path = Path::new(&key_value);
            if path.is_file() {
                return Ok(Self::from_key_file(package_name, path));
            }
            if key_value.trim().starts_with('{') {
                return Ok(Self::from_key_json(package_name, key_value));
            }
            return Err(PlayError::InvalidConfig(
                "GOOGLE_PLAY_SERVICE_ACCOUNT_KEY is neither a valid file path nor JSON content"
                    .to_string(),
            ));
        }

        if let Ok(path) = std::env::var("GOOGLE_APPLICATION_CREDENTIALS") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(Self::from_key_file(package_name, path));
            }
            return Err(PlayError::InvalidConfig(format!(
                "GOOGLE_APPLICATION_CREDENTIALS file not found: {}",
                path.display()
            )));
        }

        Err(PlayError::InvalidConfig(
            "No service account credentials found. Set GOOGLE_PLAY_SERVICE_ACCOUNT_KEY \
             or GOOGLE_APPLICATION_CREDENTIALS"
                .to_string(),
        ))
    }

    /// Loads and parses the service account key.
    pub(crate) fn load_service_account_key(&self) -> Result<ServiceAccountKey> {
        let json_content = if let Some(ref json) = self.service_account_key_json {
            json.clone()
        } else if let Some(ref path) = self.service_account_key_path {
            std::fs::read_to_string(path).map_err(|e| {
                PlayError::InvalidConfig(format!("Failed to read service account key: {}", e))
            })?
        } else {
            return Err(PlayError::InvalidConfig(
                "No service account key configured".to_string(),
            ));
        };

        serde_json::from_str(&json_content)
            .map_err(|e| PlayError::InvalidCredentials(format!("Invalid service account key: {}", e)))
    }
}

/// Options shared by the publishing flows: which track to write and what
/// release shape to apply.
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Destination track.
    pub track: String,
    /// Promotion source track; `None` selects the track with the highest
    /// version code.
    pub from_track: Option<String>,
    /// Release status to apply; `None` keeps the fetched or default status.
    pub release_status: Option<ReleaseStatus>,
    /// Staged-rollout fraction to apply.
    pub user_fraction: Option<f64>,
    /// Per-locale release notes attached to uploads.
    pub release_notes: Vec<crate::types::LocalizedText>,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            track: "internal".to_string(),
            from_track: None,
            release_status: None,
            user_fraction: None,
            release_notes: Vec::new(),
        }
    }
}
