//! HTTP adapter for the Google Play Developer API.
//!
//! Implements [`EditService`] against the real service. Vendor error
//! responses are mapped onto the closed [`FailureKind`] classification at
//! this boundary so the rest of the crate never handles vendor shapes.
//!
//! ## Authentication
//!
//! Uses a Google Cloud service account: a short-lived JWT is exchanged for an
//! OAuth 2.0 access token, which is cached until shortly before expiry.

use crate::api::EditService;
use crate::config::{PlayConfig, ServiceAccountKey};
use crate::error::{FailureKind, PlayError, Result};
use crate::progress::{UploadProgressReporter, UPLOAD_CHUNK_SIZE};
use crate::types::{Artifact, InAppProduct, LocalizedText, Track};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

const API_BASE_URL: &str = "https://androidpublisher.googleapis.com/androidpublisher/v3";
const UPLOAD_BASE_URL: &str =
    "https://androidpublisher.googleapis.com/upload/androidpublisher/v3";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const ANDROID_PUBLISHER_SCOPE: &str = "https://www.googleapis.com/auth/androidpublisher";

/// OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Token cache for thread-safe access.
#[derive(Debug, Default)]
struct TokenCache {
    access_token: Option<String>,
    expires_at: Option<chrono::DateTime<Utc>>,
}

/// Minimal shape of a Google API error body.
#[derive(Debug, Deserialize, Default)]
struct ApiErrorBody {
    #[serde(default)]
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize, Default)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorItem>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiErrorItem {
    #[serde(default)]
    reason: String,
}

#[derive(Debug, Deserialize)]
struct EditResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracksResponse {
    #[serde(default)]
    tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApkResponse {
    version_code: i64,
    binary: Option<ApkBinary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApkBinary {
    sha256: Option<String>,
}

/// Google Play Developer API client.
pub struct PlayClient {
    config: PlayConfig,
    client: Client,
    token_cache: Arc<RwLock<TokenCache>>,
    service_account: ServiceAccountKey,
}

impl PlayClient {
    /// Creates a client, loading and validating the service account key.
    pub fn new(config: PlayConfig) -> Result<Self> {
        let service_account = config.load_service_account_key()?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()?;

        Ok(Self {
            config,
            client,
            token_cache: Arc::new(RwLock::new(TokenCache::default())),
            service_account,
        })
    }

    /// Get or refresh the OAuth2 access token.
    async fn get_access_token(&self) -> Result<String> {
        {
            let cache = self.token_cache.read().await;
            if let (Some(token), Some(expires)) = (&cache.access_token, cache.expires_at) {
                if Utc::now() < expires - Duration::minutes(5) {
                    return Ok(token.clone());
                }
            }
        }

        let now = Utc::now();
        let exp = now + Duration::hours(1);

        #[derive(Serialize)]
        struct Claims {
            iss: String,
            scope: String,
            aud: String,
            iat: i64,
            exp: i64,
        }

        let claims = Claims {
            iss: self.service_account.client_email.clone(),
            scope: ANDROID_PUBLISHER_SCOPE.to_string(),
            aud: TOKEN_URL.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let encoding_key =
            jsonwebtoken::EncodingKey::from_rsa_pem(self.service_account.private_key.as_bytes())
                .map_err(|e| {
                    PlayError::InvalidCredentials(format!("Invalid private key: {}", e))
                })?;

        let jwt = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256),
            &claims,
            &encoding_key,
        )?;

        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", &jwt),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PlayError::api(
                FailureKind::Unauthenticated,
                status,
                error_text,
            ));
        }

        let token_response: TokenResponse = response.json().await?;

        {
            let mut cache = self.token_cache.write().await;
            cache.access_token = Some(token_response.access_token.clone());
            cache.expires_at = Some(Utc::now() + Duration::seconds(token_response.expires_in));
        }

        Ok(token_response.access_token)
    }

    /// Make an authenticated API request against the JSON endpoint.
    async fn api_request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let token = self.get_access_token().await?;
        let url = format!("{}{}", API_BASE_URL, endpoint);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json");

        if let Some(body) = body {
            request = request.json(&body);
        }

        debug!("Making {} request to {}", method, url);

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classified_error(status.as_u16(), &error_text));
        }

        Ok(response.json().await?)
    }
}

/// Maps an error response onto the closed failure classification.
fn classified_error(status: u16, body: &str) -> PlayError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = if parsed.error.message.is_empty() {
        body.to_string()
    } else {
        parsed.error.message
    };

    let has_reason = |reason: &str| parsed.error.errors.iter().any(|e| e.reason == reason);

    let kind = if status == 401 {
        FailureKind::Unauthenticated
    } else if (500..600).contains(&status) {
        FailureKind::Transient
    } else if has_reason("applicationNotFound") {
        FailureKind::ApplicationNotFound
    } else if has_reason("editAlreadyCommitted") {
        FailureKind::EditAlreadyCommitted
    } else if has_reason("apkUpgradeVersionConflict")
        || message.contains("already been used")
    {
        FailureKind::DuplicateArtifact
    } else {
        FailureKind::Other
    };

    PlayError::api(kind, status, message)
}

#[async_trait]
impl EditService for PlayClient {
    async fn create_edit(&self, package_name: &str) -> Result<String> {
        let endpoint = format!("/applications/{}/edits", package_name);
        let response: EditResponse = self
            .api_request(Method::POST, &endpoint, Some(serde_json::json!({})))
            .await?;
        debug!("Created edit session {}", response.id);
        Ok(response.id)
    }

    async fn validate_edit(&self, package_name: &str, edit_id: &str) -> Result<()> {
        let endpoint = format!("/applications/{}/edits/{}", package_name, edit_id);
        let _: EditResponse = self.api_request(Method::GET, &endpoint, None).await?;
        Ok(())
    }

    async fn commit_edit(&self, package_name: &str, edit_id: &str) -> Result<()> {
        let endpoint = format!("/applications/{}/edits/{}:commit", package_name, edit_id);
        let _: serde_json::Value = self
            .api_request(Method::POST, &endpoint, None)
            .await?;
        Ok(())
    }

    async fn delete_edit(&self, package_name: &str, edit_id: &str) -> Result<()> {
        let token = self.get_access_token().await?;
        let url = format!(
            "{}/applications/{}/edits/{}",
            API_BASE_URL, package_name, edit_id
        );

        let response = self
            .client
            .delete(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() && status != reqwest::StatusCode::NO_CONTENT {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classified_error(status.as_u16(), &error_text));
        }
        Ok(())
    }

    async fn list_tracks(&self, package_name: &str, edit_id: &str) -> Result<Vec<Track>> {
        let endpoint = format!("/applications/{}/edits/{}/tracks", package_name, edit_id);
        let response: TracksResponse = self.api_request(Method::GET, &endpoint, None).await?;
        Ok(response.tracks)
    }

    async fn update_track(&self, package_name: &str, edit_id: &str, track: &Track) -> Result<()> {
        let endpoint = format!(
            "/applications/{}/edits/{}/tracks/{}",
            package_name, edit_id, track.track
        );
        let _: serde_json::Value = self
            .api_request(Method::PUT, &endpoint, Some(serde_json::to_value(track)?))
            .await?;
        Ok(())
    }

    async fn upload_artifact(
        &self,
        package_name: &str,
        edit_id: &str,
        artifact: &Path,
        progress: UploadProgressReporter,
    ) -> Result<Artifact> {
        let token = self.get_access_token().await?;
        let url = format!(
            "{}/applications/{}/edits/{}/apks?uploadType=media",
            UPLOAD_BASE_URL, package_name, edit_id
        );

        let data = tokio::fs::read(artifact).await?;
        let total = data.len() as u64;

        // Stream the body in fixed chunks so progress can be observed as
        // bytes leave the client.
        let chunks: Vec<Vec<u8>> = data
            .chunks(UPLOAD_CHUNK_SIZE)
            .map(|chunk| chunk.to_vec())
            .collect();
        let mut sent = 0u64;
        let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            progress.bytes_sent(sent, total);
            Ok::<Vec<u8>, std::io::Error>(chunk)
        }));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/vnd.android.package-archive")
            .header("Content-Length", total)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classified_error(status.as_u16(), &error_text));
        }

        let apk: ApkResponse = response.json().await?;

        Ok(Artifact {
            version_code: apk.version_code,
            binary_sha256: apk.binary.and_then(|b| b.sha256),
        })
    }

    async fn update_product(&self, package_name: &str, product: &InAppProduct) -> Result<()> {
        let endpoint = format!(
            "/applications/{}/inappproducts/{}",
            package_name, product.sku
        );
        let _: serde_json::Value = self
            .api_request(
                Method::PUT,
                &endpoint,
                Some(serde_json::to_value(product)?),
            )
            .await?;
        Ok(())
    }

    async fn attach_release_notes(
        &self,
        package_name: &str,
        edit_id: &str,
        version_code: i64,
        notes: &[LocalizedText],
    ) -> Result<()> {
        for note in notes {
            let endpoint = format!(
                "/applications/{}/edits/{}/apklistings/{}/{}",
                package_name, edit_id, version_code, note.language
            );
            let body = serde_json::json!({
                "language": note.language,
                "recentChanges": note.text,
            });
            let _: serde_json::Value = self
                .api_request(Method::PUT, &endpoint, Some(body))
                .await?;
        }
        Ok(())
    }
}
