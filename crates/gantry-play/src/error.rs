//! Play publishing error types.

use thiserror::Error;

/// Closed classification of remote-service failures.
///
/// The HTTP adapter maps vendor error responses onto this set; the core never
/// sees vendor-specific error shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Server-side transient error (HTTP 5xx). The only retryable kind.
    Transient,
    /// The application does not exist yet on the store.
    ApplicationNotFound,
    /// The referenced edit session was already committed.
    EditAlreadyCommitted,
    /// Authentication failed (HTTP 401-class).
    Unauthenticated,
    /// The artifact was already uploaded.
    DuplicateArtifact,
    /// Anything else.
    Other,
}

/// Play publishing errors.
#[derive(Debug, Error)]
pub enum PlayError {
    /// Classified API error from the publishing service.
    #[error("API error ({status}): {message}")]
    Api {
        kind: FailureKind,
        status: u16,
        message: String,
    },

    /// The application has never been published.
    #[error(
        "No application found for the package name {package}. The first \
         version of your app must be uploaded via the Play Store console."
    )]
    ApplicationNotFound { package: String },

    /// The service account could not be authenticated.
    #[error(
        "Service account not authenticated: {0}. Check that the service \
         account key is valid and has access to the application."
    )]
    Unauthenticated(String),

    /// Invalid credentials.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Configuration or precondition error, raised before any side effect.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// A named track does not exist or has no active artifacts.
    #[error("'{0}' track has no active artifacts")]
    TrackNotFound(String),

    /// IO error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JWT error.
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Resource tree error.
    #[cfg(feature = "resources")]
    #[error("Resource error: {0}")]
    Resource(#[from] gantry_resources::ResourceError),
}

impl PlayError {
    /// Builds a classified API error.
    pub fn api(kind: FailureKind, status: u16, message: impl Into<String>) -> Self {
        PlayError::Api {
            kind,
            status,
            message: message.into(),
        }
    }

    /// The failure classification of this error.
    ///
    /// Non-API errors classify as [`FailureKind::Other`] and are never
    /// retried or recovered automatically.
    pub fn kind(&self) -> FailureKind {
        match self {
            PlayError::Api { kind, .. } => *kind,
            _ => FailureKind::Other,
        }
    }
}

/// Result type for Play publishing operations.
pub type Result<T> = std::result::Result<T, PlayError>;
