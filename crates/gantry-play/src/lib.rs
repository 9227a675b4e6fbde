//! Google Play publishing client for Gantry
//!
//! This crate orchestrates the client side of publishing Android artifacts
//! and store metadata through the Play Developer API's edit-based workflow:
//!
//! 1. Acquire (or resume) an edit session
//! 2. Upload artifacts, push products, or promote releases within it
//! 3. Leave commit/discard to the host once every step has run
//!
//! ## Session Resumption
//!
//! [`EditSessionManager`] persists the edit id to a local file so an
//! interrupted build resumes the same server-side transaction instead of
//! minting a duplicate. A persisted id the service reports as already
//! committed is discarded and replaced exactly once.
//!
//! ## Failure Classification
//!
//! All remote failures are classified at the service boundary into
//! [`FailureKind`]; only transient server errors are retried (see
//! [`retry::retryable_execute`]), and session invalidation is the only
//! automatically recovered condition.
//!
//! ## Usage
//!
//! ```ignore
//! use gantry_play::{ArtifactPublisher, EditSessionManager, PlayClient, PlayConfig};
//!
//! let client = PlayClient::new(PlayConfig::from_env("com.example.app")?)?;
//! let manager = EditSessionManager::new(&client, "com.example.app", id_file);
//! manager
//!     .with_session(false, |edit_id| async move {
//!         let publisher = ArtifactPublisher::new(&client, "com.example.app");
//!         publisher.publish_dir(&edit_id, &apk_dir, &options).await
//!     })
//!     .await?;
//! ```
//!
//! ## Features
//!
//! - **resources**: integration with `gantry-resources` for synchronizing
//!   the publishing resource tree and pushing changed in-app products as
//!   part of the workflow.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod products;
pub mod progress;
pub mod publish;
pub mod retry;
pub mod session;
pub mod tracks;
pub mod types;

#[cfg(feature = "resources")]
pub mod resource_integration;

#[cfg(test)]
mod test_support;

pub use api::EditService;
pub use config::{PlayConfig, ReleaseOptions};
pub use error::{FailureKind, PlayError, Result};
pub use http::PlayClient;
pub use products::ProductPublisher;
pub use progress::{ProgressSink, TracingProgress, UploadEvent, UploadProgressReporter};
pub use publish::ArtifactPublisher;
pub use retry::{retryable_execute, DEFAULT_MAX_ATTEMPTS};
pub use session::{EditSessionManager, EDIT_ID_FILE};
pub use tracks::TrackPromoter;
pub use types::{Artifact, InAppProduct, LocalizedText, Release, ReleaseStatus, Track};
