//! Error types for runify
//!
//! Pipeline error taxonomy:
//! - Resolution: malformed playlist reference, raised before any fetch
//! - Fetch: remote failure while paging or collecting track data
//! - Publish: playlist creation or per-track append failure

use crate::services::ServiceError;
use thiserror::Error;

/// Pipeline error type
#[derive(Debug, Error)]
pub enum RunifyError {
    /// Playlist reference could not be resolved to an identifier
    #[error("Invalid playlist reference '{reference}': {reason}")]
    Resolution { reference: String, reason: String },

    /// Remote call failed while fetching playlist or track data
    #[error("Failed to fetch {context}: {source}")]
    Fetch {
        context: String,
        #[source]
        source: ServiceError,
    },

    /// Track has no usable tempo analysis and the policy is to abort
    #[error("No tempo analysis available for track {track_id}")]
    MissingAnalysis { track_id: String },

    /// Target playlist could not be created
    #[error("Failed to create playlist '{name}': {source}")]
    CreatePlaylist {
        name: String,
        #[source]
        source: ServiceError,
    },

    /// A single-track append failed; earlier appends are not rolled back
    #[error(
        "Failed to append track {track_id} at position {position} to playlist {playlist_id}: {source}"
    )]
    Append {
        position: usize,
        track_id: String,
        playlist_id: String,
        #[source]
        source: ServiceError,
    },

    /// OAuth session could not be established
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid or incomplete settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// runify-common error
    #[error("Common error: {0}")]
    Common(#[from] runify_common::Error),
}

impl RunifyError {
    pub(crate) fn fetch(context: impl Into<String>, source: ServiceError) -> Self {
        RunifyError::Fetch {
            context: context.into(),
            source,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, RunifyError>;
