//! Remote streaming service capability set
//!
//! The pipeline only talks to the remote catalog through this trait, so any
//! client (HTTP or in-memory) can stand behind it.

use async_trait::async_trait;
use thiserror::Error;

use super::api_models::{AudioAnalysis, CreatedPlaylist, PlaylistTrackPage, TrackObject};
use crate::models::{PlaylistId, TrackId};

/// Remote service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Network communication error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Access token rejected or expired
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Service asked the client to slow down
    #[error("Rate limit exceeded (retry after {retry_after:?} s)")]
    RateLimitExceeded { retry_after: Option<u64> },

    /// Service returned an error response
    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    /// Failed to parse response JSON
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Continuation cursor does not point at the configured service
    #[error("Invalid continuation cursor: {0}")]
    InvalidCursor(String),
}

/// Operations the pipeline needs from the remote service
#[async_trait]
pub trait StreamingService: Send + Sync {
    /// Fetch one page of playlist entries
    ///
    /// `cursor` is `None` for the first page and the previous page's `next`
    /// value afterwards.
    async fn playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        cursor: Option<&str>,
    ) -> Result<PlaylistTrackPage, ServiceError>;

    /// Fetch track metadata
    async fn track(&self, track_id: &TrackId) -> Result<TrackObject, ServiceError>;

    /// Fetch tempo analysis
    async fn audio_analysis(&self, track_id: &TrackId) -> Result<AudioAnalysis, ServiceError>;

    /// Create an empty playlist owned by `owner`
    async fn create_playlist(&self, owner: &str, name: &str)
        -> Result<CreatedPlaylist, ServiceError>;

    /// Append a single track to the end of a playlist
    async fn append_track(
        &self,
        owner: &str,
        playlist_id: &str,
        track_id: &TrackId,
    ) -> Result<(), ServiceError>;
}
