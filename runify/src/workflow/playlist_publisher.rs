//! Playlist Publisher
//!
//! Creates the target playlist and appends candidates one request at a time,
//! in sequence order. A failed append stops publishing; tracks already
//! appended stay in the playlist.

use tracing::{debug, error, info, warn};

use crate::error::{Result, RunifyError};
use crate::models::CandidateEntry;
use crate::services::StreamingService;

/// Outcome of a successful publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub playlist_id: String,
    pub tracks_appended: usize,
}

/// Writes ordered candidates to a new playlist
pub struct PlaylistPublisher<'a, S: StreamingService + ?Sized> {
    service: &'a S,
    owner: &'a str,
}

impl<'a, S: StreamingService + ?Sized> PlaylistPublisher<'a, S> {
    pub fn new(service: &'a S, owner: &'a str) -> Self {
        Self { service, owner }
    }

    /// Create playlist `name` and append `candidates` in order
    pub async fn publish(&self, name: &str, candidates: &[CandidateEntry]) -> Result<PublishResult> {
        let playlist = self
            .service
            .create_playlist(self.owner, name)
            .await
            .map_err(|source| RunifyError::CreatePlaylist {
                name: name.to_string(),
                source,
            })?;

        if candidates.is_empty() {
            warn!(playlist_id = %playlist.id, "No tracks matched the cadence band; playlist left empty");
        }

        for (position, entry) in candidates.iter().enumerate() {
            if let Err(source) = self
                .service
                .append_track(self.owner, &playlist.id, &entry.id)
                .await
            {
                error!(
                    playlist_id = %playlist.id,
                    track_id = %entry.id,
                    position,
                    error = %source,
                    "Append failed; earlier tracks remain in the playlist"
                );
                return Err(RunifyError::Append {
                    position,
                    track_id: entry.id.to_string(),
                    playlist_id: playlist.id.clone(),
                    source,
                });
            }
            debug!(position, track_id = %entry.id, "Track appended");
        }

        info!(
            playlist_id = %playlist.id,
            name = %name,
            tracks = candidates.len(),
            "Published playlist"
        );

        Ok(PublishResult {
            playlist_id: playlist.id,
            tracks_appended: candidates.len(),
        })
    }
}
