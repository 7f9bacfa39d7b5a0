//! In-memory streaming service
//!
//! Serves playlist pages, track metadata and tempo analyses from maps and
//! records every call, so tests can assert on request order as well as on
//! the published playlist.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use runify::models::{PlaylistId, TrackId};
use runify::services::{
    AnalysisTrack, AudioAnalysis, CreatedPlaylist, PlaylistItem, PlaylistTrackPage, ServiceError,
    StreamingService, TrackObject,
};

pub const CREATED_PLAYLIST_ID: &str = "NEWPLAYLIST";

/// Recorded service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    PlaylistPage { playlist_id: String, cursor: Option<String> },
    Track(String),
    Analysis(String),
    CreatePlaylist { owner: String, name: String },
    Append { playlist_id: String, track_id: String },
}

#[derive(Default)]
pub struct MockService {
    /// Pages per playlist id, in order; page `n` links to `cursor-n+1`
    pages: HashMap<String, Vec<Vec<PlaylistItem>>>,
    tracks: HashMap<String, TrackObject>,
    tempos: HashMap<String, Option<f64>>,
    failing_tracks: HashSet<String>,
    failing_pages: HashSet<usize>,
    fail_create: bool,
    fail_append_at: Option<usize>,
    /// Per-lookup delay keyed by track id, to shuffle completion order
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<MockCall>>,
    appended: Mutex<Vec<String>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog track with metadata and a tempo analysis
    pub fn with_track(mut self, id: &str, title: &str, tempo: f64) -> Self {
        self.tracks.insert(id.to_string(), track_object(id, title));
        self.tempos.insert(id.to_string(), Some(tempo));
        self
    }

    /// Register a catalog track whose analysis carries no tempo
    pub fn with_untimed_track(mut self, id: &str, title: &str) -> Self {
        self.tracks.insert(id.to_string(), track_object(id, title));
        self.tempos.insert(id.to_string(), None);
        self
    }

    /// Register a catalog track with metadata but no analysis at all
    pub fn with_unanalyzed_track(mut self, id: &str, title: &str) -> Self {
        self.tracks.insert(id.to_string(), track_object(id, title));
        self
    }

    /// Playlist whose entries are split into pages of the given ids
    pub fn with_playlist(mut self, playlist_id: &str, pages: &[&[&str]]) -> Self {
        let pages = pages
            .iter()
            .map(|ids| ids.iter().map(|id| entry(id)).collect())
            .collect();
        self.pages.insert(playlist_id.to_string(), pages);
        self
    }

    /// Playlist built from raw entries (for null or local items)
    pub fn with_playlist_items(mut self, playlist_id: &str, pages: Vec<Vec<PlaylistItem>>) -> Self {
        self.pages.insert(playlist_id.to_string(), pages);
        self
    }

    /// Metadata lookup for `track_id` fails with a server error
    pub fn failing_track(mut self, track_id: &str) -> Self {
        self.failing_tracks.insert(track_id.to_string());
        self
    }

    /// Page `index` (0-based) fails with a server error
    pub fn failing_page(mut self, index: usize) -> Self {
        self.failing_pages.insert(index);
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// The append at `position` (0-based) fails
    pub fn failing_append_at(mut self, position: usize) -> Self {
        self.fail_append_at = Some(position);
        self
    }

    pub fn with_delay(mut self, track_id: &str, delay: Duration) -> Self {
        self.delays.insert(track_id.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Track ids appended to the created playlist, in request order
    pub fn appended(&self) -> Vec<String> {
        self.appended.lock().unwrap().clone()
    }

    pub fn count_calls(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pause_for(&self, track_id: &str) {
        if let Some(delay) = self.delays.get(track_id) {
            tokio::time::sleep(*delay).await;
        }
    }
}

/// Playlist entry wrapping a catalog track
pub fn entry(id: &str) -> PlaylistItem {
    PlaylistItem {
        track: Some(track_object(id, &format!("Song {}", id))),
    }
}

/// Entry whose item was removed from the catalog
pub fn removed_entry() -> PlaylistItem {
    PlaylistItem { track: None }
}

/// Local file entry (no catalog id)
pub fn local_entry(title: &str) -> PlaylistItem {
    PlaylistItem {
        track: Some(TrackObject {
            id: None,
            name: title.to_string(),
            is_local: true,
            ..Default::default()
        }),
    }
}

fn track_object(id: &str, title: &str) -> TrackObject {
    TrackObject {
        id: Some(id.to_string()),
        name: title.to_string(),
        ..Default::default()
    }
}

fn server_error() -> ServiceError {
    ServiceError::ApiError(500, "internal error".to_string())
}

#[async_trait]
impl StreamingService for MockService {
    async fn playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        cursor: Option<&str>,
    ) -> Result<PlaylistTrackPage, ServiceError> {
        self.record(MockCall::PlaylistPage {
            playlist_id: playlist_id.to_string(),
            cursor: cursor.map(str::to_string),
        });

        let pages = self
            .pages
            .get(playlist_id.as_str())
            .ok_or_else(|| ServiceError::NotFound(format!("playlist {}", playlist_id)))?;

        let index = match cursor {
            None => 0,
            Some(cursor) => cursor
                .strip_prefix("cursor-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| ServiceError::InvalidCursor(cursor.to_string()))?,
        };

        if self.failing_pages.contains(&index) {
            return Err(server_error());
        }

        let items = pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < pages.len()).then(|| format!("cursor-{}", index + 1));

        Ok(PlaylistTrackPage {
            items,
            next,
            total: Some(pages.iter().map(Vec::len).sum::<usize>() as u32),
        })
    }

    async fn track(&self, track_id: &TrackId) -> Result<TrackObject, ServiceError> {
        self.record(MockCall::Track(track_id.to_string()));
        self.pause_for(track_id.as_str()).await;

        if self.failing_tracks.contains(track_id.as_str()) {
            return Err(server_error());
        }
        self.tracks
            .get(track_id.as_str())
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("track {}", track_id)))
    }

    async fn audio_analysis(&self, track_id: &TrackId) -> Result<AudioAnalysis, ServiceError> {
        self.record(MockCall::Analysis(track_id.to_string()));

        match self.tempos.get(track_id.as_str()) {
            Some(tempo) => Ok(AudioAnalysis {
                track: AnalysisTrack {
                    tempo: *tempo,
                    ..Default::default()
                },
            }),
            None => Err(ServiceError::NotFound(format!("audio analysis {}", track_id))),
        }
    }

    async fn create_playlist(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<CreatedPlaylist, ServiceError> {
        self.record(MockCall::CreatePlaylist {
            owner: owner.to_string(),
            name: name.to_string(),
        });

        if self.fail_create {
            return Err(ServiceError::Unauthorized("token expired".to_string()));
        }
        Ok(CreatedPlaylist {
            id: CREATED_PLAYLIST_ID.to_string(),
            name: name.to_string(),
        })
    }

    async fn append_track(
        &self,
        _owner: &str,
        playlist_id: &str,
        track_id: &TrackId,
    ) -> Result<(), ServiceError> {
        self.record(MockCall::Append {
            playlist_id: playlist_id.to_string(),
            track_id: track_id.to_string(),
        });

        let mut appended = self.appended.lock().unwrap();
        if self.fail_append_at == Some(appended.len()) {
            return Err(server_error());
        }
        appended.push(track_id.to_string());
        Ok(())
    }
}
