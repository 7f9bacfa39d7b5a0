//! Wire models for the streaming service Web API
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! responses is ignored.

use serde::{Deserialize, Serialize};

/// One page of playlist entries
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlaylistTrackPage {
    /// Entries on this page, in playlist order
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    /// Continuation cursor (absolute URL of the next page), absent on the last page
    pub next: Option<String>,
    /// Total entry count across all pages, when reported
    pub total: Option<u32>,
}

/// Playlist entry wrapping a track
///
/// `track` is null for entries whose item was removed from the catalog.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlaylistItem {
    pub track: Option<TrackObject>,
}

/// Track metadata
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackObject {
    /// Catalog id; absent for local files
    pub id: Option<String>,
    /// Display title
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub is_local: bool,
}

/// Simplified artist reference
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistRef {
    pub name: String,
}

/// Tempo analysis response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AudioAnalysis {
    /// Whole-track summary section
    pub track: AnalysisTrack,
}

/// Whole-track analysis summary
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisTrack {
    /// Estimated tempo in beats per minute
    pub tempo: Option<f64>,
    /// Tempo estimate confidence (0.0-1.0)
    pub tempo_confidence: Option<f64>,
    /// Track length in seconds
    pub duration: Option<f64>,
}

/// Playlist returned by the create endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatedPlaylist {
    pub id: String,
    pub name: String,
}

/// Body of the create-playlist request
#[derive(Debug, Serialize)]
pub(crate) struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub public: bool,
}

/// Body of the append-tracks request
#[derive(Debug, Serialize)]
pub(crate) struct AppendTracksRequest {
    pub uris: Vec<String>,
}

/// Response of the append-tracks request
#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotResponse {
    pub snapshot_id: String,
}
