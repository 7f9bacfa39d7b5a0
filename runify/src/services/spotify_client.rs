//! Spotify Web API client
//!
//! Bearer-token HTTP client implementing [`StreamingService`]. Requests are
//! paced client-side with a token bucket; nothing is retried.
//!
//! API Documentation: https://developer.spotify.com/documentation/web-api

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::header::RETRY_AFTER;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::time::Duration;

use super::api_models::{
    AppendTracksRequest, AudioAnalysis, CreatePlaylistRequest, CreatedPlaylist, PlaylistTrackPage,
    SnapshotResponse, TrackObject,
};
use super::streaming_service::{ServiceError, StreamingService};
use crate::models::{PlaylistId, TrackId};

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 5;
const PLAYLIST_PAGE_LIMIT: u32 = 100;

/// HTTP client tuning
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// API root, without trailing slash
    pub base_url: String,
    /// Token bucket refill rate
    pub requests_per_second: u32,
    /// Total per-request timeout
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
    rate_limiter: RateLimiter<
        governor::state::direct::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl SpotifyClient {
    /// Create a client authenticated with `access_token`
    pub fn new(access_token: impl Into<String>, options: ClientOptions) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(runify_common::config::get_user_agent())
            .timeout(options.timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ServiceError::NetworkError(e.to_string()))?;

        let per_second = NonZeroU32::new(options.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Accept a continuation cursor only if it points back at our API root
    ///
    /// The bearer token is attached to every request, so a cursor naming any
    /// other host is refused.
    fn cursor_url(&self, cursor: &str) -> Result<String, ServiceError> {
        match cursor.strip_prefix(self.base_url.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') => {
                Ok(cursor.to_string())
            }
            _ => Err(ServiceError::InvalidCursor(cursor.to_string())),
        }
    }

    /// Pace, authenticate and send a request, mapping error statuses
    async fn send(&self, request: RequestBuilder, resource: &str) -> Result<Response, ServiceError> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(resource = %resource, "Querying Spotify API");

        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| ServiceError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();

        Err(error_for_status(status, resource, retry_after, body))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, resource: &str) -> Result<T, ServiceError> {
        let response = self.send(self.http_client.get(url), resource).await?;
        response
            .json()
            .await
            .map_err(|e| ServiceError::ParseError(format!("{}: {}", resource, e)))
    }
}

/// Map a non-success status to a service error
pub(crate) fn error_for_status(
    status: StatusCode,
    resource: &str,
    retry_after: Option<u64>,
    body: String,
) -> ServiceError {
    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(resource.to_string()),
        StatusCode::UNAUTHORIZED => ServiceError::Unauthorized(body),
        StatusCode::TOO_MANY_REQUESTS => ServiceError::RateLimitExceeded { retry_after },
        _ => ServiceError::ApiError(status.as_u16(), body),
    }
}

#[async_trait]
impl StreamingService for SpotifyClient {
    async fn playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        cursor: Option<&str>,
    ) -> Result<PlaylistTrackPage, ServiceError> {
        let url = match cursor {
            Some(cursor) => self.cursor_url(cursor)?,
            None => format!(
                "{}?limit={}",
                self.endpoint(&format!("playlists/{}/tracks", playlist_id)),
                PLAYLIST_PAGE_LIMIT
            ),
        };
        let resource = format!("playlist {}", playlist_id);
        self.get_json(&url, &resource).await
    }

    async fn track(&self, track_id: &TrackId) -> Result<TrackObject, ServiceError> {
        let url = self.endpoint(&format!("tracks/{}", track_id));
        self.get_json(&url, &format!("track {}", track_id)).await
    }

    async fn audio_analysis(&self, track_id: &TrackId) -> Result<AudioAnalysis, ServiceError> {
        let url = self.endpoint(&format!("audio-analysis/{}", track_id));
        self.get_json(&url, &format!("audio analysis {}", track_id)).await
    }

    async fn create_playlist(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<CreatedPlaylist, ServiceError> {
        let url = self.endpoint(&format!("users/{}/playlists", urlencoding::encode(owner)));
        let body = CreatePlaylistRequest { name, public: true };
        let resource = format!("playlists of user {}", owner);

        let response = self
            .send(self.http_client.post(&url).json(&body), &resource)
            .await?;
        let playlist: CreatedPlaylist = response
            .json()
            .await
            .map_err(|e| ServiceError::ParseError(format!("{}: {}", resource, e)))?;

        tracing::info!(playlist_id = %playlist.id, name = %playlist.name, "Created playlist");
        Ok(playlist)
    }

    async fn append_track(
        &self,
        _owner: &str,
        playlist_id: &str,
        track_id: &TrackId,
    ) -> Result<(), ServiceError> {
        // Playlist ownership is implied by the token; the owner is not part of the path
        let url = self.endpoint(&format!("playlists/{}/tracks", playlist_id));
        let body = AppendTracksRequest {
            uris: vec![track_id.uri()],
        };
        let resource = format!("playlist {}", playlist_id);

        let response = self
            .send(self.http_client.post(&url).json(&body), &resource)
            .await?;
        let snapshot: SnapshotResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::ParseError(format!("{}: {}", resource, e)))?;

        tracing::debug!(
            playlist_id = %playlist_id,
            track_id = %track_id,
            snapshot = %snapshot.snapshot_id,
            "Appended track"
        );
        Ok(())
    }
}
