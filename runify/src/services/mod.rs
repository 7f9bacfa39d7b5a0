//! Remote service integration
//!
//! - `streaming_service`: capability trait the pipeline depends on
//! - `spotify_client`: HTTP implementation of that trait
//! - `spotify_auth`: OAuth session acquisition
//! - `api_models`: wire models shared by the trait and the client

pub mod api_models;
pub mod spotify_auth;
pub mod spotify_client;
pub mod streaming_service;

pub use api_models::{
    AnalysisTrack, ArtistRef, AudioAnalysis, CreatedPlaylist, PlaylistItem, PlaylistTrackPage,
    TrackObject,
};
pub use spotify_auth::{obtain_tokens, OAuthCredentials, OAuthTokens, SpotifyAuth};
pub use spotify_client::{ClientOptions, SpotifyClient};
pub use streaming_service::{ServiceError, StreamingService};
