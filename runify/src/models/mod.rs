//! Domain types for the playlist pipeline

pub mod playlist_ref;
pub mod track;

pub use playlist_ref::{resolve_playlist_ref, PlaylistId, PlaylistRef, LINK_ID_LEN, LINK_SCHEME_PREFIX};
pub use track::{CadenceBand, CandidateEntry, TrackCollection, TrackId, TrackRecord};
