//! Playlist reference resolution
//!
//! A playlist reference is either a sharable link or a raw identifier. A link
//! always carries the identifier as its trailing `LINK_ID_LEN` characters.

use std::fmt;

use crate::error::{Result, RunifyError};

/// Prefix that marks a reference as a web link
pub const LINK_SCHEME_PREFIX: &str = "https";

/// Length of the identifier segment at the end of a link
pub const LINK_ID_LEN: usize = 10;

/// Canonical remote playlist identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unresolved playlist reference as supplied by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistRef<'a> {
    /// Sharable link ending in the identifier
    Link(&'a str),
    /// Identifier given directly
    Raw(&'a str),
}

impl<'a> PlaylistRef<'a> {
    /// Classify a reference by its prefix (surrounding whitespace ignored)
    pub fn parse(reference: &'a str) -> Self {
        let trimmed = reference.trim();
        if trimmed.starts_with(LINK_SCHEME_PREFIX) {
            PlaylistRef::Link(trimmed)
        } else {
            PlaylistRef::Raw(trimmed)
        }
    }

    /// Resolve to a canonical identifier
    pub fn resolve(&self) -> Result<PlaylistId> {
        let candidate = match *self {
            PlaylistRef::Link(link) => {
                if link.chars().count() < LINK_SCHEME_PREFIX.len() + LINK_ID_LEN {
                    return Err(resolution_error(
                        link,
                        format!("link is too short to carry a {LINK_ID_LEN}-character identifier"),
                    ));
                }
                // Length checked above
                let start = link
                    .char_indices()
                    .rev()
                    .nth(LINK_ID_LEN - 1)
                    .map(|(idx, _)| idx)
                    .unwrap_or(0);
                &link[start..]
            }
            PlaylistRef::Raw(raw) => raw,
        };

        if candidate.is_empty() {
            return Err(resolution_error(self.as_str(), "identifier is empty"));
        }

        if !candidate.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(resolution_error(
                self.as_str(),
                format!("identifier '{candidate}' contains non-alphanumeric characters"),
            ));
        }

        Ok(PlaylistId(candidate.to_string()))
    }

    fn as_str(&self) -> &'a str {
        match *self {
            PlaylistRef::Link(s) | PlaylistRef::Raw(s) => s,
        }
    }
}

/// Resolve a link or raw identifier to a canonical playlist identifier
pub fn resolve_playlist_ref(reference: &str) -> Result<PlaylistId> {
    PlaylistRef::parse(reference).resolve()
}

fn resolution_error(reference: &str, reason: impl Into<String>) -> RunifyError {
    RunifyError::Resolution {
        reference: reference.to_string(),
        reason: reason.into(),
    }
}
