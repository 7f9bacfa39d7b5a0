//! Playlist Fetcher
//!
//! Resolves a playlist reference and follows the continuation cursor until the
//! service reports no further page. A partial listing is never returned: any
//! page failure fails the whole fetch.

use tracing::{debug, info};

use crate::error::{Result, RunifyError};
use crate::models::{resolve_playlist_ref, PlaylistId};
use crate::services::{PlaylistItem, StreamingService};

/// Pages through a playlist's entries
pub struct PlaylistFetcher<'a, S: StreamingService + ?Sized> {
    service: &'a S,
}

impl<'a, S: StreamingService + ?Sized> PlaylistFetcher<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Resolve `reference` (link or raw id) and fetch every entry
    pub async fn fetch_reference(&self, reference: &str) -> Result<(PlaylistId, Vec<PlaylistItem>)> {
        let playlist_id = resolve_playlist_ref(reference)?;
        let entries = self.fetch(&playlist_id).await?;
        Ok((playlist_id, entries))
    }

    /// Fetch every entry of `playlist_id`, in playlist order
    pub async fn fetch(&self, playlist_id: &PlaylistId) -> Result<Vec<PlaylistItem>> {
        let context = || format!("entries of playlist {}", playlist_id);

        let mut page = self
            .service
            .playlist_tracks(playlist_id, None)
            .await
            .map_err(|e| RunifyError::fetch(context(), e))?;

        let mut entries = std::mem::take(&mut page.items);
        let mut pages = 1usize;

        while let Some(cursor) = page.next.take() {
            page = self
                .service
                .playlist_tracks(playlist_id, Some(&cursor))
                .await
                .map_err(|e| RunifyError::fetch(context(), e))?;

            pages += 1;
            debug!(
                playlist_id = %playlist_id,
                page = pages,
                page_entries = page.items.len(),
                "Fetched playlist page"
            );
            entries.append(&mut page.items);
        }

        info!(
            playlist_id = %playlist_id,
            entries = entries.len(),
            pages,
            "Fetched source playlist"
        );

        Ok(entries)
    }
}
