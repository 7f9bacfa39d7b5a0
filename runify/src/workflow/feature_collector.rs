//! Feature Collector
//!
//! For every playlist entry, fetches the track's metadata and tempo analysis
//! and combines them into a [`TrackRecord`].
//!
//! # Ordering
//! Records are keyed by track id in an order-preserving map. Insertion order
//! is the entry's first position in the source playlist, whatever the fetch
//! concurrency, so later stages see a deterministic order.
//!
//! # Missing analysis
//! A remote "not found" on either lookup, or an analysis without a tempo, is
//! handled per [`MissingAnalysisPolicy`]. Any other failure aborts the run.

use futures::stream::{self, StreamExt};
use indexmap::IndexSet;
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{Result, RunifyError};
use crate::models::{TrackCollection, TrackId, TrackRecord};
use crate::services::{PlaylistItem, ServiceError, StreamingService};

/// What to do with a track the service cannot analyze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingAnalysisPolicy {
    /// Drop the track with a warning and continue
    #[default]
    Skip,
    /// Fail the whole run
    Abort,
}

impl MissingAnalysisPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingAnalysisPolicy::Skip => "skip",
            MissingAnalysisPolicy::Abort => "abort",
        }
    }
}

impl FromStr for MissingAnalysisPolicy {
    type Err = RunifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(MissingAnalysisPolicy::Skip),
            "abort" => Ok(MissingAnalysisPolicy::Abort),
            other => Err(RunifyError::Config(format!(
                "unknown missing-analysis policy '{}' (expected 'skip' or 'abort')",
                other
            ))),
        }
    }
}

/// Collector tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorOptions {
    /// Maximum in-flight track lookups (1 = strictly sequential)
    pub concurrency: usize,
    pub on_missing_analysis: MissingAnalysisPolicy,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            on_missing_analysis: MissingAnalysisPolicy::Skip,
        }
    }
}

/// Collection statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    /// Entries received from the fetcher
    pub entries_seen: usize,
    /// Entries repeating an id already seen earlier in the playlist
    pub duplicate_entries: usize,
    /// Entries with no catalog track (removed items, local files)
    pub unplayable_entries: usize,
    /// Tracks dropped for lack of tempo analysis
    pub missing_analysis: usize,
}

/// Collector output
#[derive(Debug, Clone)]
pub struct CollectionResult {
    pub tracks: TrackCollection,
    pub stats: CollectionStats,
}

/// Fetches metadata and tempo analysis per track
pub struct FeatureCollector<'a, S: StreamingService + ?Sized> {
    service: &'a S,
    options: CollectorOptions,
}

impl<'a, S: StreamingService + ?Sized> FeatureCollector<'a, S> {
    pub fn new(service: &'a S, options: CollectorOptions) -> Self {
        Self { service, options }
    }

    /// Collect a record for every distinct track in `entries`
    pub async fn collect(&self, entries: &[PlaylistItem]) -> Result<CollectionResult> {
        let mut stats = CollectionStats {
            entries_seen: entries.len(),
            ..Default::default()
        };

        let mut track_ids: IndexSet<TrackId> = IndexSet::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            let id = entry
                .track
                .as_ref()
                .and_then(|t| t.id.as_deref())
                .filter(|id| !id.is_empty());

            match id {
                Some(id) => {
                    if !track_ids.insert(TrackId::new(id)) {
                        stats.duplicate_entries += 1;
                    }
                }
                None => {
                    warn!(
                        position,
                        title = entry.track.as_ref().map(|t| t.name.as_str()).unwrap_or(""),
                        "Skipping playlist entry without a catalog track"
                    );
                    stats.unplayable_entries += 1;
                }
            }
        }

        let concurrency = self.options.concurrency.max(1);
        debug!(
            tracks = track_ids.len(),
            concurrency,
            "Fetching track metadata and tempo analysis"
        );

        // `buffered` yields results in input order
        let mut lookups = stream::iter(track_ids.iter())
            .map(|id| self.fetch_record(id))
            .buffered(concurrency);

        let mut tracks = TrackCollection::with_capacity(track_ids.len());
        while let Some(outcome) = lookups.next().await {
            match outcome? {
                Some(record) => {
                    tracks.insert(record.id.clone(), record);
                }
                None => stats.missing_analysis += 1,
            }
        }

        info!(
            collected = tracks.len(),
            duplicates = stats.duplicate_entries,
            unplayable = stats.unplayable_entries,
            missing_analysis = stats.missing_analysis,
            "Collected track features"
        );

        Ok(CollectionResult { tracks, stats })
    }

    /// Fetch one record; `Ok(None)` means skipped under the missing-analysis policy
    async fn fetch_record(&self, id: &TrackId) -> Result<Option<TrackRecord>> {
        let track = match self.service.track(id).await {
            Ok(track) => track,
            Err(ServiceError::NotFound(_)) => return self.missing(id, "track not found"),
            Err(e) => return Err(RunifyError::fetch(format!("metadata of track {}", id), e)),
        };

        let analysis = match self.service.audio_analysis(id).await {
            Ok(analysis) => analysis,
            Err(ServiceError::NotFound(_)) => return self.missing(id, "analysis not found"),
            Err(e) => return Err(RunifyError::fetch(format!("analysis of track {}", id), e)),
        };

        let Some(tempo) = analysis.track.tempo else {
            return self.missing(id, "analysis has no tempo");
        };

        debug!(track_id = %id, title = %track.name, tempo, "Collected track");

        Ok(Some(TrackRecord {
            id: id.clone(),
            title: track.name,
            tempo,
        }))
    }

    fn missing(&self, id: &TrackId, reason: &str) -> Result<Option<TrackRecord>> {
        match self.options.on_missing_analysis {
            MissingAnalysisPolicy::Skip => {
                warn!(track_id = %id, reason, "Skipping track without tempo analysis");
                Ok(None)
            }
            MissingAnalysisPolicy::Abort => Err(RunifyError::MissingAnalysis {
                track_id: id.to_string(),
            }),
        }
    }
}
