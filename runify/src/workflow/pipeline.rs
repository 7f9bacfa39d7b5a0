//! Pipeline Orchestrator
//!
//! Runs the playlist stages strictly in sequence, each stage's output being
//! the next stage's only input.
//!
//! # Architecture
//! - **Fetch**: resolve the reference and page through the source playlist
//! - **Collect**: metadata + tempo analysis per track
//! - **Filter**: keep running-tempo tracks, normalizing double-time ones
//! - **Sort**: stable ascending sort by effective tempo
//! - **Publish**: create the target playlist and append in order
//!
//! # Example
//! ```rust,ignore
//! let pipeline = RunifyPipeline::new(&client, PipelineConfig::new("runner42"));
//! let summary = pipeline.run("https://open.example/playlist/ABCDEFGHIJ", "Tempo Run").await?;
//! ```

use tracing::info;

use super::cadence_filter::CadenceFilter;
use super::feature_collector::{CollectorOptions, FeatureCollector};
use super::playlist_fetcher::PlaylistFetcher;
use super::playlist_publisher::PlaylistPublisher;
use super::playlist_sorter::sort_by_tempo;
use crate::error::Result;
use crate::models::{CadenceBand, CandidateEntry};
use crate::services::StreamingService;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Account that owns the generated playlist
    pub owner: String,
    /// Running cadence band
    pub band: CadenceBand,
    /// Feature collection tuning
    pub collector: CollectorOptions,
}

impl PipelineConfig {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            band: CadenceBand::default(),
            collector: CollectorOptions::default(),
        }
    }
}

/// Per-run statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Source playlist id after resolution
    pub source_playlist_id: String,
    /// Entries returned across all pages
    pub entries_fetched: usize,
    /// Tracks with metadata and tempo
    pub tracks_collected: usize,
    /// Entries dropped before filtering (no track, no analysis)
    pub tracks_skipped: usize,
    /// Tracks inside the cadence band
    pub candidates: usize,
    /// Generated playlist id
    pub playlist_id: String,
    pub tracks_appended: usize,
}

/// Source playlist → running playlist
pub struct RunifyPipeline<'a, S: StreamingService + ?Sized> {
    service: &'a S,
    config: PipelineConfig,
}

impl<'a, S: StreamingService + ?Sized> RunifyPipeline<'a, S> {
    pub fn new(service: &'a S, config: PipelineConfig) -> Self {
        Self { service, config }
    }

    /// Build playlist `playlist_name` from the playlist at `source_reference`
    pub async fn run(&self, source_reference: &str, playlist_name: &str) -> Result<PipelineSummary> {
        info!(source = %source_reference, name = %playlist_name, "Starting cadence playlist run");

        let (source_id, entries) = PlaylistFetcher::new(self.service)
            .fetch_reference(source_reference)
            .await?;

        let collection = FeatureCollector::new(self.service, self.config.collector)
            .collect(&entries)
            .await?;

        let candidates = CadenceFilter::new(self.config.band).filter(&collection.tracks);
        let ordered = sort_by_tempo(candidates);
        log_candidates(&ordered);

        let published = PlaylistPublisher::new(self.service, &self.config.owner)
            .publish(playlist_name, &ordered)
            .await?;

        let stats = &collection.stats;
        Ok(PipelineSummary {
            source_playlist_id: source_id.to_string(),
            entries_fetched: entries.len(),
            tracks_collected: collection.tracks.len(),
            tracks_skipped: stats.unplayable_entries + stats.missing_analysis,
            candidates: ordered.len(),
            playlist_id: published.playlist_id,
            tracks_appended: published.tracks_appended,
        })
    }
}

/// Log the ordered candidate table before it is written out
fn log_candidates(ordered: &[CandidateEntry]) {
    for (position, entry) in ordered.iter().enumerate() {
        info!(
            position,
            tempo = %format!("{:.1}", entry.effective_tempo),
            title = %entry.title,
            track_id = %entry.id,
            "Running track"
        );
    }
}
