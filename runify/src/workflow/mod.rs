//! Playlist pipeline stages
//!
//! Fetcher → Collector → Filter → Sorter → Publisher, orchestrated by
//! [`pipeline::RunifyPipeline`].

pub mod cadence_filter;
pub mod feature_collector;
pub mod pipeline;
pub mod playlist_fetcher;
pub mod playlist_publisher;
pub mod playlist_sorter;

pub use cadence_filter::{classify_tempo, CadenceFilter, CadenceMatch};
pub use feature_collector::{
    CollectionResult, CollectionStats, CollectorOptions, FeatureCollector, MissingAnalysisPolicy,
};
pub use pipeline::{PipelineConfig, PipelineSummary, RunifyPipeline};
pub use playlist_fetcher::PlaylistFetcher;
pub use playlist_publisher::{PlaylistPublisher, PublishResult};
pub use playlist_sorter::sort_by_tempo;
