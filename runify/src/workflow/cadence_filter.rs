//! Cadence Filter
//!
//! Keeps tracks whose tempo suits running at the configured cadence band:
//! - tempo strictly inside `(lower/2, upper/2)` counts double-time and its
//!   effective tempo is `tempo * 2`
//! - otherwise tempo strictly inside `(lower, upper)` counts as-is
//! - anything else, boundaries included, is dropped
//!
//! Either way the effective tempo ends up strictly inside `(lower, upper)`.

use tracing::{debug, info};

use crate::models::{CadenceBand, CandidateEntry, TrackCollection};

/// How a tempo matched the cadence band
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CadenceMatch {
    /// Half the band; effective tempo is double the measured one
    DoubleTime { effective_tempo: f64 },
    /// Inside the band as measured
    Direct { effective_tempo: f64 },
}

impl CadenceMatch {
    pub fn effective_tempo(&self) -> f64 {
        match *self {
            CadenceMatch::DoubleTime { effective_tempo } | CadenceMatch::Direct { effective_tempo } => {
                effective_tempo
            }
        }
    }
}

/// Classify a measured tempo against `band`; `None` means rejected
pub fn classify_tempo(tempo: f64, band: &CadenceBand) -> Option<CadenceMatch> {
    let lower = band.lower_bound();
    let upper = band.upper_bound();

    if tempo > lower / 2.0 && tempo < upper / 2.0 {
        Some(CadenceMatch::DoubleTime {
            effective_tempo: tempo * 2.0,
        })
    } else if tempo > lower && tempo < upper {
        Some(CadenceMatch::Direct {
            effective_tempo: tempo,
        })
    } else {
        None
    }
}

/// Turns collected tracks into running candidates
#[derive(Debug, Clone, Copy, Default)]
pub struct CadenceFilter {
    band: CadenceBand,
}

impl CadenceFilter {
    pub fn new(band: CadenceBand) -> Self {
        Self { band }
    }

    pub fn band(&self) -> &CadenceBand {
        &self.band
    }

    /// Candidates in the collection's iteration order
    pub fn filter(&self, tracks: &TrackCollection) -> Vec<CandidateEntry> {
        let candidates: Vec<CandidateEntry> = tracks
            .values()
            .filter_map(|record| {
                let Some(matched) = classify_tempo(record.tempo, &self.band) else {
                    debug!(track_id = %record.id, tempo = record.tempo, "Tempo outside cadence band");
                    return None;
                };
                Some(CandidateEntry {
                    id: record.id.clone(),
                    effective_tempo: matched.effective_tempo(),
                    title: record.title.clone(),
                })
            })
            .collect();

        info!(
            lower_bpm = self.band.lower_bound(),
            upper_bpm = self.band.upper_bound(),
            tracks = tracks.len(),
            candidates = candidates.len(),
            "Filtered tracks by cadence"
        );

        candidates
    }
}
