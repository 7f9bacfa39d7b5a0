//! Playlist Sorter
//!
//! Orders candidates by ascending effective tempo. The sort is stable and has
//! no secondary key, so equal tempos keep their filter order.

use crate::models::CandidateEntry;

/// Sort candidates by ascending effective tempo
pub fn sort_by_tempo(mut candidates: Vec<CandidateEntry>) -> Vec<CandidateEntry> {
    candidates.sort_by(|a, b| a.effective_tempo.total_cmp(&b.effective_tempo));
    candidates
}
