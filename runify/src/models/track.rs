//! Track-level domain types

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RunifyError};

/// Default lower bound of the running cadence band (BPM)
pub const DEFAULT_LOWER_BPM: f64 = 150.0;
/// Default upper bound of the running cadence band (BPM)
pub const DEFAULT_UPPER_BPM: f64 = 180.0;

/// Remote catalog track identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Catalog URI form used by playlist write endpoints
    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Title and measured tempo of one source track
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecord {
    pub id: TrackId,
    pub title: String,
    /// Measured tempo in beats per minute
    pub tempo: f64,
}

/// Track collected from the source playlist, keyed by id in source order
pub type TrackCollection = IndexMap<TrackId, TrackRecord>;

/// Track that survived the cadence filter
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEntry {
    pub id: TrackId,
    /// Tempo used for sorting and display (raw or doubled)
    pub effective_tempo: f64,
    pub title: String,
}

/// Open BPM interval considered running tempo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CadenceBand {
    lower_bound: f64,
    upper_bound: f64,
}

impl CadenceBand {
    /// Create a band, requiring finite bounds with `0 < lower < upper`
    pub fn new(lower_bound: f64, upper_bound: f64) -> Result<Self> {
        if !lower_bound.is_finite() || !upper_bound.is_finite() {
            return Err(RunifyError::Config(format!(
                "cadence bounds must be finite (got {lower_bound}, {upper_bound})"
            )));
        }
        if lower_bound <= 0.0 || lower_bound >= upper_bound {
            return Err(RunifyError::Config(format!(
                "cadence bounds must satisfy 0 < lower < upper (got {lower_bound}, {upper_bound})"
            )));
        }
        Ok(Self {
            lower_bound,
            upper_bound,
        })
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }
}

impl Default for CadenceBand {
    fn default() -> Self {
        Self {
            lower_bound: DEFAULT_LOWER_BPM,
            upper_bound: DEFAULT_UPPER_BPM,
        }
    }
}
