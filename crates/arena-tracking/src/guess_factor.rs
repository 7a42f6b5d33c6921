//! Segmented guess-factor statistics.
//!
//! For every segment (how fast the target moved across our line of fire, and
//! how far away it was) we keep a histogram over escape factors in [-1, 1].
//! The gun aims at the most visited bin.

use serde::{Deserialize, Serialize};

use arena_core::constants::{DISTANCE_BUCKETS, DISTANCE_BUCKET_SIZE, LATERAL_SPEED_EDGES};
use arena_core::geometry::clamp;
use arena_core::ArenaError;

/// Lateral-speed bucket × distance bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub lateral: usize,
    pub distance: usize,
}

impl Segment {
    pub fn classify(lateral_speed: f64, distance: f64) -> Self {
        let speed = lateral_speed.abs();
        let lateral = LATERAL_SPEED_EDGES.iter().filter(|edge| speed >= **edge).count();
        let distance = if distance.is_finite() && distance > 0.0 {
            ((distance / DISTANCE_BUCKET_SIZE) as usize).min(DISTANCE_BUCKETS - 1)
        } else {
            0
        };
        Self { lateral, distance }
    }
}

const LATERAL_BUCKETS: usize = LATERAL_SPEED_EDGES.len() + 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessFactorTable {
    bins: usize,
    stats: Vec<f64>,
}

impl GuessFactorTable {
    /// `bins` is raised to the next odd number, at least 3, so that a centre
    /// bin for guess factor 0 always exists.
    pub fn new(bins: usize) -> Self {
        let bins = bins.max(3) | 1;
        Self {
            bins,
            stats: vec![0.0; Self::cells(bins)],
        }
    }

    fn cells(bins: usize) -> usize {
        LATERAL_BUCKETS * DISTANCE_BUCKETS * bins
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn bin_for(&self, guess_factor: f64) -> usize {
        let gf = clamp(guess_factor, -1.0, 1.0);
        let bin = ((gf + 1.0) / 2.0 * (self.bins - 1) as f64).round() as usize;
        bin.min(self.bins - 1)
    }

    /// Centre of `bin` as a guess factor.
    pub fn guess_factor_for(&self, bin: usize) -> f64 {
        let bin = bin.min(self.bins - 1);
        bin as f64 / (self.bins - 1) as f64 * 2.0 - 1.0
    }

    fn offset(&self, segment: Segment) -> usize {
        let lateral = segment.lateral.min(LATERAL_BUCKETS - 1);
        let distance = segment.distance.min(DISTANCE_BUCKETS - 1);
        (lateral * DISTANCE_BUCKETS + distance) * self.bins
    }

    pub fn histogram(&self, segment: Segment) -> &[f64] {
        let start = self.offset(segment);
        &self.stats[start..start + self.bins]
    }

    /// Add a visit at `guess_factor`, spread to neighbours with 1/(d²+1).
    pub fn record(&mut self, segment: Segment, guess_factor: f64, weight: f64) {
        if !guess_factor.is_finite() || !weight.is_finite() {
            return;
        }
        let hit = self.bin_for(guess_factor) as f64;
        let start = self.offset(segment);
        for (bin, cell) in self.stats[start..start + self.bins].iter_mut().enumerate() {
            let d = bin as f64 - hit;
            *cell += weight / (d * d + 1.0);
        }
    }

    /// Guess factor of the fullest bin; 0 for a segment with no data.
    pub fn best_guess_factor(&self, segment: Segment) -> f64 {
        let mut best: Option<(usize, f64)> = None;
        for (bin, &value) in self.histogram(segment).iter().enumerate() {
            if value > best.map_or(0.0, |(_, v)| v) {
                best = Some((bin, value));
            }
        }
        best.map_or(0.0, |(bin, _)| self.guess_factor_for(bin))
    }

    pub fn to_json(&self) -> Result<String, ArenaError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load a table, rejecting one whose cell count does not fit its bins.
    pub fn from_json(json: &str) -> Result<Self, ArenaError> {
        let table: Self = serde_json::from_str(json)?;
        let found = table.stats.len();
        let expected = (LATERAL_BUCKETS * DISTANCE_BUCKETS).checked_mul(table.bins);
        match expected {
            Some(expected) if table.bins >= 3 && table.bins % 2 == 1 && found == expected => {
                Ok(table)
            }
            _ => Err(ArenaError::InvalidStats {
                expected: expected.unwrap_or(usize::MAX),
                found,
            }),
        }
    }
}
