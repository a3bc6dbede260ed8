//! Ranking metrics and their direction

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::vector::{cosine_similarity, euclidean_distance, manhattan_distance};

/// Metric used to rank stored vectors against a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Cosine similarity, higher is better
    Cosine,
    /// Euclidean (L2) distance, lower is better
    Euclidean,
    /// Manhattan (L1) distance, lower is better
    Manhattan,
}

impl Metric {
    /// Raw metric value between two vectors.
    pub fn score(&self, left: &[f32], right: &[f32]) -> f64 {
        match self {
            Metric::Cosine => cosine_similarity(left, right),
            Metric::Euclidean => euclidean_distance(left, right),
            Metric::Manhattan => manhattan_distance(left, right),
        }
    }

    /// Whether a larger score means a closer match.
    pub fn higher_is_better(&self) -> bool {
        matches!(self, Metric::Cosine)
    }

    /// Score mapped so that ascending order is best-first for every metric.
    pub fn sort_key(&self, score: f64) -> f64 {
        if self.higher_is_better() { -score } else { score }
    }

    /// Whether `candidate` strictly beats `incumbent`. Ties never win.
    pub fn is_better(&self, candidate: f64, incumbent: f64) -> bool {
        if self.higher_is_better() {
            candidate > incumbent
        } else {
            candidate < incumbent
        }
    }

    /// Starting value for a best-so-far scan: worse than any attainable score.
    pub fn worst_score(&self) -> f64 {
        if self.higher_is_better() { -2.0 } else { f64::INFINITY }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
            Metric::Euclidean => "euclidean",
            Metric::Manhattan => "manhattan",
        }
    }
}

impl FromStr for Metric {
    type Err = StoreError;

    /// Metric names are matched exactly: "cosine", "euclidean", "manhattan".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cosine" => Ok(Metric::Cosine),
            "euclidean" => Ok(Metric::Euclidean),
            "manhattan" => Ok(Metric::Manhattan),
            other => Err(StoreError::InvalidMetric(other.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
