//! Value types shared between signal acquisition and the scoring engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use adwise_db::BenchmarkRow;

/// Industry-level performance baseline.
///
/// Always constructed through [`IndustryBenchmark::new`], which clamps the
/// reach/awareness indices into `(0, 1]` so funnel projections stay
/// monotonically decreasing. Non-positive indices from a broken feed are
/// treated as neutral (`1.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryBenchmark {
    pub industry: String,
    pub source: String,
    pub avg_cpm: f64,
    pub avg_ctr: f64,
    pub avg_conv_rate: f64,
    pub reach_index: f64,
    pub awareness_index: f64,
}

impl IndustryBenchmark {
    #[must_use]
    #[allow(clippy::too_many_arguments)] // flat metric constructor
    pub fn new(
        industry: &str,
        source: &str,
        avg_cpm: f64,
        avg_ctr: f64,
        avg_conv_rate: f64,
        reach_index: f64,
        awareness_index: f64,
    ) -> Self {
        Self {
            industry: industry.trim().to_lowercase(),
            source: source.to_string(),
            avg_cpm,
            avg_ctr,
            avg_conv_rate,
            reach_index: clamp_index(reach_index),
            awareness_index: clamp_index(awareness_index),
        }
    }

    #[must_use]
    pub fn from_row(row: &BenchmarkRow) -> Self {
        Self::new(
            &row.industry,
            &row.source,
            row.avg_cpm,
            row.avg_ctr,
            row.avg_conv_rate,
            row.reach_index,
            row.awareness_index,
        )
    }
}

fn clamp_index(value: f64) -> f64 {
    if value > 0.0 {
        value.min(1.0)
    } else {
        1.0
    }
}

/// One resolved social presence: a handle plus an audience estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialSignal {
    pub platform: String,
    pub handle: String,
    pub followers: u64,
    /// Estimated audience overlap in `[0, 1]`, derived from the follower
    /// estimate relative to the platform's saturation point.
    pub overlap: f64,
}

/// Deterministic ad estimate for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSignal {
    pub platform: String,
    pub estimated_cpm: f64,
    pub estimated_cpc: f64,
    /// Audience/content fit for this entity, in `[0, 1]`.
    pub affinity: f64,
    /// Multiplier (`>= 1.0` means favourable) on baseline conversion.
    pub conversion_lift: f64,
    /// Impressions attainable at the budget midpoint.
    pub reach_potential: f64,
}

/// Aggregated external signals for one run. Computed fresh each run and
/// never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalBundle {
    pub benchmark: Option<IndustryBenchmark>,
    /// Keyed by platform id.
    pub social_signals: HashMap<String, SocialSignal>,
    /// Keyed by platform id.
    pub platform_signals: HashMap<String, PlatformSignal>,
}
