//! Entity profile value types handed to the recommendation pipeline.
//!
//! These are plain immutable snapshots: the engine never sees a live
//! persistence-layer row, only these structs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Primary marketing goal of an entity.
///
/// Unrecognized goal strings are preserved as [`Goal::Other`] rather than
/// rejected; the scorer falls back to an even weighting for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Goal {
    Awareness,
    Leads,
    Sales,
    Conversions,
    Other(String),
}

impl From<String> for Goal {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "awareness" => Goal::Awareness,
            "leads" => Goal::Leads,
            "sales" => Goal::Sales,
            "conversions" => Goal::Conversions,
            _ => Goal::Other(raw),
        }
    }
}

impl From<Goal> for String {
    fn from(goal: Goal) -> Self {
        match goal {
            Goal::Awareness => "awareness".to_string(),
            Goal::Leads => "leads".to_string(),
            Goal::Sales => "sales".to_string(),
            Goal::Conversions => "conversions".to_string(),
            Goal::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Goal::Awareness => write!(f, "awareness"),
            Goal::Leads => write!(f, "leads"),
            Goal::Sales => write!(f, "sales"),
            Goal::Conversions => write!(f, "conversions"),
            Goal::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// Immutable snapshot of an entity's business profile for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityProfile {
    pub public_id: Uuid,
    pub name: String,
    /// Free-form industry label; matched lowercase against benchmarks and
    /// channel modifiers.
    pub industry: String,
    pub goal: Goal,
    pub budget_range_min: Option<f64>,
    pub budget_range_max: Option<f64>,
    pub website: Option<String>,
    #[serde(default)]
    pub content_strengths: Vec<String>,
    /// Explicitly configured social handles, keyed by platform id. These take
    /// precedence over handles discovered by the website scan.
    #[serde(default)]
    pub social_profiles: HashMap<String, String>,
    pub target_audience: Option<String>,
}

impl EntityProfile {
    /// Budget range with the documented default: a missing max is
    /// `min * 1.4`, and a fully absent range is zero on both ends.
    #[must_use]
    pub fn budget_range(&self) -> (f64, f64) {
        let min = self.budget_range_min.unwrap_or(0.0);
        let max = self.budget_range_max.unwrap_or(min * 1.4);
        (min, max)
    }
}

/// Traffic/audience stats supplied by the upstream analytics collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub monthly_visits: Option<u64>,
    /// Fraction of site audience matching the entity's declared target
    /// audience, in `[0, 1]`.
    pub audience_match: Option<f64>,
}
