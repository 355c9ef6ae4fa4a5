//! Proportional budget allocation over ranked channel scores.

use serde::{Deserialize, Serialize};

use crate::score::ChannelScore;

/// Per-channel budget bounds, each rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetSplit {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// One channel's share of the entity budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    pub channel_slug: String,
    pub name: String,
    /// Normalized weight in `[0, 1]`; all weights sum to 1.
    pub weight: f64,
    pub budget: BudgetSplit,
}

/// Split the budget range across channels proportionally to their scores.
///
/// Negative scores contribute nothing; when every score is non-positive the
/// split is even. Allocation order follows the input (score) order.
#[must_use]
pub fn allocate_budget(
    scores: &[ChannelScore],
    min_budget: f64,
    max_budget: f64,
) -> Vec<BudgetAllocation> {
    if scores.is_empty() {
        return Vec::new();
    }

    #[allow(clippy::cast_precision_loss)]
    let even_weight = 1.0 / scores.len() as f64;
    let total: f64 = scores.iter().map(|s| positive(s.score)).sum();
    let midpoint = (min_budget + max_budget) / 2.0;

    scores
        .iter()
        .map(|score| {
            let weight = if total > 0.0 {
                positive(score.score) / total
            } else {
                even_weight
            };
            BudgetAllocation {
                channel_slug: score.channel_slug.clone(),
                name: score.name.clone(),
                weight,
                budget: BudgetSplit {
                    min: round2(min_budget * weight),
                    max: round2(max_budget * weight),
                    avg: round2(midpoint * weight),
                },
            }
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn positive(score: i64) -> f64 {
    score.max(0) as f64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
