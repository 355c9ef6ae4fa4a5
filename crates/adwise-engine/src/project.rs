//! Funnel outcome projection over the allocated budget.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use adwise_core::ChannelDefinition;
use adwise_signals::IndustryBenchmark;

use crate::allocate::BudgetAllocation;

/// Leads-to-sales conversion used when no sales metric is available.
pub const DEFAULT_SALES_CONVERSION: f64 = 0.25;

/// Projected funnel figures for one channel (or the aggregate).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FunnelEstimate {
    pub reach: i64,
    pub awareness: i64,
    pub leads: i64,
    pub sales: i64,
    /// Leads per unit of average budget; 0 when no budget is allocated.
    pub efficiency: f64,
}

/// Per-channel funnel estimates plus the element-wise aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProjection {
    /// Keyed by channel slug, in allocation order.
    pub channels: Vec<(String, FunnelEstimate)>,
    pub totals: FunnelEstimate,
}

/// Run the funnel math for every allocated channel.
///
/// Channel baselines supply the metrics; a present benchmark metric of the
/// same name overrides the channel's own. A non-positive CPM yields a zero
/// projection rather than a division error.
#[must_use]
pub fn project_outcomes(
    allocations: &[BudgetAllocation],
    catalog: &HashMap<String, ChannelDefinition>,
    benchmark: Option<&IndustryBenchmark>,
) -> OutcomeProjection {
    let awareness_multiplier = benchmark.map_or(1.0, |b| b.awareness_index);

    let mut channels = Vec::with_capacity(allocations.len());
    let mut totals = FunnelEstimate::default();
    let mut total_budget = 0.0;

    for allocation in allocations {
        let Some(channel) = catalog.get(&allocation.channel_slug) else {
            tracing::warn!(
                channel = %allocation.channel_slug,
                "allocation references unknown channel, skipping projection"
            );
            continue;
        };

        let avg_cpm = benchmark.map_or(channel.avg_cpm, |b| b.avg_cpm);
        let avg_ctr = benchmark.map_or(channel.avg_ctr, |b| b.avg_ctr);
        let avg_conv_rate = benchmark.map_or(channel.avg_conv_rate, |b| b.avg_conv_rate);

        let estimate = project_channel(
            allocation.budget.avg,
            avg_cpm,
            avg_ctr,
            avg_conv_rate,
            awareness_multiplier,
        );

        totals.reach += estimate.reach;
        totals.awareness += estimate.awareness;
        totals.leads += estimate.leads;
        totals.sales += estimate.sales;
        total_budget += allocation.budget.avg;

        channels.push((allocation.channel_slug.clone(), estimate));
    }

    totals.efficiency = efficiency(totals.leads, total_budget);

    OutcomeProjection { channels, totals }
}

fn project_channel(
    budget_avg: f64,
    avg_cpm: f64,
    avg_ctr: f64,
    avg_conv_rate: f64,
    awareness_multiplier: f64,
) -> FunnelEstimate {
    if avg_cpm <= 0.0 {
        return FunnelEstimate::default();
    }

    let reach = budget_avg / avg_cpm * 1000.0;
    let awareness = reach * avg_ctr * awareness_multiplier;
    let leads = awareness * avg_conv_rate;
    let sales = leads * DEFAULT_SALES_CONVERSION;

    let leads_rounded = round(leads);
    FunnelEstimate {
        reach: round(reach),
        awareness: round(awareness),
        leads: leads_rounded,
        sales: round(sales),
        efficiency: efficiency(leads_rounded, budget_avg),
    }
}

#[allow(clippy::cast_precision_loss)]
fn efficiency(leads: i64, budget: f64) -> f64 {
    if budget > 0.0 {
        leads as f64 / budget
    } else {
        0.0
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round(value: f64) -> i64 {
    value.round() as i64
}
