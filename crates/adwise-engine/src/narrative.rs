//! Deterministic narrative summary of a recommendation run.
//!
//! Pure text templating: no clock, no randomness, no I/O. Identical inputs
//! always produce byte-identical output.

use adwise_core::EntityProfile;

use crate::allocate::BudgetAllocation;
use crate::project::OutcomeProjection;
use crate::score::ChannelScore;

/// Compose the one-paragraph summary for a run.
#[must_use]
pub fn compose_narrative(
    profile: &EntityProfile,
    scores: &[ChannelScore],
    allocations: &[BudgetAllocation],
    outcomes: &OutcomeProjection,
) -> String {
    let top_count = scores.len().min(3);
    let top_lines: Vec<String> = scores
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, score)| {
            let reason = score
                .rationale
                .first()
                .map_or("solid overall fit", String::as_str);
            format!("{}) {} (score {}): {}.", i + 1, score.name, score.score, reason)
        })
        .collect();

    let total_budget: f64 = allocations.iter().map(|a| a.budget.avg).sum();
    let totals = &outcomes.totals;

    format!(
        "For {name}, a {industry} business focused on {goal}, we recommend \
         prioritizing {top_count} of the {evaluated} channels evaluated. \
         {lines} With a combined monthly budget of about ${total_budget:.0}, \
         we project {reach} impressions, {awareness} aware prospects, \
         {leads} leads and {sales} sales.",
        name = profile.name,
        industry = profile.industry,
        goal = profile.goal,
        evaluated = scores.len(),
        lines = top_lines.join(" "),
        reach = scale_count(totals.reach),
        awareness = scale_count(totals.awareness),
        leads = scale_count(totals.leads),
        sales = scale_count(totals.sales),
    )
}

/// Compact a count with K/M suffixes: divide by 1000 while the value is at
/// least 1000, at most twice.
fn scale_count(value: i64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let mut scaled = value as f64;
    let mut suffix = "";
    for unit in ["K", "M"] {
        if scaled < 1000.0 {
            break;
        }
        scaled /= 1000.0;
        suffix = unit;
    }
    if suffix.is_empty() {
        value.to_string()
    } else {
        let formatted = format!("{scaled:.1}");
        let trimmed = formatted.strip_suffix(".0").unwrap_or(&formatted);
        format!("{trimmed}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uuid::Uuid;

    use adwise_core::Goal;

    use crate::allocate::BudgetSplit;
    use crate::project::FunnelEstimate;
    use crate::score::ScoreBreakdown;

    fn profile() -> EntityProfile {
        EntityProfile {
            public_id: Uuid::new_v4(),
            name: "Acme".to_string(),
            industry: "ecommerce".to_string(),
            goal: Goal::Leads,
            budget_range_min: Some(1000.0),
            budget_range_max: Some(2000.0),
            website: None,
            content_strengths: vec![],
            social_profiles: HashMap::new(),
            target_audience: None,
        }
    }

    fn score(name: &str, value: i64) -> ChannelScore {
        ChannelScore {
            channel_slug: name.to_lowercase(),
            name: name.to_string(),
            category: "paid".to_string(),
            score: value,
            breakdown: ScoreBreakdown {
                efficiency: 74,
                engagement: 36,
                conversion: 39,
                audience_affinity: 50,
                benchmark_fit: 50,
            },
            rationale: vec!["No industry-specific adjustment for ecommerce".to_string()],
        }
    }

    fn allocation(name: &str, avg: f64) -> BudgetAllocation {
        BudgetAllocation {
            channel_slug: name.to_lowercase(),
            name: name.to_string(),
            weight: 1.0,
            budget: BudgetSplit {
                min: avg,
                max: avg,
                avg,
            },
        }
    }

    fn outcomes() -> OutcomeProjection {
        OutcomeProjection {
            channels: vec![],
            totals: FunnelEstimate {
                reach: 125_000,
                awareness: 4_375,
                leads: 197,
                sales: 49,
                efficiency: 0.13,
            },
        }
    }

    #[test]
    fn identical_inputs_yield_identical_text() {
        let scores = vec![score("Google Ads", 47)];
        let allocations = vec![allocation("Google Ads", 1500.0)];
        let a = compose_narrative(&profile(), &scores, &allocations, &outcomes());
        let b = compose_narrative(&profile(), &scores, &allocations, &outcomes());
        assert_eq!(a, b);
    }

    #[test]
    fn mentions_at_most_three_top_channels() {
        let scores = vec![
            score("A", 90),
            score("B", 80),
            score("C", 70),
            score("D", 60),
        ];
        let text = compose_narrative(&profile(), &scores, &[], &outcomes());
        assert!(text.contains("1) A (score 90)"));
        assert!(text.contains("3) C (score 70)"));
        assert!(!text.contains("D (score 60)"));
        assert!(text.contains("prioritizing 3 of the 4 channels"));
    }

    #[test]
    fn scales_totals_with_unit_suffixes() {
        let text = compose_narrative(
            &profile(),
            &[score("Google Ads", 47)],
            &[allocation("Google Ads", 1500.0)],
            &outcomes(),
        );
        assert!(text.contains("125K impressions"), "{text}");
        assert!(text.contains("4.4K aware prospects"), "{text}");
        assert!(text.contains("197 leads"), "{text}");
        assert!(text.contains("$1500"), "{text}");
    }

    #[test]
    fn scale_count_divides_at_most_twice() {
        assert_eq!(scale_count(950), "950");
        assert_eq!(scale_count(1_000), "1K");
        assert_eq!(scale_count(125_000), "125K");
        assert_eq!(scale_count(1_500_000), "1.5M");
        assert_eq!(scale_count(2_400_000_000), "2400M");
    }
}
