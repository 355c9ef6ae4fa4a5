//! Composite channel fit scoring.
//!
//! Every channel in the catalog gets a score derived from its baseline
//! metrics, the entity's goal bias, audience affinity signals, and the
//! industry benchmark. Scores are integers around the 0..=100 range; an
//! industry modifier above 1 can push them past 100 on purpose, and ranking
//! and allocation handle that headroom without clamping.

use serde::{Deserialize, Serialize};

use adwise_core::{AnalyticsSnapshot, ChannelDefinition, EntityProfile, Goal};
use adwise_signals::SignalBundle;

/// Affinity used when no platform, social, or analytics signal resolves.
pub const DEFAULT_AFFINITY: f64 = 0.5;

/// Neutral benchmark fit used when no benchmark is available.
const NEUTRAL_BENCHMARK_FIT: f64 = 0.5;

/// Observed CPM range across the supported channels.
const CPM_RANGE: (f64, f64) = (4.0, 35.0);
/// Observed CTR range.
const CTR_RANGE: (f64, f64) = (0.01, 0.08);
/// Observed conversion-rate range.
const CONV_RANGE: (f64, f64) = (0.01, 0.10);
/// Benchmark conversion-rate range.
const BENCHMARK_CONV_RANGE: (f64, f64) = (0.015, 0.08);

/// Rounded percentage contributions of each scoring component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub efficiency: u32,
    pub engagement: u32,
    pub conversion: u32,
    pub audience_affinity: u32,
    pub benchmark_fit: u32,
}

/// One ranked catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelScore {
    pub channel_slug: String,
    pub name: String,
    pub category: String,
    pub score: i64,
    pub breakdown: ScoreBreakdown,
    pub rationale: Vec<String>,
}

/// Score every catalog channel and return them sorted descending by score.
/// Ties keep catalog order (stable sort).
#[must_use]
pub fn score_channels(
    catalog: &[ChannelDefinition],
    profile: &EntityProfile,
    signals: &SignalBundle,
    analytics: &AnalyticsSnapshot,
) -> Vec<ChannelScore> {
    let bias = goal_bias(&profile.goal);
    let benchmark_fit = signals.benchmark.as_ref().map_or(NEUTRAL_BENCHMARK_FIT, |b| {
        normalize(b.avg_conv_rate, BENCHMARK_CONV_RANGE, false)
    });

    let mut scores: Vec<ChannelScore> = catalog
        .iter()
        .map(|channel| score_one(channel, profile, signals, analytics, bias, benchmark_fit))
        .collect();
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores
}

fn score_one(
    channel: &ChannelDefinition,
    profile: &EntityProfile,
    signals: &SignalBundle,
    analytics: &AnalyticsSnapshot,
    bias: GoalBias,
    benchmark_fit: f64,
) -> ChannelScore {
    let efficiency = normalize(channel.avg_cpm, CPM_RANGE, true);
    let engagement = normalize(channel.avg_ctr, CTR_RANGE, false);
    let conversion = normalize(channel.avg_conv_rate, CONV_RANGE, false);
    let affinity = audience_affinity(&channel.slug, signals, analytics);

    let core = efficiency * bias.reach + engagement * bias.ctr + conversion * bias.conversion;
    let composite = (core * 0.6 + affinity * 0.25 + benchmark_fit * 0.15).clamp(0.0, 1.0);

    let modifier = channel.conversion_modifier(&profile.industry);
    let score = round_score(composite * modifier * 100.0);

    let breakdown = ScoreBreakdown {
        efficiency: pct(efficiency),
        engagement: pct(engagement),
        conversion: pct(conversion),
        audience_affinity: pct(affinity),
        benchmark_fit: pct(benchmark_fit),
    };
    let rationale = rationale(channel, &profile.industry, modifier, &breakdown);

    ChannelScore {
        channel_slug: channel.slug.clone(),
        name: channel.name.clone(),
        category: channel.category.clone(),
        score,
        breakdown,
        rationale,
    }
}

/// Map a metric into `[0, 1]` over its observed range; `flip` inverts the
/// scale for metrics where lower is better.
fn normalize(value: f64, (min, max): (f64, f64), flip: bool) -> f64 {
    let scaled = ((value - min) / (max - min)).clamp(0.0, 1.0);
    if flip {
        1.0 - scaled
    } else {
        scaled
    }
}

#[derive(Debug, Clone, Copy)]
struct GoalBias {
    reach: f64,
    ctr: f64,
    conversion: f64,
}

fn goal_bias(goal: &Goal) -> GoalBias {
    let (reach, ctr, conversion) = match goal {
        Goal::Awareness => (0.55, 0.30, 0.15),
        Goal::Leads => (0.20, 0.35, 0.45),
        Goal::Sales => (0.15, 0.25, 0.60),
        Goal::Conversions => (0.10, 0.30, 0.60),
        Goal::Other(_) => (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0),
    };
    GoalBias {
        reach,
        ctr,
        conversion,
    }
}

/// First defined provider wins: platform affinity, then social overlap, then
/// the analytics audience match, then [`DEFAULT_AFFINITY`].
fn audience_affinity(slug: &str, signals: &SignalBundle, analytics: &AnalyticsSnapshot) -> f64 {
    let providers = [
        ad_platform_for(slug)
            .and_then(|id| signals.platform_signals.get(id))
            .map(|s| s.affinity),
        social_platform_for(slug)
            .and_then(|id| signals.social_signals.get(id))
            .map(|s| s.overlap),
        analytics.audience_match,
    ];
    let raw = providers
        .into_iter()
        .flatten()
        .next()
        .unwrap_or(DEFAULT_AFFINITY);
    raw.clamp(0.0, 1.0)
}

/// Ad platform whose estimate covers this channel, if any.
fn ad_platform_for(slug: &str) -> Option<&'static str> {
    if slug.contains("google") {
        Some("google_ads")
    } else if slug.contains("meta") || slug.contains("facebook") {
        Some("meta")
    } else if slug.contains("linkedin") {
        Some("linkedin")
    } else if slug.contains("tiktok") {
        Some("tiktok")
    } else if slug.contains("youtube") {
        Some("youtube")
    } else {
        None
    }
}

/// Social platform whose audience overlap proxies this channel, if any.
fn social_platform_for(slug: &str) -> Option<&'static str> {
    if slug.contains("meta") || slug.contains("facebook") {
        Some("facebook")
    } else if slug.contains("linkedin") {
        Some("linkedin")
    } else if slug.contains("tiktok") {
        Some("tiktok")
    } else if slug.contains("youtube") {
        Some("youtube")
    } else if slug.contains("influencer") || slug.contains("instagram") {
        Some("instagram")
    } else {
        None
    }
}

fn rationale(
    channel: &ChannelDefinition,
    industry: &str,
    modifier: f64,
    breakdown: &ScoreBreakdown,
) -> Vec<String> {
    let modifier_line = if modifier > 1.0 {
        format!(
            "Historically strong for {industry} audiences ({modifier:.2}x conversion modifier)"
        )
    } else if modifier < 1.0 {
        format!(
            "Typically underperforms for {industry} audiences ({modifier:.2}x conversion modifier)"
        )
    } else {
        format!("No industry-specific adjustment for {industry}")
    };
    vec![
        modifier_line,
        format!(
            "Cost efficiency rated {}% at an average CPM of ${:.2}",
            breakdown.efficiency, channel.avg_cpm
        ),
        format!(
            "Audience affinity estimated at {}%",
            breakdown.audience_affinity
        ),
    ]
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pct(value: f64) -> u32 {
    (value.clamp(0.0, 1.0) * 100.0).round() as u32
}

#[allow(clippy::cast_possible_truncation)]
fn round_score(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uuid::Uuid;

    use adwise_core::IndustryModifier;
    use adwise_signals::{IndustryBenchmark, PlatformSignal, SocialSignal};

    fn channel(name: &str, cpm: f64, ctr: f64, conv: f64) -> ChannelDefinition {
        ChannelDefinition {
            slug: name
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-"),
            name: name.to_string(),
            category: "paid".to_string(),
            avg_cpm: cpm,
            avg_cpc: 1.0,
            avg_ctr: ctr,
            avg_conv_rate: conv,
            industry_modifiers: HashMap::new(),
        }
    }

    fn profile(goal: &str, industry: &str) -> EntityProfile {
        EntityProfile {
            public_id: Uuid::new_v4(),
            name: "Acme".to_string(),
            industry: industry.to_string(),
            goal: Goal::from(goal.to_string()),
            budget_range_min: Some(1000.0),
            budget_range_max: Some(2000.0),
            website: None,
            content_strengths: vec![],
            social_profiles: HashMap::new(),
            target_audience: None,
        }
    }

    fn platform_signal(platform: &str, affinity: f64) -> PlatformSignal {
        PlatformSignal {
            platform: platform.to_string(),
            estimated_cpm: 10.0,
            estimated_cpc: 1.0,
            affinity,
            conversion_lift: 1.0,
            reach_potential: 0.0,
        }
    }

    #[test]
    fn returns_one_score_per_catalog_entry() {
        let catalog = vec![
            channel("Google Ads", 12.0, 0.035, 0.045),
            channel("Email Marketing", 5.0, 0.025, 0.06),
            channel("SEO Content", 4.0, 0.02, 0.03),
        ];
        let scores = score_channels(
            &catalog,
            &profile("leads", "ecommerce"),
            &SignalBundle::default(),
            &AnalyticsSnapshot::default(),
        );
        assert_eq!(scores.len(), 3);
    }

    #[test]
    fn single_channel_no_signals_scores_forty_seven() {
        // Leads bias (0.20, 0.35, 0.45) over Google Ads baselines with
        // neutral affinity and benchmark fit lands on 47.
        let catalog = vec![channel("Google Ads", 12.0, 0.035, 0.045)];
        let scores = score_channels(
            &catalog,
            &profile("leads", "ecommerce"),
            &SignalBundle::default(),
            &AnalyticsSnapshot::default(),
        );
        assert_eq!(scores[0].score, 47);
        assert_eq!(scores[0].rationale.len(), 3);
    }

    #[test]
    fn sorts_descending_and_keeps_catalog_order_on_ties() {
        let catalog = vec![
            channel("Alpha", 12.0, 0.035, 0.045),
            channel("Bravo", 12.0, 0.035, 0.045),
            channel("Cheap", 4.0, 0.08, 0.10),
        ];
        let scores = score_channels(
            &catalog,
            &profile("leads", "retail"),
            &SignalBundle::default(),
            &AnalyticsSnapshot::default(),
        );
        assert_eq!(scores[0].name, "Cheap");
        assert_eq!(scores[1].name, "Alpha", "tie keeps catalog order");
        assert_eq!(scores[2].name, "Bravo");
    }

    #[test]
    fn industry_modifier_can_push_score_past_one_hundred() {
        let mut best = channel("Google Ads", 4.0, 0.08, 0.10);
        best.industry_modifiers.insert(
            "ecommerce".to_string(),
            IndustryModifier {
                cpm: 1.0,
                ctr: 1.0,
                conv: 1.3,
            },
        );
        let mut signals = SignalBundle::default();
        signals
            .platform_signals
            .insert("google_ads".to_string(), platform_signal("google_ads", 1.0));
        signals.benchmark = Some(IndustryBenchmark::new(
            "ecommerce", "fallback", 11.0, 0.03, 0.08, 0.9, 0.9,
        ));

        let scores = score_channels(
            &[best],
            &profile("leads", "ecommerce"),
            &signals,
            &AnalyticsSnapshot::default(),
        );
        assert_eq!(scores[0].score, 130, "super-scores are not clamped");
    }

    #[test]
    fn unknown_goal_uses_even_bias_split() {
        let catalog = vec![channel("Google Ads", 12.0, 0.035, 0.045)];
        let scores = score_channels(
            &catalog,
            &profile("brand-building", "retail"),
            &SignalBundle::default(),
            &AnalyticsSnapshot::default(),
        );
        // core = (0.7419 + 0.3571 + 0.3889) / 3 = 0.4960; composite 0.4976.
        assert_eq!(scores[0].score, 50);
    }

    #[test]
    fn affinity_prefers_platform_then_social_then_analytics() {
        let catalog = vec![channel("TikTok Ads", 12.0, 0.035, 0.045)];
        let p = profile("leads", "retail");
        let analytics = AnalyticsSnapshot {
            monthly_visits: None,
            audience_match: Some(0.2),
        };

        let mut signals = SignalBundle::default();
        signals.social_signals.insert(
            "tiktok".to_string(),
            SocialSignal {
                platform: "tiktok".to_string(),
                handle: "acme".to_string(),
                followers: 60_000,
                overlap: 0.4,
            },
        );
        let social_only = score_channels(&catalog, &p, &signals, &analytics);

        signals
            .platform_signals
            .insert("tiktok".to_string(), platform_signal("tiktok", 0.9));
        let with_platform = score_channels(&catalog, &p, &signals, &analytics);

        let analytics_only =
            score_channels(&catalog, &p, &SignalBundle::default(), &analytics);

        assert_eq!(with_platform[0].breakdown.audience_affinity, 90);
        assert_eq!(social_only[0].breakdown.audience_affinity, 40);
        assert_eq!(analytics_only[0].breakdown.audience_affinity, 20);
    }

    #[test]
    fn affinity_defaults_when_nothing_resolves() {
        let catalog = vec![channel("Email Marketing", 12.0, 0.035, 0.045)];
        let scores = score_channels(
            &catalog,
            &profile("leads", "retail"),
            &SignalBundle::default(),
            &AnalyticsSnapshot::default(),
        );
        assert_eq!(scores[0].breakdown.audience_affinity, 50);
    }

    #[test]
    fn benchmark_fit_is_neutral_without_a_benchmark() {
        let catalog = vec![channel("Google Ads", 12.0, 0.035, 0.045)];
        let scores = score_channels(
            &catalog,
            &profile("leads", "retail"),
            &SignalBundle::default(),
            &AnalyticsSnapshot::default(),
        );
        assert_eq!(scores[0].breakdown.benchmark_fit, 50);
    }

    #[test]
    fn normalize_flips_and_clamps() {
        assert!((normalize(4.0, (4.0, 35.0), true) - 1.0).abs() < f64::EPSILON);
        assert!((normalize(35.0, (4.0, 35.0), true)).abs() < f64::EPSILON);
        assert!((normalize(100.0, (4.0, 35.0), false) - 1.0).abs() < f64::EPSILON);
        assert!((normalize(-5.0, (0.01, 0.08), false)).abs() < f64::EPSILON);
    }
}
