//! Deterministic per-platform ad estimators.
//!
//! Each estimator is a closed-form function of the entity's industry, budget
//! midpoint, and content strengths. They involve no I/O and cannot fail; the
//! join exists so the five estimates settle together.

use std::collections::HashMap;

use futures::future::join_all;

use adwise_core::{AnalyticsSnapshot, EntityProfile};

use crate::types::PlatformSignal;

/// The five supported ad platforms.
pub const PLATFORM_IDS: &[&str] = &["google_ads", "meta", "linkedin", "tiktok", "youtube"];

struct PlatformSpec {
    id: &'static str,
    base_cpm: f64,
    base_cpc: f64,
    /// Content strengths this platform rewards.
    strengths: &'static [&'static str],
    /// `(industry, affinity boost)` pairs.
    industry_boosts: &'static [(&'static str, f64)],
}

const PLATFORM_SPECS: &[PlatformSpec] = &[
    PlatformSpec {
        id: "google_ads",
        base_cpm: 12.0,
        base_cpc: 1.8,
        strengths: &["search", "blog", "landing-pages"],
        industry_boosts: &[("ecommerce", 0.15), ("local-services", 0.20), ("saas", 0.10)],
    },
    PlatformSpec {
        id: "meta",
        base_cpm: 9.5,
        base_cpc: 1.2,
        strengths: &["photo", "video", "community"],
        industry_boosts: &[("ecommerce", 0.20), ("fitness", 0.15)],
    },
    PlatformSpec {
        id: "linkedin",
        base_cpm: 28.0,
        base_cpc: 5.5,
        strengths: &["whitepapers", "blog", "webinars"],
        industry_boosts: &[("saas", 0.25), ("finance", 0.15)],
    },
    PlatformSpec {
        id: "tiktok",
        base_cpm: 6.5,
        base_cpc: 0.85,
        strengths: &["video", "short-form", "trends"],
        industry_boosts: &[("ecommerce", 0.10), ("fitness", 0.20)],
    },
    PlatformSpec {
        id: "youtube",
        base_cpm: 10.0,
        base_cpc: 2.1,
        strengths: &["video", "tutorials", "long-form"],
        industry_boosts: &[("education", 0.20), ("saas", 0.10)],
    },
];

/// Compute all five platform estimates for one entity, keyed by platform id.
pub async fn fetch_platform_signals(
    profile: &EntityProfile,
    analytics: &AnalyticsSnapshot,
) -> HashMap<String, PlatformSignal> {
    let estimates = join_all(
        PLATFORM_SPECS
            .iter()
            .map(|spec| async move { estimate(spec, profile, analytics) }),
    )
    .await;

    estimates
        .into_iter()
        .map(|signal| (signal.platform.clone(), signal))
        .collect()
}

fn estimate(
    spec: &PlatformSpec,
    profile: &EntityProfile,
    analytics: &AnalyticsSnapshot,
) -> PlatformSignal {
    let industry = profile.industry.trim().to_lowercase();
    let boost = spec
        .industry_boosts
        .iter()
        .find(|(key, _)| *key == industry)
        .map_or(0.0, |(_, b)| *b);

    let strength_matches = profile
        .content_strengths
        .iter()
        .filter(|s| spec.strengths.contains(&s.trim().to_lowercase().as_str()))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let strength_ratio = strength_matches as f64 / spec.strengths.len() as f64;

    // Larger audiences saturate toward 0.1; zero traffic contributes nothing.
    #[allow(clippy::cast_precision_loss)]
    let traffic_factor = analytics
        .monthly_visits
        .map_or(0.0, |v| (v as f64 / 100_000.0).clamp(0.0, 1.0) * 0.1);

    let affinity = (0.35 + 0.35 * strength_ratio + boost + traffic_factor).clamp(0.0, 1.0);

    // A favourable fit lowers effective acquisition cost.
    let estimated_cpm = spec.base_cpm * (1.0 - 0.2 * boost).max(0.5);
    let estimated_cpc = spec.base_cpc * (1.0 - 0.2 * boost).max(0.5);

    let (min_budget, max_budget) = profile.budget_range();
    let midpoint = (min_budget + max_budget) / 2.0;
    let reach_potential = if estimated_cpm > 0.0 {
        midpoint / estimated_cpm * 1000.0
    } else {
        0.0
    };

    PlatformSignal {
        platform: spec.id.to_string(),
        estimated_cpm,
        estimated_cpc,
        affinity,
        conversion_lift: 1.0 + boost,
        reach_potential,
    }
}
