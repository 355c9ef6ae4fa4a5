//! Run orchestration: load inputs, fan out signal acquisition, run the pure
//! stages in order, persist one immutable row, return the bundle.
//!
//! The only aborting failures are missing preconditions (unknown entity,
//! unseeded catalog) and persistence errors. Signal degradation is absorbed
//! upstream and a run with degraded signals still completes.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use adwise_core::{AnalyticsSnapshot, ChannelDefinition, EntityProfile};
use adwise_db::{NewRecommendation, RecommendationRow};
use adwise_signals::{IndustryBenchmark, PlatformSignal, SignalAggregator, SocialSignal};

use crate::allocate::{allocate_budget, BudgetAllocation};
use crate::error::EngineError;
use crate::narrative::compose_narrative;
use crate::project::{project_outcomes, OutcomeProjection};
use crate::score::{score_channels, ChannelScore};

/// A persisted recommendation younger than this is reused verbatim.
pub const REUSE_WINDOW_MINUTES: i64 = 30;

/// Number of top channels persisted per run.
const PERSISTED_CHANNELS: usize = 5;

/// Everything one run produces, for the API and the CLI alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationBundle {
    pub entity_public_id: Uuid,
    pub scores: Vec<ChannelScore>,
    pub allocation: Vec<BudgetAllocation>,
    pub outcomes: OutcomeProjection,
    pub benchmark: Option<IndustryBenchmark>,
    pub social_signals: HashMap<String, SocialSignal>,
    pub platform_signals: HashMap<String, PlatformSignal>,
    pub narrative: String,
    pub generated_at: DateTime<Utc>,
    /// True when this bundle was served from a recent persisted run.
    pub reused: bool,
}

/// Owns the pool and the signal aggregator; sequences one recommendation
/// run end to end.
pub struct Recommender {
    pool: PgPool,
    signals: SignalAggregator,
}

impl Recommender {
    #[must_use]
    pub fn new(pool: PgPool, signals: SignalAggregator) -> Self {
        Self { pool, signals }
    }

    /// Produce a recommendation bundle for the entity.
    ///
    /// Unless `force` is set, a persisted run younger than
    /// [`REUSE_WINDOW_MINUTES`] is returned as-is and nothing is recomputed.
    ///
    /// # Errors
    ///
    /// [`EngineError::EntityNotFound`] if the public id is unknown,
    /// [`EngineError::EmptyCatalog`] if no active channels are seeded, and
    /// [`EngineError::Db`] on persistence failures.
    pub async fn recommend(
        &self,
        entity_public_id: Uuid,
        force: bool,
    ) -> Result<RecommendationBundle, EngineError> {
        self.recommend_with_analytics(entity_public_id, force, &AnalyticsSnapshot::default())
            .await
    }

    /// [`Self::recommend`] with an explicit analytics snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`Self::recommend`].
    pub async fn recommend_with_analytics(
        &self,
        entity_public_id: Uuid,
        force: bool,
        analytics: &AnalyticsSnapshot,
    ) -> Result<RecommendationBundle, EngineError> {
        let entity = adwise_db::get_entity_by_public_id(&self.pool, entity_public_id)
            .await?
            .ok_or(EngineError::EntityNotFound(entity_public_id))?;

        if !force {
            if let Some(row) =
                adwise_db::find_latest_for_entity(&self.pool, entity.id).await?
            {
                if is_fresh(row.generated_at, Utc::now()) {
                    if let Some(bundle) = bundle_from_row(entity_public_id, &row) {
                        tracing::debug!(
                            entity = %entity_public_id,
                            generated_at = %row.generated_at,
                            "reusing recent recommendation"
                        );
                        return Ok(bundle);
                    }
                    tracing::warn!(
                        entity = %entity_public_id,
                        "persisted recommendation payload unreadable, recomputing"
                    );
                }
            }
        }

        let catalog: Vec<ChannelDefinition> = adwise_db::list_active_channels(&self.pool)
            .await?
            .iter()
            .map(adwise_db::ChannelRow::to_definition)
            .collect();
        if catalog.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }

        let profile = entity.to_profile();
        let bundle = self.run(&entity, &profile, &catalog, analytics).await?;
        Ok(bundle)
    }

    async fn run(
        &self,
        entity: &adwise_db::EntityRow,
        profile: &EntityProfile,
        catalog: &[ChannelDefinition],
        analytics: &AnalyticsSnapshot,
    ) -> Result<RecommendationBundle, EngineError> {
        let signals = self.signals.fetch_all(&self.pool, profile, analytics).await;

        let scores = score_channels(catalog, profile, &signals, analytics);
        let (min_budget, max_budget) = profile.budget_range();
        let allocation = allocate_budget(&scores, min_budget, max_budget);

        let by_slug: HashMap<String, ChannelDefinition> = catalog
            .iter()
            .map(|c| (c.slug.clone(), c.clone()))
            .collect();
        let outcomes = project_outcomes(&allocation, &by_slug, signals.benchmark.as_ref());
        let narrative = compose_narrative(profile, &scores, &allocation, &outcomes);

        let top = &scores[..scores.len().min(PERSISTED_CHANNELS)];
        let row = adwise_db::create_recommendation(
            &self.pool,
            &NewRecommendation {
                entity_id: entity.id,
                recommended_channels: serde_json::to_value(top)?,
                suggested_budgets: serde_json::to_value(&allocation)?,
                estimated_outcomes: serde_json::to_value(&outcomes)?,
                narrative: narrative.clone(),
            },
        )
        .await?;

        tracing::info!(
            entity = %profile.public_id,
            channels = scores.len(),
            top_score = scores.first().map(|s| s.score),
            "recommendation run persisted"
        );

        Ok(RecommendationBundle {
            entity_public_id: profile.public_id,
            scores,
            allocation,
            outcomes,
            benchmark: signals.benchmark,
            social_signals: signals.social_signals,
            platform_signals: signals.platform_signals,
            narrative,
            generated_at: row.generated_at,
            reused: false,
        })
    }
}

/// Reuse window predicate: strictly younger than the window. A row exactly
/// thirty minutes old is already stale.
fn is_fresh(generated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(generated_at) < Duration::minutes(REUSE_WINDOW_MINUTES)
}

/// Rehydrate a bundle from a persisted row. Signal fields are empty on the
/// reuse path; they are recomputed fresh each run and never persisted.
fn bundle_from_row(entity_public_id: Uuid, row: &RecommendationRow) -> Option<RecommendationBundle> {
    let scores: Vec<ChannelScore> =
        serde_json::from_value(row.recommended_channels.clone()).ok()?;
    let allocation: Vec<BudgetAllocation> =
        serde_json::from_value(row.suggested_budgets.clone()).ok()?;
    let outcomes: OutcomeProjection =
        serde_json::from_value(row.estimated_outcomes.clone()).ok()?;

    Some(RecommendationBundle {
        entity_public_id,
        scores,
        allocation,
        outcomes,
        benchmark: None,
        social_signals: HashMap::new(),
        platform_signals: HashMap::new(),
        narrative: row.narrative.clone(),
        generated_at: row.generated_at,
        reused: true,
    })
}
