//! Database operations for the `recommendations` table.
//!
//! Rows are append-only: every run inserts a new row and history is never
//! rewritten. "Latest" is always resolved by `generated_at DESC`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `recommendations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecommendationRow {
    pub id: i64,
    pub entity_id: i64,
    pub recommended_channels: serde_json::Value,
    pub suggested_budgets: serde_json::Value,
    pub estimated_outcomes: serde_json::Value,
    pub narrative: String,
    pub generated_at: DateTime<Utc>,
}

/// Payload for one new recommendation row.
#[derive(Debug, Clone)]
pub struct NewRecommendation {
    pub entity_id: i64,
    pub recommended_channels: serde_json::Value,
    pub suggested_budgets: serde_json::Value,
    pub estimated_outcomes: serde_json::Value,
    pub narrative: String,
}

/// Appends a new recommendation row and returns it.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_recommendation(
    pool: &PgPool,
    new: &NewRecommendation,
) -> Result<RecommendationRow, DbError> {
    let row = sqlx::query_as::<_, RecommendationRow>(
        "INSERT INTO recommendations \
           (entity_id, recommended_channels, suggested_budgets, estimated_outcomes, narrative) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, entity_id, recommended_channels, suggested_budgets, \
                   estimated_outcomes, narrative, generated_at",
    )
    .bind(new.entity_id)
    .bind(&new.recommended_channels)
    .bind(&new.suggested_budgets)
    .bind(&new.estimated_outcomes)
    .bind(&new.narrative)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns the most recent recommendation for an entity, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_latest_for_entity(
    pool: &PgPool,
    entity_id: i64,
) -> Result<Option<RecommendationRow>, DbError> {
    let row = sqlx::query_as::<_, RecommendationRow>(
        "SELECT id, entity_id, recommended_channels, suggested_budgets, \
                estimated_outcomes, narrative, generated_at \
         FROM recommendations \
         WHERE entity_id = $1 \
         ORDER BY generated_at DESC \
         LIMIT 1",
    )
    .bind(entity_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
