//! Database operations for the `entities` table.
//!
//! This is the entity-profile provider boundary: rows are converted to the
//! immutable [`EntityProfile`] snapshot before they reach the engine.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use adwise_core::{EntityProfile, Goal};

use crate::DbError;

/// A row from the `entities` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EntityRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub industry: String,
    pub goal: String,
    pub budget_range_min: Option<f64>,
    pub budget_range_max: Option<f64>,
    pub website: Option<String>,
    pub content_strengths: serde_json::Value,
    pub social_profiles: serde_json::Value,
    pub target_audience: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntityRow {
    /// Snapshot this row into the value struct consumed by the pipeline.
    ///
    /// Malformed JSON columns degrade to empty collections.
    #[must_use]
    pub fn to_profile(&self) -> EntityProfile {
        let content_strengths =
            serde_json::from_value(self.content_strengths.clone()).unwrap_or_default();
        let social_profiles =
            serde_json::from_value(self.social_profiles.clone()).unwrap_or_default();
        EntityProfile {
            public_id: self.public_id,
            name: self.name.clone(),
            industry: self.industry.clone(),
            goal: Goal::from(self.goal.clone()),
            budget_range_min: self.budget_range_min,
            budget_range_max: self.budget_range_max,
            website: self.website.clone(),
            content_strengths,
            social_profiles,
            target_audience: self.target_audience.clone(),
        }
    }
}

/// Returns the entity with the given public id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_entity_by_public_id(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<Option<EntityRow>, DbError> {
    let row = sqlx::query_as::<_, EntityRow>(
        "SELECT id, public_id, name, industry, goal, budget_range_min, budget_range_max, \
                website, content_strengths, social_profiles, target_audience, \
                created_at, updated_at \
         FROM entities \
         WHERE public_id = $1",
    )
    .bind(public_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Creates a new entity row and returns it.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
#[allow(clippy::too_many_arguments)] // boundary API for full entity creation
pub async fn create_entity(
    pool: &PgPool,
    name: &str,
    industry: &str,
    goal: &str,
    budget_range_min: Option<f64>,
    budget_range_max: Option<f64>,
    website: Option<&str>,
    content_strengths: &serde_json::Value,
    social_profiles: &serde_json::Value,
    target_audience: Option<&str>,
) -> Result<EntityRow, DbError> {
    let row = sqlx::query_as::<_, EntityRow>(
        "INSERT INTO entities \
           (name, industry, goal, budget_range_min, budget_range_max, website, \
            content_strengths, social_profiles, target_audience) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING id, public_id, name, industry, goal, budget_range_min, budget_range_max, \
                   website, content_strengths, social_profiles, target_audience, \
                   created_at, updated_at",
    )
    .bind(name)
    .bind(industry)
    .bind(goal)
    .bind(budget_range_min)
    .bind(budget_range_max)
    .bind(website)
    .bind(content_strengths)
    .bind(social_profiles)
    .bind(target_audience)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns the distinct industries across all entities, for the benchmark
/// refresh job.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_distinct_industries(pool: &PgPool) -> Result<Vec<String>, DbError> {
    let rows = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT LOWER(industry) FROM entities ORDER BY 1",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_profile_parses_json_columns() {
        let row = EntityRow {
            id: 1,
            public_id: Uuid::new_v4(),
            name: "Acme".to_string(),
            industry: "Ecommerce".to_string(),
            goal: "leads".to_string(),
            budget_range_min: Some(1000.0),
            budget_range_max: None,
            website: Some("https://acme.example.com".to_string()),
            content_strengths: serde_json::json!(["video", "blog"]),
            social_profiles: serde_json::json!({"instagram": "acme"}),
            target_audience: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let profile = row.to_profile();
        assert_eq!(profile.goal, Goal::Leads);
        assert_eq!(profile.content_strengths, vec!["video", "blog"]);
        assert_eq!(profile.social_profiles["instagram"], "acme");
    }

    #[test]
    fn to_profile_tolerates_malformed_json() {
        let row = EntityRow {
            id: 1,
            public_id: Uuid::new_v4(),
            name: "Acme".to_string(),
            industry: "saas".to_string(),
            goal: "growth-hacking".to_string(),
            budget_range_min: None,
            budget_range_max: None,
            website: None,
            content_strengths: serde_json::json!(42),
            social_profiles: serde_json::json!([]),
            target_audience: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let profile = row.to_profile();
        assert!(profile.content_strengths.is_empty());
        assert!(profile.social_profiles.is_empty());
        assert!(matches!(profile.goal, Goal::Other(_)));
    }
}
