//! Database operations for the `channels` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use adwise_core::ChannelDefinition;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `channels` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChannelRow {
    pub id: i64,
    pub public_id: Uuid,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub avg_cpm: f64,
    pub avg_cpc: f64,
    pub avg_ctr: f64,
    pub avg_conv_rate: f64,
    pub industry_modifiers: serde_json::Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChannelRow {
    /// Convert to the immutable value struct the engine consumes.
    ///
    /// Malformed `industry_modifiers` JSON degrades to "no modifiers" rather
    /// than failing the run.
    #[must_use]
    pub fn to_definition(&self) -> ChannelDefinition {
        let industry_modifiers = serde_json::from_value(self.industry_modifiers.clone())
            .unwrap_or_else(|e| {
                tracing::warn!(
                    channel = %self.slug,
                    error = %e,
                    "malformed industry_modifiers JSON, ignoring modifiers"
                );
                std::collections::HashMap::new()
            });
        ChannelDefinition {
            slug: self.slug.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            avg_cpm: self.avg_cpm,
            avg_cpc: self.avg_cpc,
            avg_ctr: self.avg_ctr,
            avg_conv_rate: self.avg_conv_rate,
            industry_modifiers,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all active channels in catalog order (insertion order by id).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_channels(pool: &PgPool) -> Result<Vec<ChannelRow>, DbError> {
    let rows = sqlx::query_as::<_, ChannelRow>(
        "SELECT id, public_id, slug, name, category, avg_cpm, avg_cpc, avg_ctr, \
                avg_conv_rate, industry_modifiers, is_active, created_at, updated_at \
         FROM channels \
         WHERE is_active = true \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(modifiers: serde_json::Value) -> ChannelRow {
        ChannelRow {
            id: 1,
            public_id: Uuid::new_v4(),
            slug: "google-ads".to_string(),
            name: "Google Ads".to_string(),
            category: "paid-search".to_string(),
            avg_cpm: 12.0,
            avg_cpc: 1.8,
            avg_ctr: 0.035,
            avg_conv_rate: 0.045,
            industry_modifiers: modifiers,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn to_definition_parses_modifiers() {
        let def = row(serde_json::json!({"ecommerce": {"conv": 1.15}})).to_definition();
        assert!((def.conversion_modifier("ecommerce") - 1.15).abs() < f64::EPSILON);
    }

    #[test]
    fn to_definition_tolerates_malformed_modifiers() {
        let def = row(serde_json::json!("not-a-map")).to_definition();
        assert!(def.industry_modifiers.is_empty());
        assert!((def.conversion_modifier("ecommerce") - 1.0).abs() < f64::EPSILON);
    }
}
