use adwise_core::ChannelConfig;
use sqlx::PgPool;

use crate::DbError;

/// Upsert channels from the catalog file into the database.
///
/// Returns the number of channels processed (inserted or updated). All
/// upserts run inside a single transaction; if any operation fails the
/// entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_channels(pool: &PgPool, channels: &[ChannelConfig]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for channel in channels {
        let slug = channel.slug();
        let modifiers = serde_json::to_value(&channel.industry_modifiers)
            .unwrap_or_else(|_| serde_json::json!({}));

        sqlx::query(
            "INSERT INTO channels \
               (slug, name, category, avg_cpm, avg_cpc, avg_ctr, avg_conv_rate, \
                industry_modifiers, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, true) \
             ON CONFLICT (slug) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 category = EXCLUDED.category, \
                 avg_cpm = EXCLUDED.avg_cpm, \
                 avg_cpc = EXCLUDED.avg_cpc, \
                 avg_ctr = EXCLUDED.avg_ctr, \
                 avg_conv_rate = EXCLUDED.avg_conv_rate, \
                 industry_modifiers = EXCLUDED.industry_modifiers, \
                 updated_at = NOW()",
        )
        .bind(&slug)
        .bind(&channel.name)
        .bind(&channel.category)
        .bind(channel.avg_cpm)
        .bind(channel.avg_cpc)
        .bind(channel.avg_ctr)
        .bind(channel.avg_conv_rate)
        .bind(&modifiers)
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
