//! Database operations for the `industry_benchmarks` table.
//!
//! Benchmarks are keyed by lowercase industry and upserted in place; callers
//! normalise the key before reaching this module.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `industry_benchmarks` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BenchmarkRow {
    pub id: i64,
    pub industry: String,
    pub source: String,
    pub avg_cpm: f64,
    pub avg_ctr: f64,
    pub avg_conv_rate: f64,
    pub reach_index: f64,
    pub awareness_index: f64,
    pub updated_at: DateTime<Utc>,
}

/// Returns the benchmark for an industry, or `None` if not stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_benchmark(pool: &PgPool, industry: &str) -> Result<Option<BenchmarkRow>, DbError> {
    let row = sqlx::query_as::<_, BenchmarkRow>(
        "SELECT id, industry, source, avg_cpm, avg_ctr, avg_conv_rate, \
                reach_index, awareness_index, updated_at \
         FROM industry_benchmarks \
         WHERE industry = $1",
    )
    .bind(industry)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts or replaces the benchmark for an industry, returning the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
#[allow(clippy::too_many_arguments)] // flat metric upsert; no sensible grouping
pub async fn upsert_benchmark(
    pool: &PgPool,
    industry: &str,
    source: &str,
    avg_cpm: f64,
    avg_ctr: f64,
    avg_conv_rate: f64,
    reach_index: f64,
    awareness_index: f64,
) -> Result<BenchmarkRow, DbError> {
    let row = sqlx::query_as::<_, BenchmarkRow>(
        "INSERT INTO industry_benchmarks \
           (industry, source, avg_cpm, avg_ctr, avg_conv_rate, reach_index, awareness_index) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (industry) DO UPDATE SET \
             source = EXCLUDED.source, \
             avg_cpm = EXCLUDED.avg_cpm, \
             avg_ctr = EXCLUDED.avg_ctr, \
             avg_conv_rate = EXCLUDED.avg_conv_rate, \
             reach_index = EXCLUDED.reach_index, \
             awareness_index = EXCLUDED.awareness_index, \
             updated_at = NOW() \
         RETURNING id, industry, source, avg_cpm, avg_ctr, avg_conv_rate, \
                   reach_index, awareness_index, updated_at",
    )
    .bind(industry)
    .bind(source)
    .bind(avg_cpm)
    .bind(avg_ctr)
    .bind(avg_conv_rate)
    .bind(reach_index)
    .bind(awareness_index)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
