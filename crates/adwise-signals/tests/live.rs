//! Benchmark resolution tests against a live Postgres database.

use sqlx::PgPool;

use adwise_signals::{SignalAggregator, SignalConfig, BENCHMARK_FALLBACK_SOURCE};

fn aggregator() -> SignalAggregator {
    SignalAggregator::new(SignalConfig::default()).expect("aggregator")
}

#[sqlx::test(migrations = "../../migrations")]
async fn fallback_benchmark_is_persisted_on_first_fetch(pool: PgPool) {
    let benchmark = aggregator()
        .fetch_benchmark(&pool, "SaaS")
        .await
        .expect("benchmark");

    assert_eq!(benchmark.industry, "saas");
    assert_eq!(benchmark.source, BENCHMARK_FALLBACK_SOURCE);

    let stored = adwise_db::get_benchmark(&pool, "saas")
        .await
        .expect("query")
        .expect("row");
    assert!((stored.avg_cpm - benchmark.avg_cpm).abs() < f64::EPSILON);
}

#[sqlx::test(migrations = "../../migrations")]
async fn unknown_industry_gets_default_metrics_under_its_own_key(pool: PgPool) {
    let benchmark = aggregator()
        .fetch_benchmark(&pool, "aerospace")
        .await
        .expect("benchmark");

    assert_eq!(benchmark.industry, "aerospace");
    assert!((benchmark.avg_cpm - 10.0).abs() < f64::EPSILON);
    assert!(adwise_db::get_benchmark(&pool, "aerospace")
        .await
        .expect("query")
        .is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn second_fetch_is_served_from_the_instance_cache(pool: PgPool) {
    let aggregator = aggregator();
    let first = aggregator
        .fetch_benchmark(&pool, "fitness")
        .await
        .expect("benchmark");

    sqlx::query("UPDATE industry_benchmarks SET avg_cpm = 99.0 WHERE industry = 'fitness'")
        .execute(&pool)
        .await
        .expect("update");

    let second = aggregator
        .fetch_benchmark(&pool, "fitness")
        .await
        .expect("benchmark");
    assert!(
        (second.avg_cpm - first.avg_cpm).abs() < f64::EPSILON,
        "cached value wins over the mutated row"
    );

    let fresh = SignalAggregator::new(SignalConfig::default())
        .expect("aggregator")
        .fetch_benchmark(&pool, "fitness")
        .await
        .expect("benchmark");
    assert!(
        (fresh.avg_cpm - 99.0).abs() < f64::EPSILON,
        "a new instance reads the store"
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn stored_benchmark_wins_over_the_fallback_table(pool: PgPool) {
    adwise_db::upsert_benchmark(&pool, "saas", "remote", 30.0, 0.02, 0.04, 0.7, 0.8)
        .await
        .expect("upsert");

    let benchmark = aggregator()
        .fetch_benchmark(&pool, "saas")
        .await
        .expect("benchmark");
    assert_eq!(benchmark.source, "remote");
    assert!((benchmark.avg_cpm - 30.0).abs() < f64::EPSILON);
}
