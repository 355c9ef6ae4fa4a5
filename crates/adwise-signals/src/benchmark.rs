//! Industry benchmark acquisition: in-process cache, persisted store,
//! static fallback table, and bounded remote refresh.

use std::collections::HashMap;

use serde::Deserialize;
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::error::SignalError;
use crate::types::IndustryBenchmark;

/// Source label for benchmarks seeded from the static fallback table.
pub const BENCHMARK_FALLBACK_SOURCE: &str = "fallback";

/// Source label for benchmarks fetched from the remote source.
const BENCHMARK_REMOTE_SOURCE: &str = "remote";

/// Static fallback baselines: `(industry, avg_cpm, avg_ctr, avg_conv_rate,
/// reach_index, awareness_index)`. The `"default"` entry is the global
/// catch-all for unknown industries.
const FALLBACK_BENCHMARKS: &[(&str, f64, f64, f64, f64, f64)] = &[
    ("ecommerce", 11.0, 0.030, 0.042, 0.85, 0.90),
    ("saas", 22.0, 0.018, 0.035, 0.70, 0.80),
    ("finance", 25.0, 0.015, 0.030, 0.65, 0.75),
    ("education", 9.0, 0.028, 0.038, 0.80, 0.85),
    ("fitness", 8.0, 0.032, 0.028, 0.90, 0.90),
    ("local-services", 7.0, 0.030, 0.050, 0.75, 0.80),
    ("default", 10.0, 0.025, 0.030, 0.80, 0.85),
];

/// Per-aggregator benchmark cache keyed by lowercase industry.
///
/// Owned by each [`crate::SignalAggregator`] instance — there is no global
/// cache, so tests get isolation for free. A miss only costs one extra store
/// read.
#[derive(Debug, Default)]
pub(crate) struct BenchmarkCache {
    entries: Mutex<HashMap<String, IndustryBenchmark>>,
}

impl BenchmarkCache {
    pub(crate) async fn get(&self, industry: &str) -> Option<IndustryBenchmark> {
        self.entries.lock().await.get(industry).cloned()
    }

    pub(crate) async fn put(&self, benchmark: IndustryBenchmark) {
        self.entries
            .lock()
            .await
            .insert(benchmark.industry.clone(), benchmark);
    }
}

/// First fallback entry matching the industry, else the global default.
pub(crate) fn fallback_benchmark(industry: &str) -> Option<IndustryBenchmark> {
    FALLBACK_BENCHMARKS
        .iter()
        .find(|(key, ..)| *key == industry)
        .or_else(|| FALLBACK_BENCHMARKS.iter().find(|(key, ..)| *key == "default"))
        .map(|&(_, cpm, ctr, conv, reach, awareness)| {
            IndustryBenchmark::new(
                industry,
                BENCHMARK_FALLBACK_SOURCE,
                cpm,
                ctr,
                conv,
                reach,
                awareness,
            )
        })
}

/// Resolve the benchmark for an industry: cache, then store, then fallback
/// table (persisting the seed best-effort). Never errors outward.
pub(crate) async fn fetch_benchmark(
    cache: &BenchmarkCache,
    pool: &PgPool,
    industry: &str,
) -> Option<IndustryBenchmark> {
    let key = industry.trim().to_lowercase();

    if let Some(hit) = cache.get(&key).await {
        return Some(hit);
    }

    match adwise_db::get_benchmark(pool, &key).await {
        Ok(Some(row)) => {
            let benchmark = IndustryBenchmark::from_row(&row);
            cache.put(benchmark.clone()).await;
            return Some(benchmark);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(industry = %key, error = %e, "benchmark store read failed, using fallback");
            return fallback_benchmark(&key);
        }
    }

    let benchmark = fallback_benchmark(&key)?;
    if let Err(e) = persist(pool, &benchmark).await {
        tracing::warn!(industry = %key, error = %e, "failed to persist fallback benchmark");
    }
    cache.put(benchmark.clone()).await;
    Some(benchmark)
}

/// Refresh the benchmark from the remote source within the client's timeout.
/// On success the value is upserted and re-cached; on any failure the call
/// degrades to [`fetch_benchmark`].
pub(crate) async fn refresh_benchmark_from_source(
    cache: &BenchmarkCache,
    client: &reqwest::Client,
    pool: &PgPool,
    endpoint: &str,
    api_key: Option<&str>,
    industry: &str,
) -> Option<IndustryBenchmark> {
    let key = industry.trim().to_lowercase();

    match fetch_remote_payload(client, endpoint, api_key, &key).await {
        Ok(benchmark) => {
            if let Err(e) = persist(pool, &benchmark).await {
                tracing::warn!(industry = %key, error = %e, "failed to persist refreshed benchmark");
            }
            cache.put(benchmark.clone()).await;
            Some(benchmark)
        }
        Err(e) => {
            tracing::warn!(
                industry = %key,
                endpoint,
                error = %e,
                "benchmark refresh failed, falling back to local resolution"
            );
            fetch_benchmark(cache, pool, &key).await
        }
    }
}

/// Wire shape of the remote benchmark source.
#[derive(Debug, Deserialize)]
struct BenchmarkPayload {
    avg_cpm: f64,
    avg_ctr: f64,
    avg_conv_rate: f64,
    reach_index: f64,
    awareness_index: f64,
}

/// GET `{endpoint}?industry=…[&key=…]` and parse the benchmark payload.
pub(crate) async fn fetch_remote_payload(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: Option<&str>,
    industry: &str,
) -> Result<IndustryBenchmark, SignalError> {
    // Normalise: exactly one trailing slash so query pairs attach to the root.
    let normalised = format!("{}/", endpoint.trim_end_matches('/'));
    let mut url = reqwest::Url::parse(&normalised).map_err(|e| SignalError::Deserialize {
        context: format!("benchmark endpoint '{endpoint}'"),
        source: serde_json::Error::io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            e.to_string(),
        )),
    })?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("industry", industry);
        if let Some(key) = api_key {
            pairs.append_pair("key", key);
        }
    }

    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SignalError::SourceStatus(status.as_u16()));
    }

    let body = response.text().await?;
    let payload: BenchmarkPayload =
        serde_json::from_str(&body).map_err(|source| SignalError::Deserialize {
            context: url.to_string(),
            source,
        })?;

    Ok(IndustryBenchmark::new(
        industry,
        BENCHMARK_REMOTE_SOURCE,
        payload.avg_cpm,
        payload.avg_ctr,
        payload.avg_conv_rate,
        payload.reach_index,
        payload.awareness_index,
    ))
}

async fn persist(pool: &PgPool, benchmark: &IndustryBenchmark) -> Result<(), adwise_db::DbError> {
    adwise_db::upsert_benchmark(
        pool,
        &benchmark.industry,
        &benchmark.source,
        benchmark.avg_cpm,
        benchmark.avg_ctr,
        benchmark.avg_conv_rate,
        benchmark.reach_index,
        benchmark.awareness_index,
    )
    .await
    .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(timeout_ms: u64) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("client")
    }

    #[test]
    fn fallback_matches_known_industry() {
        let b = fallback_benchmark("saas").expect("benchmark");
        assert_eq!(b.industry, "saas");
        assert_eq!(b.source, BENCHMARK_FALLBACK_SOURCE);
        assert!((b.avg_cpm - 22.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fallback_uses_global_default_for_unknown_industry() {
        let b = fallback_benchmark("aerospace").expect("benchmark");
        assert_eq!(b.industry, "aerospace", "keyed under the requested industry");
        assert!((b.avg_cpm - 10.0).abs() < f64::EPSILON, "default metrics");
    }

    #[tokio::test]
    async fn cache_returns_isolated_entries_per_instance() {
        let a = BenchmarkCache::default();
        let b = BenchmarkCache::default();
        a.put(fallback_benchmark("saas").expect("benchmark")).await;
        assert!(a.get("saas").await.is_some());
        assert!(b.get("saas").await.is_none(), "caches are instance-owned");
    }

    #[tokio::test]
    async fn remote_payload_parses_and_clamps_indices() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("industry", "ecommerce"))
            .and(query_param("key", "k-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "avg_cpm": 13.5,
                "avg_ctr": 0.031,
                "avg_conv_rate": 0.044,
                "reach_index": 0.9,
                "awareness_index": 1.6
            })))
            .mount(&server)
            .await;

        let benchmark = fetch_remote_payload(&client(5000), &server.uri(), Some("k-1"), "ecommerce")
            .await
            .expect("payload");
        assert_eq!(benchmark.source, "remote");
        assert!((benchmark.avg_cpm - 13.5).abs() < f64::EPSILON);
        assert!(
            (benchmark.awareness_index - 1.0).abs() < f64::EPSILON,
            "indices above 1 are clamped at ingestion"
        );
    }

    #[tokio::test]
    async fn remote_payload_surfaces_http_status_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = fetch_remote_payload(&client(5000), &server.uri(), None, "saas")
            .await
            .expect_err("should fail");
        assert!(matches!(err, SignalError::SourceStatus(503)));
    }

    #[tokio::test]
    async fn remote_payload_surfaces_malformed_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = fetch_remote_payload(&client(5000), &server.uri(), None, "saas")
            .await
            .expect_err("should fail");
        assert!(matches!(err, SignalError::Deserialize { .. }));
    }

    #[tokio::test]
    async fn remote_payload_times_out_on_slow_source() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(500))
                    .set_body_json(serde_json::json!({})),
            )
            .mount(&server)
            .await;

        let err = fetch_remote_payload(&client(50), &server.uri(), None, "saas")
            .await
            .expect_err("should time out");
        assert!(matches!(err, SignalError::Http(_)));
    }
}
