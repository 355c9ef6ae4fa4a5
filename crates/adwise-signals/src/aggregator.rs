//! The signal aggregator: owns the benchmark cache and HTTP clients, and
//! fans out the three signal classes for one run.

use std::collections::HashMap;
use std::time::Duration;

use sqlx::PgPool;

use adwise_core::{AnalyticsSnapshot, AppConfig, EntityProfile};

use crate::benchmark::{fetch_benchmark, refresh_benchmark_from_source, BenchmarkCache};
use crate::error::SignalError;
use crate::platforms::fetch_platform_signals;
use crate::social::{discover_handles, resolve_signals, FollowerEstimator, HashFollowerEstimator};
use crate::types::{IndustryBenchmark, SignalBundle, SocialSignal};

/// Tunables for signal acquisition.
#[derive(Debug, Clone)]
pub struct SignalConfig {
    pub benchmark_source_url: Option<String>,
    pub benchmark_api_key: Option<String>,
    pub benchmark_timeout_secs: u64,
    pub social_scan_timeout_ms: u64,
    pub http_user_agent: String,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            benchmark_source_url: None,
            benchmark_api_key: None,
            benchmark_timeout_secs: 5,
            social_scan_timeout_ms: 3500,
            http_user_agent: "adwise/0.1 (channel-recommendations)".to_string(),
        }
    }
}

impl SignalConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            benchmark_source_url: config.benchmark_source_url.clone(),
            benchmark_api_key: config.benchmark_api_key.clone(),
            benchmark_timeout_secs: config.benchmark_timeout_secs,
            social_scan_timeout_ms: config.social_scan_timeout_ms,
            http_user_agent: config.http_user_agent.clone(),
        }
    }
}

/// Fetches and derives the three signal classes: industry benchmark,
/// social-audience overlap, and per-platform ad estimates.
///
/// Each instance owns its benchmark cache, so independent aggregators (and
/// tests) never share state.
pub struct SignalAggregator {
    config: SignalConfig,
    cache: BenchmarkCache,
    benchmark_client: reqwest::Client,
    scan_client: reqwest::Client,
    estimator: Box<dyn FollowerEstimator>,
}

impl SignalAggregator {
    /// Build an aggregator with the default (deterministic) follower
    /// estimator.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Http`] if an HTTP client cannot be constructed.
    pub fn new(config: SignalConfig) -> Result<Self, SignalError> {
        Self::with_estimator(config, Box::new(HashFollowerEstimator))
    }

    /// Build an aggregator with a custom follower estimator (tests inject
    /// fixed providers here).
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Http`] if an HTTP client cannot be constructed.
    pub fn with_estimator(
        config: SignalConfig,
        estimator: Box<dyn FollowerEstimator>,
    ) -> Result<Self, SignalError> {
        let benchmark_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.benchmark_timeout_secs))
            .user_agent(config.http_user_agent.clone())
            .build()?;
        let scan_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.social_scan_timeout_ms))
            .user_agent(config.http_user_agent.clone())
            .build()?;

        Ok(Self {
            config,
            cache: BenchmarkCache::default(),
            benchmark_client,
            scan_client,
            estimator,
        })
    }

    /// Resolve the benchmark for an industry (cache → store → fallback).
    /// Never fails; `None` only if no fallback exists.
    pub async fn fetch_benchmark(
        &self,
        pool: &PgPool,
        industry: &str,
    ) -> Option<IndustryBenchmark> {
        fetch_benchmark(&self.cache, pool, industry).await
    }

    /// Refresh one industry's benchmark from the configured remote source,
    /// falling back to local resolution on any failure. A missing source
    /// configuration degrades straight to [`Self::fetch_benchmark`].
    pub async fn refresh_benchmark(
        &self,
        pool: &PgPool,
        industry: &str,
    ) -> Option<IndustryBenchmark> {
        let Some(endpoint) = self.config.benchmark_source_url.as_deref() else {
            tracing::debug!(industry, "no benchmark source configured, resolving locally");
            return self.fetch_benchmark(pool, industry).await;
        };
        refresh_benchmark_from_source(
            &self.cache,
            &self.benchmark_client,
            pool,
            endpoint,
            self.config.benchmark_api_key.as_deref(),
            industry,
        )
        .await
    }

    /// Scan the entity's website for social handles and resolve follower
    /// estimates. Explicit profiles win over discovered handles. Any failure
    /// yields an empty signal set.
    pub async fn fetch_social_signals(
        &self,
        website: Option<&str>,
        explicit_profiles: &HashMap<String, String>,
    ) -> HashMap<String, SocialSignal> {
        let discovered = match website {
            Some(url) if !url.trim().is_empty() => match self.scan_website(url).await {
                Ok(html) => discover_handles(&html),
                Err(e) => {
                    tracing::warn!(website = url, error = %e, "website scan failed");
                    HashMap::new()
                }
            },
            _ => HashMap::new(),
        };

        resolve_signals(discovered, explicit_profiles, self.estimator.as_ref())
    }

    /// Fetch all three signal classes concurrently for one run.
    ///
    /// Each sub-fetch degrades to a safe default on its own, so the fan-in
    /// cannot stall or fail.
    pub async fn fetch_all(
        &self,
        pool: &PgPool,
        profile: &EntityProfile,
        analytics: &AnalyticsSnapshot,
    ) -> SignalBundle {
        let (benchmark, social_signals, platform_signals) = tokio::join!(
            self.fetch_benchmark(pool, &profile.industry),
            self.fetch_social_signals(profile.website.as_deref(), &profile.social_profiles),
            fetch_platform_signals(profile, analytics),
        );

        SignalBundle {
            benchmark,
            social_signals,
            platform_signals,
        }
    }

    async fn scan_website(&self, url: &str) -> Result<String, SignalError> {
        let response = self.scan_client.get(url).send().await?;
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }
}
