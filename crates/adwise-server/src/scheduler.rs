//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the daily
//! benchmark refresh job.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use adwise_signals::{SignalAggregator, SignalConfig};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process. Dropping it shuts down all scheduled jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    config: Arc<adwise_core::AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_benchmark_refresh_job(&scheduler, pool, &config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the daily benchmark refresh at 04:00 UTC (`0 0 4 * * *`).
///
/// For every distinct entity industry the job re-pulls the remote benchmark;
/// each per-industry failure degrades to local resolution inside the
/// aggregator and never stops the sweep.
async fn register_benchmark_refresh_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: &adwise_core::AppConfig,
) -> Result<(), JobSchedulerError> {
    let aggregator = match SignalAggregator::new(SignalConfig::from_app_config(config)) {
        Ok(a) => Arc::new(a),
        Err(e) => {
            tracing::error!(error = %e, "scheduler: failed to build signal aggregator, skipping benchmark job");
            return Ok(());
        }
    };
    let pool = Arc::new(pool);

    let job = Job::new_async("0 0 4 * * *", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let aggregator = Arc::clone(&aggregator);

        Box::pin(async move {
            tracing::info!("scheduler: starting daily benchmark refresh");
            run_benchmark_refresh(&pool, &aggregator).await;
            tracing::info!("scheduler: daily benchmark refresh complete");
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

async fn run_benchmark_refresh(pool: &PgPool, aggregator: &SignalAggregator) {
    let industries = match adwise_db::list_distinct_industries(pool).await {
        Ok(i) => i,
        Err(e) => {
            tracing::error!(error = %e, "scheduler: failed to list entity industries");
            return;
        }
    };

    if industries.is_empty() {
        tracing::info!("scheduler: no entities yet; skipping benchmark refresh");
        return;
    }

    for industry in &industries {
        match aggregator.refresh_benchmark(pool, industry).await {
            Some(benchmark) => tracing::info!(
                industry = %industry,
                source = %benchmark.source,
                "scheduler: benchmark refreshed"
            ),
            None => tracing::warn!(industry = %industry, "scheduler: no benchmark resolved"),
        }
    }
}
