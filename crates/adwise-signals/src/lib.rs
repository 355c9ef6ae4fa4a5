//! Signal acquisition for the recommendation pipeline.
//!
//! Everything in this crate is best-effort: a slow or broken upstream source
//! degrades to a documented default and never aborts a run. The deterministic
//! scoring stages downstream only ever see the value types in [`types`].

mod aggregator;
mod benchmark;
mod error;
mod platforms;
mod social;
mod types;

pub use aggregator::{SignalAggregator, SignalConfig};
pub use benchmark::BENCHMARK_FALLBACK_SOURCE;
pub use error::SignalError;
pub use platforms::{fetch_platform_signals, PLATFORM_IDS};
pub use social::{FollowerEstimator, HashFollowerEstimator};
pub use types::{IndustryBenchmark, PlatformSignal, SignalBundle, SocialSignal};
