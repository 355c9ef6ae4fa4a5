//! The recommendation engine: deterministic scoring, allocation, funnel
//! projection, and narrative generation, sequenced by the orchestrator.
//!
//! Every stage is a pure function over plain value structs; the only I/O in
//! this crate lives in [`recommend::Recommender`], which loads inputs,
//! fans out signal acquisition, and persists one immutable row per run.

pub mod allocate;
pub mod error;
pub mod narrative;
pub mod project;
pub mod recommend;
pub mod score;

pub use allocate::{allocate_budget, BudgetAllocation, BudgetSplit};
pub use error::EngineError;
pub use narrative::compose_narrative;
pub use project::{project_outcomes, FunnelEstimate, OutcomeProjection, DEFAULT_SALES_CONVERSION};
pub use recommend::{Recommender, RecommendationBundle, REUSE_WINDOW_MINUTES};
pub use score::{score_channels, ChannelScore, ScoreBreakdown, DEFAULT_AFFINITY};
