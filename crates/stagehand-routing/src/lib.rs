//! Task routing and orchestration.
//!
//! [`AgentRouter`] matches task metadata against a registry of agents and
//! produces a [`RoutingDecision`]; [`AgentDirector`] wraps the router,
//! turns confidence into an actionable [`Direction`], and keeps a task
//! history for pattern analysis.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        reason = "Allow for tests"
    )
)]

/// Director, task history, and routing-pattern analysis.
pub mod director;
/// Task metadata inference from free-text descriptions.
pub mod inference;
/// Agent selection, scoring, and context optimization.
pub mod router;
/// Routing decision and direction types.
pub mod types;

pub use director::{AgentDirector, Recommendation, RecommendationKind, RoutingPatterns};
pub use inference::TaskInference;
pub use router::AgentRouter;
pub use types::{
    ContextOptimization, ContextStrategy, Decision, Direction, FallbackOption, FallbackReason,
    GapAnalysis, Reasoning, RoutingDecision, TaskHistoryEntry, TaskKind,
};
