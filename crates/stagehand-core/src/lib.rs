//! Core types, errors, and configuration for the stagehand routing system.
//!
//! This crate provides the shared vocabulary used by the registry builder,
//! the agent router, and the director: agent descriptors, the in-memory
//! registry, task metadata, and the director configuration.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        reason = "Allow for tests"
    )
)]

/// Configuration types and TOML persistence.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Core data types for agents, registries, and task metadata.
pub mod types;

pub use config::{DirectorConfig, PlanConfig, RegistryConfig, RouterConfig, ThresholdConfig};
pub use error::{Error, Result};
pub use types::{AgentDescriptor, Availability, ContextLimits, DEFAULT_MODEL, Registry, TaskMetadata};
