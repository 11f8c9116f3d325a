//! Agent registry construction from markdown description documents.
//!
//! A registry build enumerates every `.md` document in the configured
//! agents directory, splits each into a `---`-delimited metadata header and
//! a free-text body, and combines declared metadata with keyword inference
//! over the body to produce an [`stagehand_core::AgentDescriptor`] per
//! agent. Every build produces a fresh in-memory registry; nothing is
//! cached or persisted.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        reason = "Allow for tests"
    )
)]

/// Registry builder and the registry-source seam.
pub mod builder;
/// Metadata header parsing for agent documents.
pub mod frontmatter;
/// Ordered keyword tables driving domain and capability inference.
pub mod keywords;

pub use builder::{RegistryBuilder, RegistrySource, StaticRegistry};
pub use frontmatter::Document;
pub use keywords::{ExpertiseRule, KeywordTable};
