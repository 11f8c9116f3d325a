use core::result::Result as CoreResult;
use std::io::Error as IoError;

use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for stagehand operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur while building registries or routing tasks.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An agent description document could not be processed.
    #[error("Agent document error: {0}")]
    AgentDoc(String),

    /// A task could not be found in a plan document.
    #[error("Task {task_id} not found in plan {plan_id}")]
    TaskNotFound {
        /// Identifier of the task that was looked up.
        task_id: String,
        /// Identifier of the plan that was searched.
        plan_id: String,
    },
}
