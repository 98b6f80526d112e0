//! # Agent Errors
//!
//! Never leave the crate's public entry points: detection and rule fetch
//! log them and fall back (next detection source, or an empty rule set).

use thiserror::Error;

/// Failures inside the injection agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Transport, timeout or body decode failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// A detection source produced nothing usable.
    #[error("No country from {source_name}: {reason}")]
    NoCountry { source_name: String, reason: String },

    /// Bad configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;
