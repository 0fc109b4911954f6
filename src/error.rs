//! # Consumer Error Types
//!
//! Unified error handling for orchestration queries and service consumption.
//!
//! Only conditions that leave the caller with nothing to work with are raised.
//! A non-200 orchestrator status, an empty orchestration result and a non-2xx
//! provider status are logged and degrade to an empty sequence, an unbound
//! rule or a returned response respectively.

use thiserror::Error;

/// Consumer operation result type
pub type ConsumerResult<T> = Result<T, ConsumerError>;

/// Error types for consumer operations
#[derive(Debug, Error)]
pub enum ConsumerError {
    #[error("Orchestration request failed for service {service_definition}: {source}")]
    OrchestrationTransport {
        service_definition: String,
        #[source]
        source: Box<ConsumerError>,
    },

    #[error("Rule '{rule}' is not registered")]
    UnknownRule { rule: String },

    #[error("Rule '{rule}' does not have a corresponding service")]
    UnboundService { rule: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode orchestration response: {0}")]
    Decode(String),

    #[error("JSON serialization/deserialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid HTTP method: '{0}'")]
    InvalidMethod(String),

    #[error("Failed to load credentials from {path}: {reason}")]
    Credentials { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConsumerError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid method error for a rejected verb name
    pub fn invalid_method(method: impl Into<String>) -> Self {
        Self::InvalidMethod(method.into())
    }

    /// Create a decode error for a malformed orchestrator payload
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Wrap a failure that happened while talking to the orchestrator
    pub fn orchestration_transport(
        service_definition: Option<&str>,
        source: ConsumerError,
    ) -> Self {
        Self::OrchestrationTransport {
            service_definition: service_definition.unwrap_or("<stored>").to_string(),
            source: Box::new(source),
        }
    }

    /// Check if error is recoverable (worth retrying by the caller)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            ConsumerError::Transport(e) => e.is_timeout() || e.is_connect(),
            ConsumerError::OrchestrationTransport { source, .. } => source.is_recoverable(),
            // Re-orchestrating may bind the rule
            ConsumerError::UnboundService { .. } => true,
            _ => false,
        }
    }
}

impl From<::config::ConfigError> for ConsumerError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
