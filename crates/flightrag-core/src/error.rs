//! Error types for flightrag

use thiserror::Error;

/// Result type alias using FlightRagError
pub type Result<T> = std::result::Result<T, FlightRagError>;

/// Error type alias for convenience
pub type Error = FlightRagError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for flightrag
#[derive(Debug, Error)]
pub enum FlightRagError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Graph store error: {0}")]
    Neo4j(#[from] neo4rs::Error),

    #[error("Graph row error: {0}")]
    Graph(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External service error: {0}")]
    ExternalError(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl FlightRagError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidInput(_) | Self::UnknownModel(_) => {
                exit_codes::INVALID_INPUT
            }
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// Non-success reply from an external HTTP service
    pub fn service_status(service: &str, status: reqwest::StatusCode, body: &str) -> Self {
        let body = body.trim();
        if body.is_empty() {
            Self::ExternalError(format!("{} error (HTTP {})", service, status))
        } else {
            Self::ExternalError(format!("{} error (HTTP {}): {}", service, status, body))
        }
    }
}
