//! Error types for hoken-academy

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("No API key configured (set GEMINI_API_KEY or `hoken config --set-api-key`)")]
    MissingApiKey,
}

/// Errors raised while talking to the generative model
#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Model returned no usable content")]
    EmptyResponse,

    #[error("Response does not match the expected schema: {0}")]
    Schema(String),

    #[error("Failed to decode inline payload: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("AI service error: {0}")]
    Ai(#[from] AiError),

    #[error("Policy not found: {0}")]
    PolicyNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Policy {policy_number} is not active (status: {status})")]
    PolicyNotActive {
        policy_number: String,
        status: String,
    },

    #[error("No proposal to sign; run a simulation first")]
    ProposalMissing,
}

pub type Result<T> = std::result::Result<T, Error>;
