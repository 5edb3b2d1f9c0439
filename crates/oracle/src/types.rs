//! Oracle Types
//!
//! Core types for oracle provider interactions.

use serde::{Deserialize, Serialize};

/// A single review request sent to an oracle.
///
/// One request corresponds to exactly one segment of one file; the engine
/// never batches segments into a single call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleRequest {
    /// System prompt establishing the reviewer role and response contract
    pub system_prompt: String,
    /// User prompt carrying the rules and the numbered segment content
    pub user_prompt: String,
    /// Sampling temperature (reviews run cold, typically 0.0)
    pub temperature: f32,
    /// Maximum tokens the oracle may generate
    pub max_tokens: u32,
}

/// Token usage statistics reported by a provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UsageStats {
    /// Number of input/prompt tokens
    pub input_tokens: u32,
    /// Number of output/completion tokens
    pub output_tokens: u32,
}

impl UsageStats {
    /// Total tokens consumed by the call.
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// A complete (non-streaming) oracle response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleResponse {
    /// Raw text content returned by the oracle
    pub content: String,
    /// Model that produced the response
    pub model: String,
    /// Token usage for the call
    pub usage: UsageStats,
}

/// Errors an oracle provider can produce.
#[derive(Debug)]
pub enum OracleError {
    /// Authentication failed (invalid or missing API key)
    AuthenticationFailed { message: String },
    /// Rate limit exceeded
    RateLimited {
        message: String,
        retry_after: Option<u32>,
    },
    /// Invalid request (bad parameters)
    InvalidRequest { message: String },
    /// Server error from the provider
    ServerError {
        message: String,
        status: Option<u16>,
    },
    /// Network/connection error
    NetworkError { message: String },
    /// Response parsing error
    ParseError { message: String },
    /// Provider not available
    ProviderUnavailable { message: String },
    /// Other error
    Other { message: String },
}

impl std::fmt::Display for OracleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleError::AuthenticationFailed { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            OracleError::RateLimited { message, .. } => {
                write!(f, "Rate limited: {}", message)
            }
            OracleError::InvalidRequest { message } => {
                write!(f, "Invalid request: {}", message)
            }
            OracleError::ServerError { message, status } => {
                if let Some(s) = status {
                    write!(f, "Server error ({}): {}", s, message)
                } else {
                    write!(f, "Server error: {}", message)
                }
            }
            OracleError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            OracleError::ParseError { message } => {
                write!(f, "Parse error: {}", message)
            }
            OracleError::ProviderUnavailable { message } => {
                write!(f, "Provider unavailable: {}", message)
            }
            OracleError::Other { message } => {
                write!(f, "Oracle error: {}", message)
            }
        }
    }
}

impl std::error::Error for OracleError {}

/// Result type alias for oracle operations
pub type OracleResult<T> = Result<T, OracleError>;
