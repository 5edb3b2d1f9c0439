//! Oracle Provider Trait
//!
//! Defines the common interface for all oracle providers.

use async_trait::async_trait;

use crate::types::{OracleError, OracleRequest, OracleResponse, OracleResult};

/// Trait that all oracle providers must implement.
///
/// The engine treats the oracle as an injected capability: it is slow,
/// may hang, and may return malformed output. Callers are responsible for
/// bounding a call with their own deadline; a provider only promises to
/// issue exactly one call per `review` invocation and never to retry on
/// its own.
#[async_trait]
pub trait OracleProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Send one review request and get a complete response.
    async fn review(&self, request: OracleRequest) -> OracleResult<OracleResponse>;

    /// Check if the provider is reachable and configured.
    ///
    /// For API providers this validates that credentials are present.
    async fn health_check(&self) -> OracleResult<()> {
        Ok(())
    }
}

/// Helper function to create an error for a missing API key
pub fn missing_api_key_error(provider: &str) -> OracleError {
    OracleError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Helper function to map HTTP error status codes to oracle errors
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> OracleError {
    match status {
        401 => OracleError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => OracleError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        429 => OracleError::RateLimited {
            message: body.to_string(),
            retry_after: None,
        },
        400 => OracleError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => OracleError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => OracleError::Other {
            message: format!("{}: HTTP {}: {}", provider, status, body),
        },
    }
}
