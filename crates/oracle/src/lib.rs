//! Vigil Oracle - provider abstraction
//!
//! Defines the oracle provider trait and implementations:
//! - `HttpOracle`: OpenAI-compatible chat-completions endpoint
//! - `ScriptedOracle`: deterministic provider for tests and offline runs
//!
//! The oracle is an untrusted collaborator: calls may be slow, hang, fail,
//! or return malformed output. Providers never retry or enforce deadlines
//! themselves; the analysis engine bounds every call with its own timeout.

pub mod http;
pub mod provider;
pub mod scripted;
pub mod types;

pub use http::{HttpOracle, HttpOracleConfig};
pub use provider::{missing_api_key_error, parse_http_error, OracleProvider};
pub use scripted::ScriptedOracle;
pub use types::{OracleError, OracleRequest, OracleResponse, OracleResult, UsageStats};
