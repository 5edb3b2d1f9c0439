//! Scripted Oracle Provider
//!
//! Deterministic provider for tests and offline runs. Responses are keyed
//! by substring patterns matched against the combined prompt, so a test
//! can script different answers (or different latencies) for different
//! segments of the same file.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::provider::OracleProvider;
use crate::types::{OracleError, OracleRequest, OracleResponse, OracleResult, UsageStats};

/// Raw response body returned for an empty review.
const EMPTY_REPORT: &str = r#"{"findings": []}"#;

struct ScriptEntry {
    pattern: String,
    content: String,
    delay: Option<Duration>,
}

/// Oracle provider that replays scripted responses.
pub struct ScriptedOracle {
    entries: Vec<ScriptEntry>,
    default_content: String,
    default_delay: Option<Duration>,
    call_count: AtomicUsize,
    should_fail: bool,
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedOracle {
    /// Create a provider that answers every request with an empty report.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            default_content: EMPTY_REPORT.to_string(),
            default_delay: None,
            call_count: AtomicUsize::new(0),
            should_fail: false,
        }
    }

    /// Create a provider whose every call fails with a server error.
    pub fn failing() -> Self {
        let mut provider = Self::new();
        provider.should_fail = true;
        provider
    }

    /// Script a raw response for prompts containing `pattern`.
    ///
    /// Entries are matched in insertion order; the first match wins.
    pub fn with_response(mut self, pattern: &str, content: &str) -> Self {
        self.entries.push(ScriptEntry {
            pattern: pattern.to_string(),
            content: content.to_string(),
            delay: None,
        });
        self
    }

    /// Script a delayed response for prompts containing `pattern`.
    ///
    /// Used to simulate a hanging oracle call for one specific segment or
    /// file without slowing the rest of a test down.
    pub fn with_delayed_response(mut self, pattern: &str, content: &str, delay: Duration) -> Self {
        self.entries.push(ScriptEntry {
            pattern: pattern.to_string(),
            content: content.to_string(),
            delay: Some(delay),
        });
        self
    }

    /// Replace the default (no pattern matched) response body.
    pub fn with_default_response(mut self, content: &str) -> Self {
        self.default_content = content.to_string();
        self
    }

    /// Delay every call by `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    /// Number of `review` calls made so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn script_for(&self, request: &OracleRequest) -> (String, Option<Duration>) {
        let combined = format!("{}\n{}", request.system_prompt, request.user_prompt);
        for entry in &self.entries {
            if combined.contains(&entry.pattern) {
                return (entry.content.clone(), entry.delay.or(self.default_delay));
            }
        }
        (self.default_content.clone(), self.default_delay)
    }
}

#[async_trait]
impl OracleProvider for ScriptedOracle {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-oracle"
    }

    async fn review(&self, request: OracleRequest) -> OracleResult<OracleResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            return Err(OracleError::ServerError {
                message: "Scripted oracle configured to fail".to_string(),
                status: None,
            });
        }

        let (content, delay) = self.script_for(&request);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(OracleResponse {
            content,
            model: "scripted-oracle".to_string(),
            usage: UsageStats {
                input_tokens: (request.user_prompt.len() / 4) as u32,
                output_tokens: 0,
            },
        })
    }
}
