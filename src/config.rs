//! Process-wide configuration
//!
//! An explicit configuration struct constructed once at process start and
//! passed by reference into the completion client and server. Nothing
//! reads environment variables at call time, which keeps the client
//! testable with injected configuration.

use crate::types::{ReasoningEffort, SearchContextSize, TextVerbosity};
use secrecy::SecretString;
use std::str::FromStr;

/// Default deadline for high-effort reasoning calls (5 minutes).
pub const TIMEOUT_HIGH_EFFORT_MS: u64 = 300_000;
/// Default deadline for medium-effort reasoning calls (2 minutes).
pub const TIMEOUT_MEDIUM_EFFORT_MS: u64 = 120_000;
/// Default deadline for everything else (1 minute).
pub const TIMEOUT_DEFAULT_MS: u64 = 60_000;

/// Default model when neither the caller nor the environment names one.
pub const DEFAULT_MODEL: &str = "gpt-5";
/// Default transport retry count.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default sampling temperature for regular models.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the ChatGPT completion client and server.
#[derive(Debug, Clone)]
pub struct ChatGptConfig {
    /// Provider credential. `None` fails validation before any network call.
    pub api_key: Option<SecretString>,
    /// Provider endpoint base URL (no trailing slash).
    pub base_url: String,
    /// Default model identifier.
    pub default_model: String,
    /// Default reasoning effort applied when the caller sends none.
    pub default_effort: Option<ReasoningEffort>,
    /// Default output verbosity applied when the caller sends none.
    pub default_verbosity: Option<TextVerbosity>,
    /// Default web search context size applied when the caller sends none.
    pub default_search_context_size: Option<SearchContextSize>,
    /// Default transport retry count.
    pub default_max_retries: u32,
    /// Shared timeout override; replaces whichever effort bracket applies.
    pub timeout_override_ms: Option<u64>,
}

impl Default for ChatGptConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            default_effort: None,
            default_verbosity: None,
            default_search_context_size: None,
            default_max_retries: DEFAULT_MAX_RETRIES,
            timeout_override_ms: None,
        }
    }
}

impl ChatGptConfig {
    /// Create a configuration with the given credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            ..Default::default()
        }
    }

    /// Build the configuration from the process environment.
    ///
    /// Unparseable enum or numeric values are ignored, matching the
    /// original environment contract.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.is_empty())
                .map(SecretString::from),
            base_url: std::env::var("OPENAI_BASE_URL")
                .ok()
                .filter(|url| !url.is_empty())
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            default_model: std::env::var("OPENAI_DEFAULT_MODEL")
                .ok()
                .filter(|model| !model.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            default_effort: env_parsed("REASONING_EFFORT"),
            default_verbosity: env_parsed("VERBOSITY"),
            default_search_context_size: env_parsed("SEARCH_CONTEXT_SIZE"),
            default_max_retries: std::env::var("OPENAI_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_RETRIES),
            timeout_override_ms: std::env::var("OPENAI_API_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_default_effort(mut self, effort: ReasoningEffort) -> Self {
        self.default_effort = Some(effort);
        self
    }

    pub fn with_timeout_override_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_override_ms = Some(timeout_ms);
        self
    }

    /// Resolve the call deadline for the given effort level.
    ///
    /// The shared `OPENAI_API_TIMEOUT` override replaces whichever bracket
    /// would otherwise apply: 300s for high effort, 120s for medium, 60s
    /// for low/minimal or no effort.
    pub fn timeout_for_effort(&self, effort: Option<ReasoningEffort>) -> u64 {
        if let Some(override_ms) = self.timeout_override_ms {
            return override_ms;
        }
        match effort {
            Some(ReasoningEffort::High) => TIMEOUT_HIGH_EFFORT_MS,
            Some(ReasoningEffort::Medium) => TIMEOUT_MEDIUM_EFFORT_MS,
            _ => TIMEOUT_DEFAULT_MS,
        }
    }
}

/// Decide the call mode for a request.
///
/// An explicit caller choice always wins; otherwise medium and high
/// reasoning effort stream to stay under the transport's single-call
/// deadline.
pub fn should_stream(effort: Option<ReasoningEffort>, forced: Option<bool>) -> bool {
    forced.unwrap_or(matches!(
        effort,
        Some(ReasoningEffort::Medium) | Some(ReasoningEffort::High)
    ))
}

fn env_parsed<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
