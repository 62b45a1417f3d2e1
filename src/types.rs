//! Core request, response, and stream chunk types

use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Reasoning effort level for reasoning models
///
/// Higher effort trades latency for answer quality. Only meaningful for
/// models in the reasoning subset of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    /// Minimal reasoning effort
    Minimal,
    /// Low reasoning effort
    Low,
    /// Medium reasoning effort
    Medium,
    /// High reasoning effort
    High,
}

impl ReasoningEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for ReasoningEffort {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimal" => Ok(Self::Minimal),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(()),
        }
    }
}

/// Output verbosity level for reasoning models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TextVerbosity {
    /// Low verbosity
    Low,
    /// Medium verbosity
    Medium,
    /// High verbosity
    High,
}

impl TextVerbosity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for TextVerbosity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(()),
        }
    }
}

/// Context window budget for the always-enabled web search tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchContextSize {
    /// Low context budget
    Low,
    /// Medium context budget (provider default)
    Medium,
    /// High context budget
    High,
}

impl SearchContextSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for SearchContextSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(()),
        }
    }
}

/// One normalized chat request
///
/// Constructed fresh per tool invocation from caller arguments plus
/// configuration defaults, and discarded once the call completes.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// The prompt to send
    pub prompt: String,
    /// Model identifier; must be in the registry's supported set
    pub model: String,
    /// Optional system prompt
    pub system: Option<String>,
    /// Sampling temperature; attached only for regular models
    pub temperature: Option<f64>,
    /// Reasoning effort; attached only when present
    pub effort: Option<ReasoningEffort>,
    /// Output verbosity; attached only when present
    pub verbosity: Option<TextVerbosity>,
    /// Web search context size; falls back to config then "medium"
    pub search_context_size: Option<SearchContextSize>,
    /// Cap on generated output tokens
    pub max_tokens: Option<u32>,
    /// Transport-level retry count for this call only
    pub max_retries: Option<u32>,
    /// Transport-level deadline for this call only, in milliseconds
    pub timeout_ms: Option<u64>,
    /// Whether to use the streaming call mode
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            system: None,
            temperature: None,
            effort: None,
            verbosity: None,
            search_context_size: None,
            max_tokens: None,
            max_retries: None,
            timeout_ms: None,
            stream: false,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_effort(mut self, effort: ReasoningEffort) -> Self {
        self.effort = Some(effort);
        self
    }

    pub fn with_verbosity(mut self, verbosity: TextVerbosity) -> Self {
        self.verbosity = Some(verbosity);
        self
    }

    pub fn with_search_context_size(mut self, size: SearchContextSize) -> Self {
        self.search_context_size = Some(size);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the input
    #[serde(default)]
    pub input_tokens: u32,
    /// Tokens generated in the output
    #[serde(default)]
    pub output_tokens: u32,
    /// Total tokens, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u32>,
}

/// Final response from a non-streaming call
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// Aggregated output text (empty string if the provider returned none)
    pub content: String,
    /// Echo of the requested model
    pub model: String,
    /// Token accounting, when reported
    pub usage: Option<Usage>,
}

/// One element of a streaming response
///
/// The stream always ends with exactly one terminal chunk
/// (`done == true`, empty content) when it completes normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    /// Incremental text fragment; empty on the terminal chunk
    pub content: String,
    /// Whether this is the terminal chunk
    pub done: bool,
}

impl StreamChunk {
    /// A content-bearing delta chunk.
    pub fn delta(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: false,
        }
    }

    /// The synthetic terminal chunk.
    pub fn done() -> Self {
        Self {
            content: String::new(),
            done: true,
        }
    }
}
