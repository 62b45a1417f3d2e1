//! MCP server exposing the `ask_chatgpt` tool
//!
//! The orchestration layer: resolves invocation arguments against
//! configuration defaults, derives the call deadline and call mode from
//! the reasoning effort, and delegates to the completion client. In
//! streaming mode it accumulates the chunk sequence back into a single
//! text block, so streaming stays invisible to the MCP caller.

use crate::client::ChatGptClient;
use crate::config::{ChatGptConfig, DEFAULT_TEMPERATURE, should_stream};
use crate::error::ChatGptError;
use crate::types::{ChatRequest, ReasoningEffort, SearchContextSize, TextVerbosity};
use futures_util::StreamExt;
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, tool, tool_handler, tool_router,
};
use serde::Deserialize;

/// Arguments of the `ask_chatgpt` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskChatGptRequest {
    #[schemars(description = "The prompt to send to ChatGPT")]
    pub prompt: String,
    #[schemars(
        description = "The model to use (default: from OPENAI_DEFAULT_MODEL env var or gpt-5). Unless specified by the user, you should not set this model parameter. Supported models: gpt-5, gpt-5-mini, gpt-5-nano, o3, o3-pro, o4-mini, gpt-4.1, gpt-4.1-mini"
    )]
    pub model: Option<String>,
    #[schemars(description = "System prompt to set context and behavior for the AI")]
    pub system: Option<String>,
    #[schemars(
        description = "Temperature for response generation (0-2). Not available for reasoning models (gpt-5, o1, o3, etc.)"
    )]
    pub temperature: Option<f64>,
    #[schemars(
        description = "Reasoning effort level: minimal, low, medium, high (default: from REASONING_EFFORT env var). For reasoning models only."
    )]
    pub effort: Option<ReasoningEffort>,
    #[schemars(
        description = "Output verbosity level: low, medium, high (default: from VERBOSITY env var). For reasoning models only."
    )]
    pub verbosity: Option<TextVerbosity>,
    #[schemars(
        description = "Search context size: low, medium, high (default: from SEARCH_CONTEXT_SIZE env var)."
    )]
    pub search_context_size: Option<SearchContextSize>,
    #[schemars(description = "Maximum number of output tokens")]
    pub max_tokens: Option<u32>,
    #[schemars(
        description = "Maximum number of API retry attempts (default: from OPENAI_MAX_RETRIES env var or 3)"
    )]
    pub max_retries: Option<u32>,
    #[schemars(
        description = "Request timeout in milliseconds. Auto-adjusts based on effort level: high=300s, medium=120s, low/minimal=60s. Can be overridden with OPENAI_API_TIMEOUT env var."
    )]
    pub timeout_ms: Option<u64>,
    #[schemars(
        description = "Force streaming mode to prevent timeouts during long reasoning tasks. Defaults to auto (true for medium/high effort reasoning models)."
    )]
    pub use_streaming: Option<bool>,
}

/// MCP server wrapping the ChatGPT completion client.
#[derive(Clone)]
pub struct ChatGptServer {
    config: ChatGptConfig,
    client: ChatGptClient,
    tool_router: ToolRouter<Self>,
}

/// One fully resolved invocation: the outbound request plus the derived
/// call mode.
#[derive(Debug)]
struct ResolvedInvocation {
    request: ChatRequest,
    stream: bool,
}

/// Resolve tool arguments against configuration defaults.
///
/// Each field resolves explicit argument first, then the configured
/// default, then the literal fallback. The deadline and call mode are
/// derived from the resolved effort unless given explicitly.
fn resolve_invocation(config: &ChatGptConfig, args: AskChatGptRequest) -> ResolvedInvocation {
    let effort = args.effort.or(config.default_effort);
    let timeout_ms = args
        .timeout_ms
        .unwrap_or_else(|| config.timeout_for_effort(effort));
    let stream = should_stream(effort, args.use_streaming);

    let request = ChatRequest {
        prompt: args.prompt,
        model: args.model.unwrap_or_else(|| config.default_model.clone()),
        system: args.system,
        temperature: Some(args.temperature.unwrap_or(DEFAULT_TEMPERATURE)),
        effort,
        verbosity: args.verbosity.or(config.default_verbosity),
        search_context_size: args
            .search_context_size
            .or(config.default_search_context_size),
        max_tokens: args.max_tokens,
        max_retries: Some(args.max_retries.unwrap_or(config.default_max_retries)),
        timeout_ms: Some(timeout_ms),
        stream,
    };

    ResolvedInvocation { request, stream }
}

/// Caller-facing message for a failed call.
///
/// A timeout under high reasoning effort gets an actionable message
/// naming the elapsed deadline and the configuration remedies; everything
/// else is surfaced as-is.
fn caller_message(error: &ChatGptError, effort: Option<ReasoningEffort>, timeout_ms: u64) -> String {
    if error.is_timeout() && effort == Some(ReasoningEffort::High) {
        format!(
            "Request timed out after {timeout_ms}ms. Reasoning models with high effort can take \
             several minutes. Consider increasing OPENAI_API_TIMEOUT environment variable or \
             setting a higher timeoutMs value. Current timeout: {timeout_ms}ms"
        )
    } else {
        error.to_string()
    }
}

#[tool_router]
impl ChatGptServer {
    pub fn new(config: ChatGptConfig) -> Self {
        Self {
            client: ChatGptClient::new(config.clone()),
            config,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Ask ChatGPT a question and get a response. Supports both regular models (with temperature) and reasoning models (with effort/verbosity)."
    )]
    pub async fn ask_chatgpt(
        &self,
        Parameters(args): Parameters<AskChatGptRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let ResolvedInvocation { request, stream } = resolve_invocation(&self.config, args);
        let effort = request.effort;
        let timeout_ms = request.timeout_ms.unwrap_or_default();

        let text = if stream {
            self.ask_streaming(&request)
                .await
                .map_err(|e| error_data(&e, effort, timeout_ms))?
        } else {
            self.client
                .chat(&request)
                .await
                .map_err(|e| error_data(&e, effort, timeout_ms))?
                .content
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Drain a chunk stream, concatenating the non-terminal contents.
    async fn ask_streaming(&self, request: &ChatRequest) -> crate::error::Result<String> {
        tracing::debug!(model = %request.model, "starting streaming request");

        let mut stream = self.client.chat_stream(request).await?;
        let mut accumulated = String::new();
        let mut chunk_count: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;

            if chunk.done {
                tracing::info!(
                    chunk_count,
                    content_len = accumulated.len(),
                    "streaming completed"
                );
                break;
            }

            if !chunk.content.is_empty() {
                accumulated.push_str(&chunk.content);
                chunk_count += 1;
                if chunk_count % 10 == 0 {
                    tracing::debug!(
                        chunk_count,
                        content_len = accumulated.len(),
                        "streaming progress"
                    );
                }
            }
        }

        Ok(accumulated)
    }
}

fn error_data(error: &ChatGptError, effort: Option<ReasoningEffort>, timeout_ms: u64) -> ErrorData {
    tracing::error!(error = %error, "ask_chatgpt failed");
    ErrorData::internal_error(caller_message(error, effort, timeout_ms), None)
}

#[tool_handler]
impl ServerHandler for ChatGptServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "chatgpt-websearch".into(),
                version: "1.0.0".into(),
                ..Default::default()
            },
            instructions: Some(
                "Delegates prompts to ChatGPT with always-on web search. Use the ask_chatgpt tool."
                    .to_string(),
            ),
        }
    }
}
