//! ChatGPT completion client
//!
//! Translates one [`ChatRequest`] into exactly one call to the OpenAI
//! Responses API, in either synchronous or streaming mode. Validation
//! (credential, then model registry) happens before any network activity.
//! Both modes share the same request body except for the `stream` flag.

use crate::config::ChatGptConfig;
use crate::error::{ChatGptError, Result};
use crate::models;
use crate::streaming::{ChatStream, chunk_stream};
use crate::types::{ChatRequest, ChatResponse, SearchContextSize, Usage};
use backoff::ExponentialBackoffBuilder;
use backoff::backoff::Backoff;
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use std::time::Duration;

/// Client for the OpenAI Responses API with an always-enabled web search
/// tool.
#[derive(Clone)]
pub struct ChatGptClient {
    config: ChatGptConfig,
    http_client: reqwest::Client,
}

impl ChatGptClient {
    /// Create a client from process-wide configuration.
    pub fn new(config: ChatGptConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Non-streaming call: one request, one complete response.
    ///
    /// On any transport or provider error the call fails as a whole; no
    /// partial content is returned from this mode.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.validate_request(request)?;

        let body = self.build_request_body(request, false);
        let response = self.send_request(request, &body).await?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ChatGptError::provider_call(format!("invalid provider response: {e}")))?;

        let content = extract_output_text(&payload);
        let usage = payload
            .get("usage")
            .and_then(|u| serde_json::from_value::<Usage>(u.clone()).ok());

        tracing::debug!(
            model = %request.model,
            content_len = content.len(),
            "chat completed"
        );

        Ok(ChatResponse {
            content,
            model: request.model.clone(),
            usage,
        })
    }

    /// Streaming call: one request, a finite stream of text deltas ending
    /// in a single terminal chunk.
    ///
    /// Errors while opening the stream are returned here; errors while
    /// iterating surface as stream items. Chunks already produced before
    /// an error remain valid, but no terminal chunk follows an error.
    pub async fn chat_stream(&self, request: &ChatRequest) -> Result<ChatStream> {
        self.validate_request(request)?;

        let body = self.build_request_body(request, true);
        let response = self.send_request(request, &body).await?;

        Ok(chunk_stream(response))
    }

    /// Reject requests that cannot succeed before touching the network.
    fn validate_request(&self, request: &ChatRequest) -> Result<()> {
        if self.config.api_key.is_none() {
            return Err(ChatGptError::missing_api_key());
        }
        if !models::is_supported_model(&request.model) {
            return Err(ChatGptError::unsupported_model(&request.model));
        }
        Ok(())
    }

    /// HTTP client for one call, honoring the per-call deadline.
    fn request_client(&self, request: &ChatRequest) -> Result<reqwest::Client> {
        match request.timeout_ms {
            Some(timeout_ms) => reqwest::Client::builder()
                .timeout(Duration::from_millis(timeout_ms))
                .build()
                .map_err(|e| {
                    ChatGptError::provider_call(format!("failed to build HTTP client: {e}"))
                }),
            None => Ok(self.http_client.clone()),
        }
    }

    /// Build the Responses API request body.
    ///
    /// The web search tool is always declared; its context size falls
    /// back from the request to the configuration to "medium". Reasoning,
    /// verbosity, and output-token controls are attached only when
    /// present. Temperature is attached only for regular models.
    fn build_request_body(&self, request: &ChatRequest, stream: bool) -> Value {
        let search_context_size = request
            .search_context_size
            .or(self.config.default_search_context_size)
            .unwrap_or(SearchContextSize::Medium);

        let mut body = json!({
            "model": request.model,
            "input": request.prompt,
            "stream": stream,
            "tools": [{
                "type": "web_search",
                "search_context_size": search_context_size.as_str(),
            }],
            "tool_choice": "auto",
            "parallel_tool_calls": true,
        });

        if let Some(system) = &request.system {
            body["instructions"] = json!(system);
        }
        if let Some(effort) = request.effort {
            body["reasoning"] = json!({ "effort": effort.as_str() });
        }
        if let Some(verbosity) = request.verbosity {
            body["text"] = json!({ "verbosity": verbosity.as_str() });
        }
        if let Some(max_tokens) = request.max_tokens {
            body["max_output_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = request.temperature
            && !models::is_reasoning_model(&request.model)
        {
            body["temperature"] = json!(temperature);
        }

        body
    }

    /// Issue the HTTP request, retrying transient transport failures up
    /// to the per-call retry budget.
    ///
    /// Retryable: connection errors, 429, and 5xx responses. Deadline
    /// expiry is terminal for the call.
    async fn send_request(&self, request: &ChatRequest, body: &Value) -> Result<reqwest::Response> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(ChatGptError::missing_api_key)?
            .expose_secret()
            .to_string();

        let client = self.request_client(request)?;
        let url = format!("{}/responses", self.config.base_url);
        let max_retries = request.max_retries.unwrap_or(self.config.default_max_retries);

        let mut backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(1000))
            .with_max_interval(Duration::from_secs(60))
            .with_multiplier(2.0)
            .with_max_elapsed_time(None)
            .build();
        let mut attempt: u32 = 0;

        loop {
            let result = client
                .post(&url)
                .bearer_auth(&api_key)
                .json(body)
                .send()
                .await;

            let error = match result {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let retryable =
                        status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
                    let text = response.text().await.unwrap_or_default();
                    let error = ChatGptError::provider_call(format!(
                        "HTTP error {}: {}",
                        status.as_u16(),
                        text
                    ));
                    if !retryable {
                        return Err(error);
                    }
                    error
                }
                Err(e) if e.is_timeout() => {
                    let deadline = request
                        .timeout_ms
                        .map(|ms| format!(" after {ms}ms"))
                        .unwrap_or_default();
                    return Err(ChatGptError::provider_call(format!(
                        "request timed out{deadline}"
                    )));
                }
                Err(e) if e.is_connect() => ChatGptError::provider_call(e),
                Err(e) => return Err(ChatGptError::provider_call(e)),
            };

            if attempt >= max_retries {
                return Err(error);
            }
            attempt += 1;
            let delay = backoff
                .next_backoff()
                .unwrap_or(Duration::from_secs(1));
            tracing::warn!(
                attempt,
                max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying provider call"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Aggregated output text of a non-streaming Responses API payload.
///
/// The hosted SDKs synthesize a top-level `output_text`; the raw HTTP
/// payload carries the text inside `output[].content[]` items.
fn extract_output_text(payload: &Value) -> String {
    if let Some(text) = payload.get("output_text").and_then(|t| t.as_str()) {
        return text.to_string();
    }

    let Some(items) = payload.get("output").and_then(|o| o.as_array()) else {
        return String::new();
    };

    let mut text = String::new();
    for item in items {
        if item.get("type").and_then(|t| t.as_str()) != Some("message") {
            continue;
        }
        let Some(parts) = item.get("content").and_then(|c| c.as_array()) else {
            continue;
        };
        for part in parts {
            if part.get("type").and_then(|t| t.as_str()) == Some("output_text")
                && let Some(fragment) = part.get("text").and_then(|t| t.as_str())
            {
                text.push_str(fragment);
            }
        }
    }
    text
}
