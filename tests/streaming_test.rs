//! Streaming tests against a stub provider
//!
//! SSE bodies follow the Responses API event stream format:
//! https://platform.openai.com/docs/api-reference/responses-streaming

use chatgpt_websearch_mcp::{
    ChatGptClient, ChatGptConfig, ChatGptError, ChatGptServer, ChatRequest,
};
use futures_util::StreamExt;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::RawContent;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_event(event_type: &str, data: serde_json::Value) -> String {
    format!("event: {event_type}\ndata: {data}\n\n")
}

fn delta_event(text: &str) -> String {
    sse_event(
        "response.output_text.delta",
        json!({ "type": "response.output_text.delta", "delta": text }),
    )
}

fn completed_event() -> String {
    sse_event(
        "response.completed",
        json!({ "type": "response.completed", "response": { "id": "resp_1" } }),
    )
}

fn stub_client(server: &MockServer) -> ChatGptClient {
    ChatGptClient::new(ChatGptConfig::new("test-api-key").with_base_url(server.uri()))
}

async fn mount_sse(server: &MockServer, body: String) {
    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(body_partial_json(json!({ "stream": true })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_raw(body, "text/event-stream"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn stream_yields_deltas_then_exactly_one_terminal_chunk() {
    let server = MockServer::start().await;
    let body = format!(
        "{}{}{}{}",
        delta_event("A"),
        delta_event("B"),
        delta_event("C"),
        completed_event()
    );
    mount_sse(&server, body).await;

    let client = stub_client(&server);
    let request = ChatRequest::new("Explain X", "gpt-5")
        .with_effort(chatgpt_websearch_mcp::ReasoningEffort::High)
        .with_stream(true);
    let mut stream = client.chat_stream(&request).await.unwrap();

    let mut chunks = Vec::new();
    while let Some(item) = stream.next().await {
        chunks.push(item.unwrap());
    }

    let expected: Vec<(&str, bool)> = vec![("A", false), ("B", false), ("C", false), ("", true)];
    let got: Vec<(&str, bool)> = chunks.iter().map(|c| (c.content.as_str(), c.done)).collect();
    assert_eq!(got, expected);
}

#[tokio::test]
async fn non_delta_events_are_dropped_silently() {
    let server = MockServer::start().await;
    let body = format!(
        "{}{}{}{}{}",
        sse_event("response.created", json!({ "type": "response.created" })),
        delta_event("only"),
        sse_event(
            "response.reasoning_summary_text.delta",
            json!({ "type": "response.reasoning_summary_text.delta", "delta": "hidden" })
        ),
        sse_event(
            "response.output_item.done",
            json!({ "type": "response.output_item.done", "item": {} })
        ),
        completed_event()
    );
    mount_sse(&server, body).await;

    let client = stub_client(&server);
    let mut stream = client
        .chat_stream(&ChatRequest::new("q", "gpt-5").with_stream(true))
        .await
        .unwrap();

    let mut contents = Vec::new();
    while let Some(item) = stream.next().await {
        let chunk = item.unwrap();
        if !chunk.done {
            contents.push(chunk.content);
        }
    }
    assert_eq!(contents, vec!["only"]);
}

#[tokio::test]
async fn accumulated_stream_matches_non_streaming_content() {
    let server = MockServer::start().await;

    let body = format!(
        "{}{}{}",
        delta_event("The answer"),
        delta_event(" is 4"),
        completed_event()
    );
    mount_sse(&server, body).await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(body_partial_json(json!({ "stream": false })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "output_text": "The answer is 4" })),
        )
        .mount(&server)
        .await;

    let client = stub_client(&server);

    let request = ChatRequest::new("What is 2+2?", "gpt-5");
    let complete = client.chat(&request).await.unwrap();

    let mut stream = client
        .chat_stream(&request.clone().with_stream(true))
        .await
        .unwrap();
    let mut accumulated = String::new();
    let mut saw_terminal = false;
    while let Some(item) = stream.next().await {
        let chunk = item.unwrap();
        if chunk.done {
            saw_terminal = true;
        } else {
            accumulated.push_str(&chunk.content);
        }
    }

    assert!(saw_terminal);
    assert_eq!(accumulated, complete.content);
}

#[tokio::test]
async fn aborted_stream_has_no_terminal_chunk() {
    let server = MockServer::start().await;
    // One valid delta, then a malformed payload.
    let body = format!("{}data: {{not-json\n\n", delta_event("A"));
    mount_sse(&server, body).await;

    let client = stub_client(&server);
    let mut stream = client
        .chat_stream(&ChatRequest::new("q", "gpt-5").with_stream(true))
        .await
        .unwrap();

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.content, "A");
    assert!(!first.done);

    let err = stream.next().await.unwrap().unwrap_err();
    assert!(matches!(err, ChatGptError::ProviderCall(_)));

    // The sequence ends after the error; no terminal chunk is produced.
    assert!(stream.next().await.is_none());
}

fn tool_args(value: serde_json::Value) -> chatgpt_websearch_mcp::AskChatGptRequest {
    serde_json::from_value(value).unwrap()
}

fn result_text(result: &rmcp::model::CallToolResult) -> &str {
    match &result.content[0].raw {
        RawContent::Text(t) => t.text.as_str(),
        other => panic!("expected text content, got {other:?}"),
    }
}

#[tokio::test]
async fn orchestration_accumulates_streamed_chunks_into_one_answer() {
    let server = MockServer::start().await;
    let body = format!(
        "{}{}{}{}",
        delta_event("A"),
        delta_event("B"),
        delta_event("C"),
        completed_event()
    );
    mount_sse(&server, body).await;

    let config = ChatGptConfig::new("test-api-key").with_base_url(server.uri());
    let mcp = ChatGptServer::new(config);

    // High effort selects streaming mode without an explicit flag.
    let result = mcp
        .ask_chatgpt(Parameters(tool_args(json!({
            "prompt": "Explain X",
            "model": "gpt-5",
            "effort": "high"
        }))))
        .await
        .unwrap();

    assert_eq!(result_text(&result), "ABC");

    let sent = &server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&sent.body).unwrap();
    assert_eq!(body["stream"], true);
    assert_eq!(body["reasoning"]["effort"], "high");
}

#[tokio::test]
async fn orchestration_uses_synchronous_mode_for_low_effort() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(body_partial_json(json!({ "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "output_text": "sync" })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ChatGptConfig::new("test-api-key").with_base_url(server.uri());
    let mcp = ChatGptServer::new(config);

    let result = mcp
        .ask_chatgpt(Parameters(tool_args(json!({
            "prompt": "quick one",
            "model": "gpt-4.1",
            "effort": "low"
        }))))
        .await
        .unwrap();

    assert_eq!(result_text(&result), "sync");
}

#[tokio::test]
async fn high_effort_timeout_surfaces_actionable_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_raw(delta_event("late"), "text/event-stream")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = ChatGptConfig::new("test-api-key").with_base_url(server.uri());
    let mcp = ChatGptServer::new(config);

    let err = mcp
        .ask_chatgpt(Parameters(tool_args(json!({
            "prompt": "slow question",
            "model": "gpt-5",
            "effort": "high",
            "timeoutMs": 100,
            "maxRetries": 0
        }))))
        .await
        .unwrap_err();

    assert!(err.message.contains("Request timed out after 100ms"));
    assert!(err.message.contains("OPENAI_API_TIMEOUT"));
}

#[tokio::test]
async fn validation_errors_surface_through_the_tool_boundary() {
    let server = MockServer::start().await;
    let config = ChatGptConfig::new("test-api-key").with_base_url(server.uri());
    let mcp = ChatGptServer::new(config);

    let err = mcp
        .ask_chatgpt(Parameters(tool_args(json!({
            "prompt": "hi",
            "model": "gpt-3.5-turbo"
        }))))
        .await
        .unwrap_err();

    assert!(err.message.contains("Unsupported model \"gpt-3.5-turbo\""));
    assert!(err.message.contains("gpt-5"));
}
