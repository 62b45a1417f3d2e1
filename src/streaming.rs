//! Streaming support for the Responses API
//!
//! Converts the provider's SSE event sequence into a finite, single-pass
//! stream of [`StreamChunk`]s. Only `response.output_text.delta` events
//! carry consumable content; every other event type is ignored. When the
//! provider closes the sequence normally, exactly one terminal chunk
//! (`done == true`) is emitted. A transport or parse error ends the
//! stream with an error and no terminal chunk, so consumers can tell a
//! completed stream from an aborted one.

use crate::error::{ChatGptError, Result};
use crate::types::StreamChunk;
use async_stream::try_stream;
use eventsource_stream::Eventsource;
use futures::Stream;
use futures_util::StreamExt;
use serde::Deserialize;
use std::pin::Pin;

/// A finite, non-restartable stream of chunks.
///
/// Dropping the stream cancels the underlying network read.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

/// The only Responses SSE event type whose payload becomes chunk content.
const OUTPUT_TEXT_DELTA: &str = "response.output_text.delta";

/// Typed view of a Responses API stream event payload.
#[derive(Debug, Deserialize)]
struct ResponsesStreamEvent {
    #[serde(rename = "type")]
    event_type: String,
    delta: Option<String>,
}

/// Extract the text delta from one SSE data payload.
///
/// Returns `Ok(None)` for event types that carry no output text.
pub(crate) fn delta_from_event(data: &str) -> Result<Option<String>> {
    let event: ResponsesStreamEvent = serde_json::from_str(data)
        .map_err(|e| ChatGptError::provider_call(format!("invalid provider event: {e}")))?;

    if event.event_type == OUTPUT_TEXT_DELTA {
        Ok(Some(event.delta.unwrap_or_default()))
    } else {
        tracing::trace!(event_type = %event.event_type, "ignoring non-delta provider event");
        Ok(None)
    }
}

/// Turn a successful streaming HTTP response into a [`ChatStream`].
pub(crate) fn chunk_stream(response: reqwest::Response) -> ChatStream {
    let byte_stream = response.bytes_stream();

    Box::pin(try_stream! {
        let mut events = byte_stream.eventsource();

        while let Some(event) = events.next().await {
            let event = event.map_err(ChatGptError::provider_call)?;

            let data = event.data.trim();
            if data.is_empty() {
                continue;
            }
            // The Responses API closes the stream after response.completed,
            // but tolerate the chat-completions style [DONE] marker too.
            if data == "[DONE]" {
                break;
            }

            if let Some(delta) = delta_from_event(data)? {
                yield StreamChunk::delta(delta);
            }
        }

        yield StreamChunk::done();
    })
}
