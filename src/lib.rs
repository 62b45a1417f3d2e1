//! # chatgpt-websearch-mcp
//!
//! An MCP server exposing a single tool, `ask_chatgpt`, that delegates a
//! prompt to the OpenAI Responses API with an always-enabled web search
//! tool and returns the final answer as one text block.
//!
//! Reasoning models (gpt-5 family, o3, o4-mini) accept effort/verbosity
//! controls; regular models (gpt-4.1 family) accept temperature. Medium
//! and high reasoning effort default to the streaming call mode so long
//! generations stay under the transport's single-call deadline; the
//! streamed deltas are accumulated server-side, so streaming is invisible
//! to the MCP caller.
//!
//! ```rust,no_run
//! use chatgpt_websearch_mcp::{ChatGptClient, ChatGptConfig, ChatRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChatGptClient::new(ChatGptConfig::from_env());
//!     let response = client.chat(&ChatRequest::new("What is 2+2?", "gpt-4.1")).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod streaming;
pub mod types;

pub use client::ChatGptClient;
pub use config::{ChatGptConfig, should_stream};
pub use error::{ChatGptError, Result};
pub use models::{is_reasoning_model, is_supported_model, supported_models};
pub use server::{AskChatGptRequest, ChatGptServer};
pub use streaming::ChatStream;
pub use types::{
    ChatRequest, ChatResponse, ReasoningEffort, SearchContextSize, StreamChunk, TextVerbosity,
    Usage,
};
