//! Stdio entry point for the ChatGPT WebSearch MCP server.

use chatgpt_websearch_mcp::{ChatGptConfig, ChatGptServer};
use rmcp::{ServiceExt, transport::stdio};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the MCP protocol; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ChatGptConfig::from_env();
    if config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; every call will fail validation");
    }

    let server = ChatGptServer::new(config);
    tracing::info!("ChatGPT WebSearch MCP server running on stdio");

    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
