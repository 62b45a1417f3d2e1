//! Error types for the ChatGPT completion client and server

use thiserror::Error;

/// Errors surfaced by the completion client and the tool boundary.
#[derive(Error, Debug)]
pub enum ChatGptError {
    /// Process-wide configuration is unusable (missing credential).
    /// Raised before any network activity.
    #[error("{0}")]
    Configuration(String),

    /// The requested model is not in the registry.
    #[error("Unsupported model \"{model}\". Supported models are: {supported}")]
    UnsupportedModel { model: String, supported: String },

    /// Any failure from the provider call or its event stream,
    /// including transport timeouts.
    #[error("Failed to call ChatGPT: {0}")]
    ProviderCall(String),
}

impl ChatGptError {
    /// Missing-credential error with the canonical message.
    pub fn missing_api_key() -> Self {
        Self::Configuration("OPENAI_API_KEY environment variable is not set".to_string())
    }

    /// Unsupported-model error carrying the full supported list.
    pub fn unsupported_model(model: impl Into<String>) -> Self {
        Self::UnsupportedModel {
            model: model.into(),
            supported: crate::models::supported_models_list(),
        }
    }

    /// Provider-call error wrapping the original message.
    pub fn provider_call(message: impl std::fmt::Display) -> Self {
        Self::ProviderCall(message.to_string())
    }

    /// Whether this error looks like a transport timeout.
    ///
    /// Matched on the message text since the underlying error arrives
    /// stringified from reqwest.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::ProviderCall(message) => {
                let message = message.to_ascii_lowercase();
                message.contains("timeout") || message.contains("timed out")
            }
            _ => false,
        }
    }
}

/// Result type for completion client operations.
pub type Result<T> = std::result::Result<T, ChatGptError>;
