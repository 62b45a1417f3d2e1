//! Model registry
//!
//! A fixed classification of the model identifiers this server accepts.
//! Reasoning models take effort/verbosity controls; regular models take
//! temperature. The registry never changes at runtime.

/// Models that accept `reasoning.effort` and `text.verbosity` controls.
pub const REASONING_MODELS: &[&str] = &[
    "gpt-5",
    "gpt-5-mini",
    "gpt-5-nano",
    "o3",
    "o3-pro",
    "o4-mini",
];

/// Models that accept `temperature`.
pub const REGULAR_MODELS: &[&str] = &["gpt-4.1", "gpt-4.1-mini"];

/// All supported model identifiers, reasoning models first.
pub fn supported_models() -> impl Iterator<Item = &'static str> {
    REASONING_MODELS.iter().chain(REGULAR_MODELS).copied()
}

/// Comma-separated supported model list, used in schema text and errors.
pub fn supported_models_list() -> String {
    supported_models().collect::<Vec<_>>().join(", ")
}

/// Whether the identifier belongs to the supported set.
pub fn is_supported_model(model: &str) -> bool {
    supported_models().any(|m| m == model)
}

/// Whether the identifier belongs to the reasoning subset.
///
/// Performs no support check; callers should confirm support first.
pub fn is_reasoning_model(model: &str) -> bool {
    REASONING_MODELS.contains(&model)
}
