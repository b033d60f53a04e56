//! LLM integration
//!
//! Provides:
//! - The static table of hosted models
//! - An OpenAI-compatible HTTP client for chat and text completion
//! - A best-effort query wrapper that never propagates failures

mod client;
mod integration;
mod models;

pub use client::{ChatMessage, GenerationParams, InferenceClient, LLMClient};
pub use integration::{LlmIntegration, ModelResponse};
pub use models::{
    find_model, model_keys, InvocationStyle, ModelSpec, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
    MODELS,
};
