//! Single best-effort model call with timing

use super::{find_model, model_keys, ChatMessage, GenerationParams, InvocationStyle, LLMClient};
use crate::error::{FlightRagError, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Answer plus metadata for one model call
#[derive(Debug, Clone, Serialize)]
pub struct ModelResponse {
    /// Model key from the table
    pub model: String,
    /// Full model identifier, `None` for an unknown key
    pub model_name: Option<String>,
    pub answer: Option<String>,
    pub success: bool,
    /// Wall-clock seconds spent on the call
    pub latency: f64,
    pub error: Option<String>,
}

/// Sends prompts to hosted models by key
pub struct LlmIntegration {
    client: Arc<dyn LLMClient>,
    params: GenerationParams,
}

impl LlmIntegration {
    pub fn new(client: Arc<dyn LLMClient>, params: GenerationParams) -> Self {
        Self { client, params }
    }

    /// Query one model; failures become an unsuccessful response
    pub async fn query(&self, prompt: &str, model_key: &str) -> ModelResponse {
        let start = Instant::now();

        let Some(spec) = find_model(model_key) else {
            let error = FlightRagError::UnknownModel(format!(
                "'{}' (choose from: {})",
                model_key,
                model_keys().join(", ")
            ));
            tracing::warn!("{}", error);
            return ModelResponse {
                model: model_key.to_string(),
                model_name: None,
                answer: None,
                success: false,
                latency: 0.0,
                error: Some(error.to_string()),
            };
        };

        let outcome = self.generate(spec.name, spec.style, prompt).await;
        let latency = start.elapsed().as_secs_f64();

        match outcome {
            Ok(answer) => {
                tracing::info!(model = spec.key, latency, "Response generated");
                ModelResponse {
                    model: spec.key.to_string(),
                    model_name: Some(spec.name.to_string()),
                    answer: Some(answer),
                    success: true,
                    latency,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(model = spec.key, latency, "Generation failed: {}", e);
                ModelResponse {
                    model: spec.key.to_string(),
                    model_name: Some(spec.name.to_string()),
                    answer: None,
                    success: false,
                    latency,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn generate(&self, model: &str, style: InvocationStyle, prompt: &str) -> Result<String> {
        match style {
            InvocationStyle::Chat => {
                self.client
                    .chat_completion(model, vec![ChatMessage::user(prompt)], &self.params)
                    .await
            }
            InvocationStyle::Text => self.client.text_completion(model, prompt, &self.params).await,
        }
    }
}
