//! HTTP client for hosted inference (Hugging Face router, vLLM, OpenAI, etc.)

use crate::config::LLMServiceConfig;
use crate::error::{FlightRagError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Trait for LLM service clients
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate chat completion
    async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        params: &GenerationParams,
    ) -> Result<String>;

    /// Generate a raw text completion
    async fn text_completion(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String>;
}

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: super::DEFAULT_MAX_TOKENS,
            temperature: super::DEFAULT_TEMPERATURE,
        }
    }
}

impl From<&LLMServiceConfig> for GenerationParams {
    fn from(config: &LLMServiceConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// OpenAI-compatible inference client
pub struct InferenceClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl InferenceClient {
    /// Create new client from configuration
    pub fn new(config: &LLMServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    async fn post<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http_client.post(&url).json(request);

        if let Some(ref token) = self.api_token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let response = req.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FlightRagError::service_status("LLM service", status, &body));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl LLMClient for InferenceClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        params: &GenerationParams,
    ) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }

        let request = ChatRequest {
            model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let chat_response: ChatResponse = self.post("/v1/chat/completions", &request).await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| FlightRagError::Llm("No response from LLM".to_string()))
    }

    async fn text_completion(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String> {
        #[derive(Serialize)]
        struct CompletionRequest<'a> {
            model: &'a str,
            prompt: &'a str,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct CompletionResponse {
            choices: Vec<CompletionChoice>,
        }

        #[derive(Deserialize)]
        struct CompletionChoice {
            text: String,
        }

        let request = CompletionRequest {
            model,
            prompt,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let completion: CompletionResponse = self.post("/v1/completions", &request).await?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| FlightRagError::Llm("No completion from LLM".to_string()))
    }
}
