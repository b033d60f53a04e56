//! HTTP-based embedder using an external embedding service

use super::{normalize, Embedder, EmbeddingModel};
use crate::config::EmbeddingServiceConfig;
use crate::error::{FlightRagError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Embedder that calls an OpenAI-compatible `/v1/embeddings` endpoint
pub struct HttpEmbedder {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: EmbeddingModel,
}

impl HttpEmbedder {
    /// Create from configuration for one encoder
    pub fn new(config: &EmbeddingServiceConfig, model: EmbeddingModel) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model,
        })
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

/// First returned vector, checked against the encoder's width and unit-scaled
fn into_vector(response: EmbedResponse, model: EmbeddingModel) -> Result<Vec<f32>> {
    let mut embedding = response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| FlightRagError::Embedding("No embedding returned".to_string()))?;

    if embedding.len() != model.dimensions() {
        return Err(FlightRagError::Embedding(format!(
            "{} returned {} dimensions, expected {}",
            model.model_id(),
            embedding.len(),
            model.dimensions()
        )));
    }

    normalize(&mut embedding);
    Ok(embedding)
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: self.model.model_id(),
            input: vec![text],
        };

        let url = format!("{}/v1/embeddings", self.base_url);
        let mut req = self.http_client.post(&url).json(&request);
        if let Some(ref api_key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FlightRagError::service_status("Embedding service", status, &body));
        }

        let embed_response: EmbedResponse = response.json().await?;
        into_vector(embed_response, self.model)
    }

    fn dimensions(&self) -> usize {
        self.model.dimensions()
    }

    fn model_name(&self) -> &str {
        self.model.model_id()
    }
}
