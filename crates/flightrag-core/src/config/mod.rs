//! Configuration management

use crate::error::{FlightRagError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Graph store connection
    #[serde(default)]
    pub graph: GraphConfig,

    /// Hosted LLM inference service
    #[serde(default)]
    pub llm: LLMServiceConfig,

    /// Embedding service used to embed questions
    #[serde(default)]
    pub embedding: EmbeddingServiceConfig,

    /// Retrieval limits
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Neo4j connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Connection URI, e.g. `neo4j://127.0.0.1:7687`
    #[serde(default = "default_graph_uri")]
    pub uri: String,

    #[serde(default = "default_graph_username")]
    pub username: String,

    #[serde(default = "default_graph_password")]
    pub password: String,

    /// Database name (server default when unset)
    #[serde(default)]
    pub database: Option<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: default_graph_uri(),
            username: default_graph_username(),
            password: default_graph_password(),
            database: std::env::var("FLIGHTRAG_NEO4J_DATABASE").ok(),
        }
    }
}

fn default_graph_uri() -> String {
    std::env::var("FLIGHTRAG_NEO4J_URI").unwrap_or_else(|_| "neo4j://127.0.0.1:7687".to_string())
}

fn default_graph_username() -> String {
    std::env::var("FLIGHTRAG_NEO4J_USERNAME").unwrap_or_else(|_| "neo4j".to_string())
}

fn default_graph_password() -> String {
    std::env::var("FLIGHTRAG_NEO4J_PASSWORD").unwrap_or_default()
}

/// LLM service configuration for hosted inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    /// Base URL of an OpenAI-compatible inference API
    #[serde(default = "default_llm_url")]
    pub url: String,

    /// API token (HuggingFace token for the default router)
    #[serde(default = "default_api_token")]
    pub api_token: Option<String>,

    /// Model key from the model table used when a question names none
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            url: default_llm_url(),
            api_token: default_api_token(),
            default_model: default_model(),
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_llm_url() -> String {
    std::env::var("FLIGHTRAG_LLM_URL")
        .unwrap_or_else(|_| "https://router.huggingface.co".to_string())
}

fn default_api_token() -> Option<String> {
    std::env::var("FLIGHTRAG_HF_TOKEN")
        .or_else(|_| std::env::var("HF_TOKEN"))
        .ok()
}

fn default_model() -> String {
    std::env::var("FLIGHTRAG_DEFAULT_MODEL").unwrap_or_else(|_| "qwen".to_string())
}

fn default_timeout() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    512
}

fn default_temperature() -> f32 {
    0.7
}

/// Embedding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingServiceConfig {
    /// Base URL of an OpenAI-compatible `/v1/embeddings` service
    #[serde(default = "default_embedding_url")]
    pub url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Embedding model key (`minilm`, `mpnet`, `e5_base`)
    #[serde(default = "default_embedding_model")]
    pub default_model: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingServiceConfig {
    fn default() -> Self {
        Self {
            url: default_embedding_url(),
            api_key: std::env::var("FLIGHTRAG_EMBEDDING_API_KEY").ok(),
            default_model: default_embedding_model(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_embedding_url() -> String {
    std::env::var("FLIGHTRAG_EMBEDDING_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

fn default_embedding_model() -> String {
    std::env::var("FLIGHTRAG_EMBEDDING_MODEL").unwrap_or_else(|_| "minilm".to_string())
}

/// Result limits for the two retrieval paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Structured query limit when the question names none
    #[serde(default = "default_structured_limit")]
    pub structured_limit: u32,

    /// Nearest neighbours requested from the vector index
    #[serde(default = "default_semantic_top_k")]
    pub semantic_top_k: u32,

    /// Records kept per source before merging
    #[serde(default = "default_max_per_source")]
    pub max_per_source: usize,

    /// Limit applied to superlative questions without an explicit count
    #[serde(default = "default_superlative_limit")]
    pub superlative_default_limit: u32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            structured_limit: default_structured_limit(),
            semantic_top_k: default_semantic_top_k(),
            max_per_source: default_max_per_source(),
            superlative_default_limit: default_superlative_limit(),
        }
    }
}

fn default_structured_limit() -> u32 {
    20
}

fn default_semantic_top_k() -> u32 {
    5
}

fn default_max_per_source() -> usize {
    10
}

fn default_superlative_limit() -> u32 {
    crate::preprocess::DEFAULT_SUPERLATIVE_LIMIT
}

impl Config {
    /// Load config from `$FLIGHTRAG_CONFIG` or the default path
    pub fn load() -> Result<Self> {
        let path = std::env::var("FLIGHTRAG_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        Self::load_from(&path)
    }

    /// Load config from a YAML file, falling back to defaults when it is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Write the config as YAML, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Read a legacy `KEY=VALUE` file (`URI`, `USERNAME`, `PASSWORD`, `HF_TOKEN`)
    ///
    /// Keys not present keep their defaults.
    pub fn from_key_value_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let pairs = parse_key_values(&content);

        let mut config = Config::default();
        if let Some(uri) = pairs.get("URI") {
            config.graph.uri = uri.clone();
        }
        if let Some(username) = pairs.get("USERNAME") {
            config.graph.username = username.clone();
        }
        if let Some(password) = pairs.get("PASSWORD") {
            config.graph.password = password.clone();
        }
        if let Some(token) = pairs.get("HF_TOKEN") {
            config.llm.api_token = Some(token.clone());
        }

        if config.graph.uri.trim().is_empty() {
            return Err(FlightRagError::Config(format!(
                "{}: URI must not be empty",
                path.display()
            )));
        }
        Ok(config)
    }

    /// Copy of this config with secrets masked, for display
    pub fn redacted(&self) -> Self {
        let mut shown = self.clone();
        if !shown.graph.password.is_empty() {
            shown.graph.password = "********".to_string();
        }
        if shown.llm.api_token.is_some() {
            shown.llm.api_token = Some("********".to_string());
        }
        if shown.embedding.api_key.is_some() {
            shown.embedding.api_key = Some("********".to_string());
        }
        shown
    }
}

fn parse_key_values(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}
