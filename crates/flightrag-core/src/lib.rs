//! Flightrag Core Library
//!
//! Graph-RAG question answering over an airline passenger-survey knowledge
//! graph.
//!
//! # Features
//! - Rule-based intent classification and entity extraction
//! - Intent-specific Cypher templates with optional entity filters
//! - Vector-index similarity search with per-encoder indexes
//! - Deduplicating result combination with listing and statistics layouts
//! - Persona-driven prompts and hosted LLM generation

pub mod config;
pub mod embeddings;
pub mod error;
pub mod graph;
pub mod llm;
pub mod preprocess;
pub mod rag;
pub mod retrieval;

pub use config::{Config, EmbeddingServiceConfig, GraphConfig, LLMServiceConfig, RetrievalConfig};
pub use embeddings::{
    Embedder, EmbedderRegistry, EmbeddingModel, HttpEmbedder, SearchResult, SimilaritySearcher,
};
pub use error::{Error, FlightRagError, Result};
pub use graph::{GraphStore, JourneyRecord, Neo4jStore, Provenance, Statement, StatisticsRecord};
pub use llm::{
    ChatMessage, GenerationParams, InferenceClient, LLMClient, LlmIntegration, ModelResponse,
};
pub use preprocess::{
    classify_intent, extract_entities, EntitySet, Intent, SortAttribute, SortOrder,
};
pub use rag::{
    AnswerOptions, CombinedContext, GraphRagPipeline, Persona, PipelineOutcome, PromptBuilder,
    ResultCombiner, ServiceContext,
};
pub use retrieval::{QueryExecutor, QueryResult};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "flightrag";
