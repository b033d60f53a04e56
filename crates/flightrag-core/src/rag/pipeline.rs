//! End-to-end question answering
//!
//! classify → extract → structured query → similarity search → combine →
//! prompt → generate. Stages run one after another; retrieval and generation
//! failures are recorded in the outcome and never abort the question.

use super::{CombinedContext, PromptBuilder, ResultCombiner};
use crate::config::{Config, RetrievalConfig};
use crate::embeddings::{EmbedderRegistry, EmbeddingModel, SearchResult, SimilaritySearcher};
use crate::error::Result;
use crate::graph::{GraphStore, Neo4jStore};
use crate::llm::{GenerationParams, InferenceClient, LLMClient, LlmIntegration, ModelResponse};
use crate::preprocess::{classify_intent, extract_entities_with, EntitySet, Intent};
use crate::retrieval::{QueryExecutor, QueryResult};
use chrono::Local;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Context text used when neither retrieval path ran
pub const NO_DATA: &str = "No data found.";

/// Long-lived handles shared by every question
#[derive(Clone)]
pub struct ServiceContext {
    pub graph: Arc<dyn GraphStore>,
    pub embedders: Arc<EmbedderRegistry>,
    pub llm: Arc<dyn LLMClient>,
}

impl ServiceContext {
    pub fn new(
        graph: Arc<dyn GraphStore>,
        embedders: Arc<EmbedderRegistry>,
        llm: Arc<dyn LLMClient>,
    ) -> Self {
        Self {
            graph,
            embedders,
            llm,
        }
    }

    /// Connect to the graph store and build the service clients
    pub async fn connect(config: &Config) -> Result<Self> {
        let graph = Neo4jStore::connect(&config.graph).await?;
        let embedders = EmbedderRegistry::from_config(&config.embedding)?;
        let llm = InferenceClient::new(&config.llm)?;

        Ok(Self::new(
            Arc::new(graph),
            Arc::new(embedders),
            Arc::new(llm),
        ))
    }
}

/// Per-question switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOptions {
    /// Model key; the configured default when unset
    pub model: Option<String>,
    /// Encoder for semantic retrieval; the registry default when unset
    pub embedding_model: Option<EmbeddingModel>,
    pub use_structured: bool,
    pub use_semantic: bool,
}

impl Default for AnswerOptions {
    fn default() -> Self {
        Self {
            model: None,
            embedding_model: None,
            use_structured: true,
            use_semantic: true,
        }
    }
}

/// Every intermediate artifact of one answered question
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub question: String,
    pub intent: Intent,
    pub entities: EntitySet,
    pub structured: Option<QueryResult>,
    pub semantic: Option<SearchResult>,
    /// Present only when both retrieval paths ran
    pub combined: Option<CombinedContext>,
    pub context: String,
    pub prompt: String,
    pub response: ModelResponse,
    pub answer: Option<String>,
    /// Whether generation succeeded
    pub success: bool,
}

/// Sequences the stages for each question
pub struct GraphRagPipeline {
    executor: QueryExecutor,
    searcher: SimilaritySearcher,
    combiner: ResultCombiner,
    prompts: PromptBuilder,
    llm: LlmIntegration,
    retrieval: RetrievalConfig,
    default_model: String,
    default_embedding: EmbeddingModel,
}

impl GraphRagPipeline {
    pub fn new(services: &ServiceContext, config: &Config) -> Self {
        Self {
            executor: QueryExecutor::new(services.graph.clone(), &config.retrieval),
            searcher: SimilaritySearcher::new(services.graph.clone(), services.embedders.clone()),
            combiner: ResultCombiner::new(config.retrieval.max_per_source),
            prompts: PromptBuilder::default(),
            llm: LlmIntegration::new(services.llm.clone(), GenerationParams::from(&config.llm)),
            retrieval: config.retrieval.clone(),
            default_model: config.llm.default_model.clone(),
            default_embedding: services.embedders.default_model(),
        }
    }

    pub fn with_prompt_builder(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    /// Answer one question; always returns a complete outcome
    pub async fn answer(&self, question: &str, options: &AnswerOptions) -> PipelineOutcome {
        let start = Instant::now();
        let model = options.model.as_deref().unwrap_or(&self.default_model);

        let intent = classify_intent(question);
        let entities = extract_entities_with(
            question,
            Local::now().date_naive(),
            self.retrieval.superlative_default_limit,
        );
        tracing::info!(%intent, "Classified question");
        tracing::debug!(?entities, "Extracted entities");

        let structured = if options.use_structured {
            Some(self.executor.execute(intent, &entities).await)
        } else {
            None
        };

        let semantic = if options.use_semantic {
            let embedding_model = options.embedding_model.unwrap_or(self.default_embedding);
            Some(
                self.searcher
                    .search(question, embedding_model, self.retrieval.semantic_top_k)
                    .await,
            )
        } else {
            None
        };

        let (combined, context) = match (&structured, &semantic) {
            (Some(s), Some(e)) => {
                let combined = self.combiner.combine(s, e, &entities);
                tracing::info!(unique = combined.total_count, "Combined retrieval results");
                let context = combined.formatted.clone();
                (Some(combined), context)
            }
            (Some(s), None) => (None, s.format_for_llm()),
            (None, Some(e)) => (None, e.format_for_llm()),
            (None, None) => (None, NO_DATA.to_string()),
        };

        let prompt = self.prompts.build(question, &context);
        let response = self.llm.query(&prompt, model).await;

        tracing::info!(
            model,
            success = response.success,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Question answered"
        );

        PipelineOutcome {
            question: question.to_string(),
            intent,
            entities,
            structured,
            semantic,
            combined,
            context,
            prompt,
            answer: response.answer.clone(),
            success: response.success,
            response,
        }
    }
}
