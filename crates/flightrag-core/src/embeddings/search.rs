//! Semantic retrieval through the graph's vector indexes

use super::{EmbedderRegistry, EmbeddingModel};
use crate::error::Result;
use crate::graph::{GraphStore, JourneyRecord, ParamValue, Statement};
use crate::retrieval::JOURNEY_COLUMNS;
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;

const VECTOR_QUERY: &str = "CALL db.index.vector.queryNodes($index_name, $top_k, $embedding)
YIELD node AS j, score
OPTIONAL MATCH (p:Passenger)-[:TOOK]->(j)
OPTIONAL MATCH (j)-[:ON]->(f:Flight)
OPTIONAL MATCH (f)-[:DEPARTS_FROM]->(dep:Airport)
OPTIONAL MATCH (f)-[:ARRIVES_AT]->(arr:Airport)";

/// Nearest-neighbour journeys for a question; failures are carried in `error`
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub model: EmbeddingModel,
    pub index_name: String,
    pub records: Vec<JourneyRecord>,
    pub count: usize,
    pub error: Option<String>,
}

impl SearchResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Render a semantic-only context block
    pub fn format_for_llm(&self) -> String {
        if let Some(ref error) = self.error {
            return format!("Error during similarity search: {}", error);
        }
        if self.count == 0 {
            return "No similar journeys found in the knowledge graph.".to_string();
        }

        let mut out = format!(
            "Found {} similar journeys for query: '{}'\n\n",
            self.count, self.query
        );
        for (i, record) in self.records.iter().enumerate() {
            let na = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_else(|| "N/A".into());
            let _ = writeln!(
                out,
                "Result {} (similarity: {:.3}):",
                i + 1,
                record.score.unwrap_or(0.0)
            );
            let _ = writeln!(out, "  - Journey ID: {}", record.feedback_id);
            let _ = writeln!(
                out,
                "  - Class: {}",
                record.passenger_class.as_deref().unwrap_or("unknown")
            );
            let _ = writeln!(out, "  - Food satisfaction: {}/5", na(record.food_satisfaction_score));
            let _ = writeln!(out, "  - Arrival delay: {} minutes", na(record.arrival_delay_minutes));
            let _ = writeln!(out, "  - Distance: {} miles", na(record.actual_flown_miles));
            let _ = writeln!(out, "  - Legs: {}\n", na(record.number_of_legs));
        }
        out.trim_end().to_string()
    }
}

/// Embeds a question and queries the matching vector index
pub struct SimilaritySearcher {
    store: Arc<dyn GraphStore>,
    embedders: Arc<EmbedderRegistry>,
}

impl SimilaritySearcher {
    pub fn new(store: Arc<dyn GraphStore>, embedders: Arc<EmbedderRegistry>) -> Self {
        Self { store, embedders }
    }

    /// Statement for a top-k lookup with an already embedded question
    pub fn prepare(model: EmbeddingModel, embedding: Vec<f32>, top_k: u32) -> Statement {
        Statement::new(format!(
            "{}\n{},\n       score\nORDER BY score DESC\nLIMIT $top_k",
            VECTOR_QUERY, JOURNEY_COLUMNS
        ))
        .param("index_name", model.index_name())
        .param("top_k", ParamValue::Int(i64::from(top_k)))
        .param("embedding", embedding)
    }

    /// Top-k journeys by cosine similarity; never fails past this boundary
    pub async fn search(&self, query: &str, model: EmbeddingModel, top_k: u32) -> SearchResult {
        let start = Instant::now();
        let mut result = SearchResult {
            query: query.to_string(),
            model,
            index_name: model.index_name(),
            records: Vec::new(),
            count: 0,
            error: None,
        };

        match self.nearest(query, model, top_k).await {
            Ok(records) => {
                result.count = records.len();
                result.records = records;
                tracing::info!(
                    model = %model,
                    count = result.count,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Similarity search complete"
                );
            }
            Err(e) => {
                tracing::warn!(model = %model, "Similarity search failed: {}", e);
                result.error = Some(e.to_string());
            }
        }
        result
    }

    async fn nearest(&self, query: &str, model: EmbeddingModel, top_k: u32) -> Result<Vec<JourneyRecord>> {
        let embedder = self.embedders.get(model)?;
        let embedding = embedder.embed(query).await?;
        tracing::debug!(dimensions = embedding.len(), "Embedded question");

        let statement = Self::prepare(model, embedding, top_k);
        let mut records = self.store.journeys(&statement).await?;

        records.sort_by(|a, b| {
            b.score
                .unwrap_or(f64::MIN)
                .total_cmp(&a.score.unwrap_or(f64::MIN))
        });
        records.truncate(top_k as usize);
        Ok(records)
    }
}
