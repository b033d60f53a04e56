//! Question embedding and vector similarity search
//!
//! Journeys carry one precomputed embedding per encoder, each behind its own
//! vector index. A question is embedded with the same encoder and the index
//! is asked for its nearest neighbours.

mod http_embedder;
mod registry;
mod search;

pub use http_embedder::HttpEmbedder;
pub use registry::{EmbedderFactory, EmbedderRegistry};
pub use search::{SearchResult, SimilaritySearcher};

use crate::error::{FlightRagError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Embedding generation trait
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding for single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Sentence encoders with a vector index in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingModel {
    Minilm,
    Mpnet,
    E5Base,
}

impl EmbeddingModel {
    pub const ALL: [EmbeddingModel; 3] = [
        EmbeddingModel::Minilm,
        EmbeddingModel::Mpnet,
        EmbeddingModel::E5Base,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            EmbeddingModel::Minilm => "minilm",
            EmbeddingModel::Mpnet => "mpnet",
            EmbeddingModel::E5Base => "e5_base",
        }
    }

    /// Hugging Face model identifier
    pub fn model_id(&self) -> &'static str {
        match self {
            EmbeddingModel::Minilm => "sentence-transformers/all-MiniLM-L6-v2",
            EmbeddingModel::Mpnet => "sentence-transformers/all-mpnet-base-v2",
            EmbeddingModel::E5Base => "intfloat/multilingual-e5-base",
        }
    }

    pub fn dimensions(&self) -> usize {
        match self {
            EmbeddingModel::Minilm => 384,
            EmbeddingModel::Mpnet | EmbeddingModel::E5Base => 768,
        }
    }

    /// Name of the journey vector index built for this encoder
    pub fn index_name(&self) -> String {
        format!("journey_embedding_{}_index", self.key())
    }
}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EmbeddingModel {
    type Err = FlightRagError;

    fn from_str(s: &str) -> Result<Self> {
        EmbeddingModel::ALL
            .iter()
            .copied()
            .find(|model| model.key() == s)
            .ok_or_else(|| FlightRagError::UnknownModel(format!("embedding model '{}'", s)))
    }
}

/// Scale a vector to unit length; zero vectors are left as they are
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_table() {
        assert_eq!(EmbeddingModel::Minilm.dimensions(), 384);
        assert_eq!(EmbeddingModel::E5Base.dimensions(), 768);
        assert_eq!(
            EmbeddingModel::Mpnet.index_name(),
            "journey_embedding_mpnet_index"
        );
        assert_eq!("e5_base".parse::<EmbeddingModel>().unwrap(), EmbeddingModel::E5Base);
        assert!(matches!(
            "bert".parse::<EmbeddingModel>(),
            Err(FlightRagError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_normalize() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0, 0.0];
        normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }
}
