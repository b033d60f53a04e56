//! Lazily created, process-lifetime embedders keyed by encoder

use super::{Embedder, EmbeddingModel, HttpEmbedder};
use crate::config::EmbeddingServiceConfig;
use crate::error::{FlightRagError, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Builds the embedder for an encoder on first use
pub type EmbedderFactory = Box<dyn Fn(EmbeddingModel) -> Result<Arc<dyn Embedder>> + Send + Sync>;

/// One embedder per encoder, created on first request and then reused
pub struct EmbedderRegistry {
    factory: EmbedderFactory,
    default_model: EmbeddingModel,
    loaded: RwLock<HashMap<EmbeddingModel, Arc<dyn Embedder>>>,
}

impl EmbedderRegistry {
    /// Registry of HTTP embedders sharing one service configuration
    pub fn from_config(config: &EmbeddingServiceConfig) -> Result<Self> {
        let default_model = config.default_model.parse()?;
        let config = config.clone();
        let factory: EmbedderFactory = Box::new(move |model| {
            let embedder = HttpEmbedder::new(&config, model)?;
            Ok(Arc::new(embedder) as Arc<dyn Embedder>)
        });
        Ok(Self::with_factory(default_model, factory))
    }

    pub fn with_factory(default_model: EmbeddingModel, factory: EmbedderFactory) -> Self {
        Self {
            factory,
            default_model,
            loaded: RwLock::new(HashMap::new()),
        }
    }

    pub fn default_model(&self) -> EmbeddingModel {
        self.default_model
    }

    /// Get the embedder for an encoder, creating it if needed
    pub fn get(&self, model: EmbeddingModel) -> Result<Arc<dyn Embedder>> {
        if let Some(embedder) = self
            .loaded
            .read()
            .map_err(|_| lock_poisoned())?
            .get(&model)
        {
            return Ok(embedder.clone());
        }

        let mut loaded = self.loaded.write().map_err(|_| lock_poisoned())?;
        if let Some(embedder) = loaded.get(&model) {
            return Ok(embedder.clone());
        }

        tracing::info!("Loading embedding model: {}", model.model_id());
        let embedder = (self.factory)(model)?;
        loaded.insert(model, embedder.clone());
        Ok(embedder)
    }

    /// Number of encoders created so far
    pub fn loaded_count(&self) -> usize {
        self.loaded.read().map(|loaded| loaded.len()).unwrap_or(0)
    }
}

fn lock_poisoned() -> FlightRagError {
    FlightRagError::Embedding("embedder registry lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ConstantEmbedder(EmbeddingModel);

    #[async_trait]
    impl Embedder for ConstantEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0; self.0.dimensions()])
        }

        fn dimensions(&self) -> usize {
            self.0.dimensions()
        }

        fn model_name(&self) -> &str {
            self.0.model_id()
        }
    }

    #[test]
    fn test_embedders_are_created_once() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = created.clone();
        let registry = EmbedderRegistry::with_factory(
            EmbeddingModel::Minilm,
            Box::new(move |model| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(ConstantEmbedder(model)) as Arc<dyn Embedder>)
            }),
        );

        let first = registry.get(EmbeddingModel::Minilm).unwrap();
        let again = registry.get(EmbeddingModel::Minilm).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        registry.get(EmbeddingModel::Mpnet).unwrap();

        assert_eq!(created.load(Ordering::SeqCst), 2);
        assert_eq!(registry.loaded_count(), 2);
    }

    #[test]
    fn test_factory_error_is_not_cached() {
        let registry = EmbedderRegistry::with_factory(
            EmbeddingModel::Minilm,
            Box::new(|_| Err(FlightRagError::Embedding("offline".to_string()))),
        );
        assert!(registry.get(EmbeddingModel::Minilm).is_err());
        assert_eq!(registry.loaded_count(), 0);
    }

    #[test]
    fn test_from_config_rejects_unknown_default() {
        let config = EmbeddingServiceConfig {
            default_model: "word2vec".to_string(),
            ..Default::default()
        };
        assert!(EmbedderRegistry::from_config(&config).is_err());
    }
}
