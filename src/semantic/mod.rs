//! Semantic engine: skill validation, categorization, and fuzzy matching
//!
//! One `SemanticEngine` is constructed at startup (the embedding model is
//! expensive to load) and passed by mutable reference to every consumer.
//! The validator, classifier, and matcher each live in their own module as
//! additional `impl` blocks on the engine.

pub mod anchors;
pub mod classifier;
pub mod matcher;
pub mod validator;

use crate::config::Config;
use crate::embedding::{cosine_similarity, EmbeddingEngine, TextEmbedder};
use crate::error::Result;
use anchors::AnchorRegistry;

pub use matcher::{MatchMethod, MatchRecord};

/// Embedding-backed semantic engine with pre-embedded anchors.
pub struct SemanticEngine {
    embeddings: EmbeddingEngine,
    anchors: AnchorRegistry,
}

impl SemanticEngine {
    /// Build an engine from an injected embedder (tests use a stub here).
    pub fn new(embedder: Box<dyn TextEmbedder>, config: &Config) -> Result<Self> {
        let mut embeddings = EmbeddingEngine::new(embedder);
        let anchors = AnchorRegistry::build(&mut embeddings, &config.anchors)?;
        Ok(Self {
            embeddings,
            anchors,
        })
    }

    /// Build an engine backed by the configured Model2Vec model.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut embeddings = EmbeddingEngine::from_config(config)?;
        let anchors = AnchorRegistry::build(&mut embeddings, &config.anchors)?;
        Ok(Self {
            embeddings,
            anchors,
        })
    }

    /// Semantic similarity between two texts, in [-1, 1]. Symmetric; not a
    /// metric distance, so callers must not assume transitivity.
    pub fn similarity(&mut self, text_a: &str, text_b: &str) -> Result<f32> {
        let emb_a = self.embeddings.embed(text_a);
        let emb_b = self.embeddings.embed(text_b);
        cosine_similarity(&emb_a, &emb_b)
    }

    pub(crate) fn embeddings_mut(&mut self) -> &mut EmbeddingEngine {
        &mut self.embeddings
    }

    pub(crate) fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    /// Borrow both halves at once; needed when anchor vectors are compared
    /// against freshly embedded text.
    pub(crate) fn parts_mut(&mut self) -> (&mut EmbeddingEngine, &AnchorRegistry) {
        (&mut self.embeddings, &self.anchors)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::StubEmbedder;
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_similarity_is_symmetric() {
        let embedder = StubEmbedder::new(3)
            .with_vector("alpha", vec![1.0, 0.2, 0.0])
            .with_vector("beta", vec![0.3, 1.0, 0.1]);
        let mut engine = SemanticEngine::new(Box::new(embedder), &Config::default()).unwrap();

        let ab = engine.similarity("alpha", "beta").unwrap();
        let ba = engine.similarity("beta", "alpha").unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_anchors_embedded_once_at_startup() {
        let embedder = StubEmbedder::new(3);
        let calls = embedder.calls.clone();
        let _engine = SemanticEngine::new(Box::new(embedder), &Config::default()).unwrap();

        // All anchor phrases go through a single batched embed call.
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
