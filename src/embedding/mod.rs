//! Embedding provider: Model2Vec-backed text vectors with batching and caching
//!
//! The model is the one expensive shared resource in the engine. It is loaded
//! once at startup and injected into consumers; everything downstream is pure
//! arithmetic over already-produced vectors. All encode paths go through
//! `&mut EmbeddingEngine`, which serializes model access, so no extra
//! synchronization is needed around the inference runtime.

pub mod model_manager;

use crate::config::Config;
use crate::error::{Result, SkillScopeError};
use model2vec_rs::model::StaticModel;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Abstraction over a pretrained text-embedding model.
///
/// `embed_batch` must be order-preserving and agree with repeated `embed`
/// calls; it exists to amortize one forward pass over many inputs. Inputs
/// should be non-empty: whitespace-only strings embed to a degenerate vector
/// with no similarity guarantees, so callers filter them out first.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;
    fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>>;
}

/// Model2Vec static embeddings (the production embedder).
pub struct Model2VecEmbedder {
    model: StaticModel,
}

impl Model2VecEmbedder {
    /// Load a Model2Vec model from a local directory. Failure here is fatal
    /// for the process: no core operation can run without an embedder.
    pub fn load(model_path: &Path) -> Result<Self> {
        let start_time = Instant::now();
        log::info!(
            "Loading Model2Vec embedding model from: {}",
            model_path.display()
        );

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| SkillScopeError::ModelLoading(format!("Failed to load model: {}", e)))?;

        log::info!("Model loaded in {:.2?}", start_time.elapsed());
        Ok(Self { model })
    }
}

impl TextEmbedder for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        self.model.encode_single(text)
    }

    fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        self.model.encode(texts)
    }
}

/// Embedding engine wrapping any `TextEmbedder` with a per-process cache.
///
/// Identical input strings always yield identical vectors, whether served
/// from the cache or the model, so batched and single-item consumers agree
/// exactly.
pub struct EmbeddingEngine {
    embedder: Box<dyn TextEmbedder>,
    cache: HashMap<String, Vec<f32>>,
}

impl EmbeddingEngine {
    pub fn new(embedder: Box<dyn TextEmbedder>) -> Self {
        Self {
            embedder,
            cache: HashMap::new(),
        }
    }

    /// Load the configured default model from the models directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let model_path = Self::default_model_path(config);
        if !model_path.exists() {
            return Err(SkillScopeError::ModelNotFound(format!(
                "Embedding model not found at {}. Run `skillscope models download {}` first.",
                model_path.display(),
                config.models.default_embedding_model
            )));
        }
        let embedder = Model2VecEmbedder::load(&model_path)?;
        Ok(Self::new(Box::new(embedder)))
    }

    fn default_model_path(config: &Config) -> PathBuf {
        config
            .models_dir()
            .join(&config.models.default_embedding_model)
    }

    /// Embed a single text, serving repeats from the cache.
    pub fn embed(&mut self, text: &str) -> Vec<f32> {
        if let Some(cached) = self.cache.get(text) {
            return cached.clone();
        }
        let embedding = self.embedder.embed(text);
        self.cache.insert(text.to_string(), embedding.clone());
        embedding
    }

    /// Embed many texts in one forward pass, order-preserving.
    ///
    /// Cached entries are reused; only uncached texts hit the model, in a
    /// single batched call.
    pub fn embed_many(&mut self, texts: &[String]) -> Vec<Vec<f32>> {
        let mut results: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        let mut uncached_texts = Vec::new();
        let mut uncached_indices = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            if let Some(cached) = self.cache.get(text) {
                results[i] = Some(cached.clone());
            } else {
                uncached_texts.push(text.clone());
                uncached_indices.push(i);
            }
        }

        if !uncached_texts.is_empty() {
            let embeddings = self.embedder.embed_batch(&uncached_texts);
            for (text, (index, embedding)) in uncached_texts
                .iter()
                .zip(uncached_indices.into_iter().zip(embeddings))
            {
                self.cache.insert(text.clone(), embedding.clone());
                results[index] = Some(embedding);
            }
        }

        results.into_iter().map(|r| r.unwrap_or_default()).collect()
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

/// Cosine similarity between two embeddings, in [-1, 1].
///
/// Symmetric by construction. Zero-norm vectors (degenerate inputs) score
/// 0.0 rather than erroring; mismatched dimensions are a real error since
/// they indicate vectors from different models.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(SkillScopeError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Deterministic embedder that counts model invocations.
    struct CountingEmbedder {
        calls: Arc<AtomicUsize>,
    }

    impl TextEmbedder for CountingEmbedder {
        fn embed(&self, text: &str) -> Vec<f32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Stable pseudo-embedding from byte content
            let sum: u32 = text.bytes().map(|b| b as u32).sum();
            vec![sum as f32, text.len() as f32, 1.0]
        }

        fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            texts
                .iter()
                .map(|t| {
                    let sum: u32 = t.bytes().map(|b| b as u32).sum();
                    vec![sum as f32, t.len() as f32, 1.0]
                })
                .collect()
        }
    }

    fn counting_engine() -> (EmbeddingEngine, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = EmbeddingEngine::new(Box::new(CountingEmbedder {
            calls: calls.clone(),
        }));
        (engine, calls)
    }

    #[test]
    fn test_embed_caches_repeat_inputs() {
        let (mut engine, calls) = counting_engine();

        let first = engine.embed("Kubernetes");
        let second = engine.embed("Kubernetes");

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(engine.cache_size(), 1);
    }

    #[test]
    fn test_embed_many_preserves_order_and_batches() {
        let (mut engine, calls) = counting_engine();
        let texts = vec![
            "Python".to_string(),
            "Rust".to_string(),
            "Python".to_string(),
        ];

        let vectors = engine.embed_many(&texts);

        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0], vectors[2]);
        assert_ne!(vectors[0], vectors[1]);
        // Single batched model call for all uncached texts
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_embed_many_agrees_with_single_embed() {
        let (mut engine, _) = counting_engine();
        let texts = vec!["Docker".to_string(), "Terraform".to_string()];

        let batched = engine.embed_many(&texts);
        engine.clear_cache();
        let singles: Vec<Vec<f32>> = texts.iter().map(|t| engine.embed(t)).collect();

        assert_eq!(batched, singles);
    }

    #[test]
    fn test_cosine_similarity_symmetric() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![3.0, 1.0, 0.5];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_cosine_similarity_identical_vectors() {
        let a = vec![0.5, 0.5, 0.5];
        let score = cosine_similarity(&a, &a).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_norm_is_zero() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_dimension_mismatch() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert!(cosine_similarity(&a, &b).is_err());
    }
}
