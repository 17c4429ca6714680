//! Similarity matcher: fuzzy lookup of a query against candidate options
//!
//! Resolves inconsistent naming ("K8s" vs "Kubernetes") by picking the
//! semantically closest option above a caller-supplied threshold. Exact
//! case-insensitive hits short-circuit before any embedding work.

use super::SemanticEngine;
use crate::embedding::cosine_similarity;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMethod {
    Exact,
    Semantic,
}

/// Outcome of one fuzzy lookup. Produced fresh per query, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub query: String,
    pub matched: Option<String>,
    pub score: f32,
    pub method: MatchMethod,
}

impl MatchRecord {
    fn no_match(query: &str) -> Self {
        Self {
            query: query.to_string(),
            matched: None,
            score: 0.0,
            method: MatchMethod::Semantic,
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}

impl SemanticEngine {
    /// Find the best-matching option for `query`, or no-match if nothing
    /// clears `threshold`.
    ///
    /// Raising the threshold can only turn a match into a no-match, never
    /// the reverse. Empty `options` short-circuits to no-match without
    /// invoking the embedding model.
    pub fn find_best_match(
        &mut self,
        query: &str,
        options: &[String],
        threshold: f32,
    ) -> Result<MatchRecord> {
        if options.is_empty() {
            return Ok(MatchRecord::no_match(query));
        }

        // Cheap, certain path first
        let query_lower = query.to_lowercase();
        if let Some(exact) = options.iter().find(|o| o.to_lowercase() == query_lower) {
            return Ok(MatchRecord {
                query: query.to_string(),
                matched: Some(exact.clone()),
                score: 1.0,
                method: MatchMethod::Exact,
            });
        }

        let query_vector = self.embeddings_mut().embed(query);
        let option_vectors = self.embeddings_mut().embed_many(options);

        let mut best_index = 0;
        let mut best_score = f32::NEG_INFINITY;
        for (i, vector) in option_vectors.iter().enumerate() {
            let score = cosine_similarity(&query_vector, vector)?;
            if score > best_score {
                best_score = score;
                best_index = i;
            }
        }

        if best_score >= threshold {
            Ok(MatchRecord {
                query: query.to_string(),
                matched: Some(options[best_index].clone()),
                score: best_score,
                method: MatchMethod::Semantic,
            })
        } else {
            Ok(MatchRecord::no_match(query))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::semantic::test_support::StubEmbedder;

    /// Embedding space where similarity(K8s, Kubernetes) = 0.82 and
    /// similarity(K8s, Java) = 0.10.
    fn k8s_embedder() -> StubEmbedder {
        let s = 0.82_f32;
        let t = 0.10_f32;
        StubEmbedder::new(3)
            .with_vector("Kubernetes", vec![1.0, 0.0, 0.0])
            .with_vector("Java", vec![0.0, 1.0, 0.0])
            .with_vector(
                "K8s",
                vec![s, t, (1.0 - s * s - t * t).max(0.0).sqrt()],
            )
    }

    fn engine(embedder: StubEmbedder) -> SemanticEngine {
        SemanticEngine::new(Box::new(embedder), &Config::default()).unwrap()
    }

    #[test]
    fn test_k8s_matches_kubernetes() {
        let mut engine = engine(k8s_embedder());
        let options = vec!["Kubernetes".to_string(), "Java".to_string()];

        let record = engine.find_best_match("K8s", &options, 0.65).unwrap();

        assert_eq!(record.matched.as_deref(), Some("Kubernetes"));
        assert!((record.score - 0.82).abs() < 1e-4);
        assert_eq!(record.method, MatchMethod::Semantic);
    }

    #[test]
    fn test_no_match_below_threshold() {
        let mut engine = engine(k8s_embedder());
        let options = vec!["Kubernetes".to_string(), "Java".to_string()];

        let record = engine.find_best_match("K8s", &options, 0.9).unwrap();

        assert!(!record.is_match());
        assert_eq!(record.score, 0.0);
    }

    #[test]
    fn test_threshold_monotonicity() {
        let options = vec!["Kubernetes".to_string(), "Java".to_string()];
        let thresholds = [0.0, 0.3, 0.65, 0.81, 0.83, 0.95];

        let mut engine = engine(k8s_embedder());
        let mut matched_at_higher = false;
        // Walk thresholds from high to low: once a threshold matches, every
        // lower threshold must match too.
        for t in thresholds.iter().rev() {
            let record = engine.find_best_match("K8s", &options, *t).unwrap();
            if matched_at_higher {
                assert!(
                    record.is_match(),
                    "matched at a higher threshold but not at {}",
                    t
                );
            }
            matched_at_higher |= record.is_match();
        }
        assert!(matched_at_higher);
    }

    #[test]
    fn test_exact_match_skips_embedding() {
        let embedder = StubEmbedder::new(3);
        let calls = embedder.calls.clone();
        let mut engine = engine(embedder);
        let baseline = calls.load(std::sync::atomic::Ordering::SeqCst);

        let options = vec!["kubernetes".to_string()];
        let record = engine.find_best_match("Kubernetes", &options, 0.99).unwrap();

        assert_eq!(record.matched.as_deref(), Some("kubernetes"));
        assert_eq!(record.score, 1.0);
        assert_eq!(record.method, MatchMethod::Exact);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), baseline);
    }

    #[test]
    fn test_empty_options_short_circuits_without_embedding() {
        let embedder = StubEmbedder::new(3);
        let calls = embedder.calls.clone();
        let mut engine = engine(embedder);
        let baseline = calls.load(std::sync::atomic::Ordering::SeqCst);

        let record = engine.find_best_match("K8s", &[], 0.0).unwrap();

        assert!(!record.is_match());
        assert_eq!(record.score, 0.0);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), baseline);
    }
}
