//! Anchor registry: pre-embedded reference phrases for zero-shot decisions
//!
//! Anchor phrases come from configuration (see `AnchorConfig`), are embedded
//! once when the engine starts, and are immutable afterwards.

use crate::config::AnchorConfig;
use crate::embedding::EmbeddingEngine;
use crate::error::Result;

/// A category anchor with its definition phrase already embedded.
#[derive(Debug, Clone)]
pub struct CategoryAnchorVector {
    pub label: String,
    pub vector: Vec<f32>,
}

/// All anchor vectors, embedded once per process.
pub struct AnchorRegistry {
    skill_anchor_vectors: Vec<Vec<f32>>,
    categories: Vec<CategoryAnchorVector>,
}

impl AnchorRegistry {
    /// Embed every anchor phrase in a single batched pass.
    pub fn build(engine: &mut EmbeddingEngine, config: &AnchorConfig) -> Result<Self> {
        let mut phrases: Vec<String> = config.skill_anchors.clone();
        phrases.extend(config.categories.iter().map(|c| c.definition.clone()));

        let vectors = engine.embed_many(&phrases);
        let (skill_vectors, category_vectors) = vectors.split_at(config.skill_anchors.len());

        let categories = config
            .categories
            .iter()
            .zip(category_vectors)
            .map(|(anchor, vector)| CategoryAnchorVector {
                label: anchor.label.clone(),
                vector: vector.clone(),
            })
            .collect();

        log::debug!(
            "Anchor registry built: {} skill anchors, {} categories",
            config.skill_anchors.len(),
            config.categories.len()
        );

        Ok(Self {
            skill_anchor_vectors: skill_vectors.to_vec(),
            categories,
        })
    }

    pub fn skill_anchor_vectors(&self) -> &[Vec<f32>] {
        &self.skill_anchor_vectors
    }

    /// Category anchors in declaration order. The order is the documented
    /// tie-break for classification: on an exact similarity tie, the
    /// first-declared category wins.
    pub fn categories(&self) -> &[CategoryAnchorVector] {
        &self.categories
    }
}
