//! Zero-shot category classifier
//!
//! A skill is assigned to the category whose anchor definition sits closest
//! in embedding space. Nothing is trained; adding a category means adding
//! one anchor definition to the configuration.

use super::SemanticEngine;
use crate::embedding::cosine_similarity;
use crate::error::{Result, SkillScopeError};

impl SemanticEngine {
    /// Assign a skill to exactly one category by nearest-anchor similarity.
    ///
    /// Exact floating-point ties break by anchor declaration order: the
    /// strict `>` comparison means the first-declared category wins. This
    /// keeps classification deterministic when paraphrastic anchors tie.
    pub fn classify_category(&mut self, skill: &str) -> Result<String> {
        let (embeddings, anchors) = self.parts_mut();
        let skill_vector = embeddings.embed(skill);
        nearest_category(&skill_vector, anchors)
    }

    /// Batched form: one embedding pass, same nearest-anchor rule per skill.
    pub fn classify_batch(&mut self, skills: &[String]) -> Result<Vec<String>> {
        if skills.is_empty() {
            return Ok(Vec::new());
        }

        let (embeddings, anchors) = self.parts_mut();
        let skill_vectors = embeddings.embed_many(skills);

        skill_vectors
            .iter()
            .map(|vector| nearest_category(vector, anchors))
            .collect()
    }
}

fn nearest_category(
    skill_vector: &[f32],
    anchors: &super::anchors::AnchorRegistry,
) -> Result<String> {
    let categories = anchors.categories();
    if categories.is_empty() {
        return Err(SkillScopeError::Configuration(
            "No category anchors configured".to_string(),
        ));
    }

    let mut best_label = &categories[0].label;
    let mut best_score = f32::NEG_INFINITY;

    for category in categories {
        let score = cosine_similarity(skill_vector, &category.vector)?;
        // Strict comparison: ties keep the earlier-declared category
        if score > best_score {
            best_score = score;
            best_label = &category.label;
        }
    }

    Ok(best_label.clone())
}
