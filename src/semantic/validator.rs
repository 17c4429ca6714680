//! Skill validator: is this token a genuine technical skill?
//!
//! Acceptance is purely distributional: a candidate passes when its maximum
//! similarity against the "is a technical skill" anchors clears the caller's
//! threshold. No skill name list is hardcoded anywhere.

use super::SemanticEngine;
use crate::embedding::cosine_similarity;
use crate::error::Result;

/// Candidates shorter than this are rejected before any embedding work.
const MIN_CANDIDATE_CHARS: usize = 2;

impl SemanticEngine {
    /// Decide whether a single candidate token is a technical skill.
    pub fn is_technical_skill(&mut self, candidate: &str, threshold: f32) -> Result<bool> {
        if candidate.chars().count() < MIN_CANDIDATE_CHARS {
            return Ok(false);
        }

        let (embeddings, anchors) = self.parts_mut();
        let candidate_vector = embeddings.embed(candidate);
        let max_score = max_anchor_similarity(&candidate_vector, anchors.skill_anchor_vectors())?;

        Ok(max_score > threshold)
    }

    /// Batched form of [`is_technical_skill`]: one embedding pass for all
    /// candidates, then a candidates-by-anchors similarity sweep.
    ///
    /// Contract: for every element this agrees exactly with the single-item
    /// form, since both reduce to the same max-over-anchors rule on the same
    /// cached vectors.
    ///
    /// [`is_technical_skill`]: SemanticEngine::is_technical_skill
    pub fn filter_skills(&mut self, candidates: &[String], threshold: f32) -> Result<Vec<String>> {
        let eligible: Vec<String> = candidates
            .iter()
            .filter(|c| c.chars().count() >= MIN_CANDIDATE_CHARS)
            .cloned()
            .collect();

        if eligible.is_empty() {
            return Ok(Vec::new());
        }

        let (embeddings, anchors) = self.parts_mut();
        let candidate_vectors = embeddings.embed_many(&eligible);

        let mut accepted = Vec::new();
        for (candidate, vector) in eligible.iter().zip(&candidate_vectors) {
            let max_score = max_anchor_similarity(vector, anchors.skill_anchor_vectors())?;
            if max_score > threshold {
                accepted.push(candidate.clone());
            }
        }

        log::debug!(
            "Validated {}/{} candidate tokens as technical skills",
            accepted.len(),
            candidates.len()
        );
        Ok(accepted)
    }
}

fn max_anchor_similarity(vector: &[f32], anchor_vectors: &[Vec<f32>]) -> Result<f32> {
    let mut max_score = f32::NEG_INFINITY;
    for anchor in anchor_vectors {
        let score = cosine_similarity(vector, anchor)?;
        if score > max_score {
            max_score = score;
        }
    }
    Ok(max_score)
}
