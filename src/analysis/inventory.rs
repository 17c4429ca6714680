//! Categorized skill inventories with proficiency estimation
//!
//! Turns raw candidate tokens (produced by upstream extraction, out of scope
//! here) into validated, categorized skills. Proficiency is a keyword
//! heuristic over the surrounding text, independent of the embedding
//! machinery.

use crate::config::Config;
use crate::error::Result;
use crate::semantic::SemanticEngine;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A validated skill token with its category and estimated proficiency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalSkill {
    pub name: String,
    pub category: String,
    /// Estimated proficiency in [0, 1]: 0.5 basic, 0.75 intermediate,
    /// 1.0 expert.
    pub proficiency: f32,
    /// How many times the token appeared among the candidates.
    pub mentions: usize,
}

/// Skills grouped by category, for one resume or one job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillInventory {
    pub skills_by_category: BTreeMap<String, Vec<CanonicalSkill>>,
}

impl SkillInventory {
    /// Validate, categorize, and score a batch of candidate tokens.
    ///
    /// `source_text` is the surrounding free text (resume body) used for
    /// proficiency context; pass an empty string when unavailable and every
    /// skill gets the default proficiency.
    pub fn build(
        engine: &mut SemanticEngine,
        config: &Config,
        candidates: &[String],
        source_text: &str,
    ) -> Result<Self> {
        // Count mentions per distinct token (case-insensitive)
        let mut mention_counts: BTreeMap<String, (String, usize)> = BTreeMap::new();
        for candidate in candidates {
            let trimmed = candidate.trim();
            if trimmed.is_empty() {
                continue;
            }
            let entry = mention_counts
                .entry(trimmed.to_lowercase())
                .or_insert_with(|| (trimmed.to_string(), 0));
            entry.1 += 1;
        }

        let distinct: Vec<String> = mention_counts.values().map(|(name, _)| name.clone()).collect();

        let validated = engine.filter_skills(&distinct, config.matching.skill_validation_threshold)?;
        let categories = engine.classify_batch(&validated)?;

        let mut skills_by_category: BTreeMap<String, Vec<CanonicalSkill>> = BTreeMap::new();
        for (name, category) in validated.iter().zip(categories) {
            let mentions = mention_counts
                .get(&name.to_lowercase())
                .map(|(_, count)| *count)
                .unwrap_or(1);

            skills_by_category
                .entry(category.clone())
                .or_default()
                .push(CanonicalSkill {
                    name: name.clone(),
                    category,
                    proficiency: estimate_proficiency(source_text, name),
                    mentions,
                });
        }
        for skills in skills_by_category.values_mut() {
            skills.sort_by(|a, b| {
                b.proficiency
                    .partial_cmp(&a.proficiency)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.name.cmp(&b.name))
            });
        }

        log::info!(
            "Built skill inventory: {} skills across {} categories",
            skills_by_category.values().map(|v| v.len()).sum::<usize>(),
            skills_by_category.len()
        );

        Ok(Self { skills_by_category })
    }

    pub fn all_skills(&self) -> impl Iterator<Item = &CanonicalSkill> {
        self.skills_by_category.values().flatten()
    }

    pub fn skill_names(&self) -> Vec<String> {
        self.all_skills().map(|s| s.name.clone()).collect()
    }

    /// Case-insensitive lookup of a skill by name.
    pub fn find(&self, name: &str) -> Option<&CanonicalSkill> {
        let lower = name.to_lowercase();
        self.all_skills().find(|s| s.name.to_lowercase() == lower)
    }

    pub fn total_skills(&self) -> usize {
        self.skills_by_category.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.skills_by_category.is_empty()
    }
}

const EXPERT_KEYWORDS: &[&str] = &[
    "expert",
    "advanced",
    "proficient",
    "mastery",
    "extensive",
    "deep",
    "specialist",
];

const BASIC_KEYWORDS: &[&str] = &[
    "basic",
    "beginner",
    "learning",
    "exposure",
    "understanding",
    "awareness",
];

/// Window of surrounding text inspected per mention, in bytes.
const CONTEXT_RANGE: usize = 100;

const DEFAULT_PROFICIENCY: f32 = 0.75;

/// Estimate proficiency for one skill from its surrounding text.
///
/// Looks for expert/basic indicator keywords within a window around each
/// mention, then for a "N years ... <skill>" statement that bumps the score
/// to 1.0 at five years or 0.75 at two.
pub fn estimate_proficiency(text: &str, skill_name: &str) -> f32 {
    if text.is_empty() {
        return DEFAULT_PROFICIENCY;
    }

    let text_lower = text.to_lowercase();
    let skill_lower = skill_name.to_lowercase();
    let mut proficiency = DEFAULT_PROFICIENCY;

    for (position, _) in text_lower.match_indices(&skill_lower) {
        let start = floor_char_boundary(&text_lower, position.saturating_sub(CONTEXT_RANGE));
        let end = ceil_char_boundary(
            &text_lower,
            (position + skill_lower.len() + CONTEXT_RANGE).min(text_lower.len()),
        );
        let context = &text_lower[start..end];

        if EXPERT_KEYWORDS.iter().any(|kw| context.contains(kw)) {
            proficiency = proficiency.max(1.0);
        } else if BASIC_KEYWORDS.iter().any(|kw| context.contains(kw)) {
            proficiency = proficiency.min(0.5);
        }
    }

    // "5 years of Python" style statements override keyword hints upward
    let years_pattern = format!(
        r"(\d+)\+?\s*(?:years?|yrs?)\s+(?:of\s+)?[^.\n]*?{}",
        regex::escape(&skill_lower)
    );
    if let Ok(re) = Regex::new(&years_pattern) {
        if let Some(caps) = re.captures(&text_lower) {
            if let Ok(years) = caps[1].parse::<u32>() {
                if years >= 5 {
                    proficiency = 1.0;
                } else if years >= 2 {
                    proficiency = proficiency.max(0.75);
                }
            }
        }
    }

    proficiency
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
