//! Configuration management for skillscope
//!
//! Weights, thresholds, and anchor phrases are all configuration data: the
//! matching algorithms never hardcode a tunable number or an anchor phrase.
//! Everything here is validated at the load boundary so the engine never
//! discovers a bad threshold mid-computation.

use crate::error::{Result, SkillScopeError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub matching: MatchingConfig,
    pub gaps: GapConfig,
    pub anchors: AnchorConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
}

/// Weights and thresholds for scoring a single resume-to-job match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Weight of the skill-coverage sub-score. Weights must sum to 1.0.
    pub skill_weight: f32,
    pub experience_weight: f32,
    /// Weight of the optional title-similarity sub-score. When no title
    /// score is available the remaining weights are renormalized.
    pub title_weight: f32,

    /// Minimum similarity for a semantic skill match during coverage scoring.
    pub skill_match_threshold: f32,
    /// Minimum anchor similarity for a token to count as a technical skill.
    pub skill_validation_threshold: f32,
    /// Weight applied to preferred-skill coverage relative to required.
    pub preferred_skill_weight: f32,

    /// Quality tier boundaries on the composite score, descending.
    pub excellent_threshold: f32,
    pub strong_threshold: f32,
    pub good_threshold: f32,

    /// Gap severity cutoffs on the missing-to-required ratio, ascending.
    pub gap_minor_ratio: f32,
    pub gap_moderate_ratio: f32,
    pub gap_significant_ratio: f32,
}

/// Tuning for gap clustering and prioritization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapConfig {
    /// Similarity threshold for merging two mentions into one cluster.
    /// Deliberately high: a false merge (Java vs JavaScript) is worse than
    /// leaving two spellings separate.
    pub cluster_merge_threshold: f32,
    /// A gap is critical when this percentage of jobs require it...
    pub critical_penetration_pct: f32,
    /// ...or when its weighted severity score reaches this cutoff.
    pub critical_severity: f32,
    /// Domain weight used when a cluster's category has no configured weight.
    pub default_domain_weight: f32,
}

/// Anchor phrases for zero-shot skill validation and categorization.
///
/// These are versioned data, not code: adding a category means adding one
/// entry here, not touching the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// Phrases that define the center of "is a technical skill" in
    /// embedding space. A candidate is accepted if its maximum similarity
    /// to any of these clears the validation threshold.
    pub skill_anchors: Vec<String>,
    /// Category anchors in declaration order; order is the tie-break for
    /// classification and must stay stable across runs.
    pub categories: Vec<CategoryAnchor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAnchor {
    pub label: String,
    /// Definition phrase embedded once at startup.
    pub definition: String,
    /// Domain weight for gap severity (harder-to-acquire domains score
    /// higher than soft skills).
    pub gap_weight: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".skillscope")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                default_embedding_model: "potion-base-8M".to_string(),
            },
            matching: MatchingConfig {
                skill_weight: 0.5,
                experience_weight: 0.3,
                title_weight: 0.2,
                skill_match_threshold: 0.70,
                skill_validation_threshold: 0.35,
                preferred_skill_weight: 0.2,
                excellent_threshold: 0.80,
                strong_threshold: 0.65,
                good_threshold: 0.50,
                gap_minor_ratio: 0.25,
                gap_moderate_ratio: 0.50,
                gap_significant_ratio: 0.75,
            },
            gaps: GapConfig {
                cluster_merge_threshold: 0.85,
                critical_penetration_pct: 40.0,
                critical_severity: 2.5,
                default_domain_weight: 1.0,
            },
            anchors: AnchorConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Default for AnchorConfig {
    fn default() -> Self {
        let skill_anchors = [
            "software engineering skill",
            "programming language",
            "framework",
            "cloud platform",
            "database technology",
            "machine learning tool",
            "developer tool",
            "technical competency",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let categories = vec![
            CategoryAnchor {
                label: "Programming".to_string(),
                definition: "software development coding java python c++ code".to_string(),
                gap_weight: 1.5,
            },
            CategoryAnchor {
                label: "Data & AI".to_string(),
                definition: "machine learning artificial intelligence statistics data analysis sql pandas".to_string(),
                gap_weight: 1.4,
            },
            CategoryAnchor {
                label: "Web & UI".to_string(),
                definition: "frontend backend react angular html css javascript user interface".to_string(),
                gap_weight: 1.2,
            },
            CategoryAnchor {
                label: "Cloud & DevOps".to_string(),
                definition: "aws azure docker kubernetes ci/cd infrastructure server".to_string(),
                gap_weight: 1.3,
            },
            CategoryAnchor {
                label: "Soft Skills".to_string(),
                definition: "leadership communication management agile collaboration team".to_string(),
                gap_weight: 0.8,
            },
        ];

        Self {
            skill_anchors,
            categories,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| {
                SkillScopeError::Configuration(format!("Failed to parse config: {}", e))
            })?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            SkillScopeError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skillscope")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }

    /// Reject bad weights and thresholds up front, before any analysis runs.
    pub fn validate(&self) -> Result<()> {
        let m = &self.matching;

        let weight_sum = m.skill_weight + m.experience_weight + m.title_weight;
        if (weight_sum - 1.0).abs() > 1e-4 {
            return Err(SkillScopeError::Configuration(format!(
                "Matching weights must sum to 1.0, got {:.4}",
                weight_sum
            )));
        }

        let unit_ranged = [
            ("skill_match_threshold", m.skill_match_threshold),
            ("skill_validation_threshold", m.skill_validation_threshold),
            ("preferred_skill_weight", m.preferred_skill_weight),
            ("excellent_threshold", m.excellent_threshold),
            ("strong_threshold", m.strong_threshold),
            ("good_threshold", m.good_threshold),
            ("gap_minor_ratio", m.gap_minor_ratio),
            ("gap_moderate_ratio", m.gap_moderate_ratio),
            ("gap_significant_ratio", m.gap_significant_ratio),
            (
                "cluster_merge_threshold",
                self.gaps.cluster_merge_threshold,
            ),
        ];
        for (name, value) in unit_ranged {
            if !(0.0..=1.0).contains(&value) {
                return Err(SkillScopeError::Configuration(format!(
                    "{} must be in [0.0, 1.0], got {}",
                    name, value
                )));
            }
        }

        if !(m.excellent_threshold >= m.strong_threshold
            && m.strong_threshold >= m.good_threshold)
        {
            return Err(SkillScopeError::Configuration(
                "Quality tier thresholds must be descending".to_string(),
            ));
        }

        if !(m.gap_minor_ratio <= m.gap_moderate_ratio
            && m.gap_moderate_ratio <= m.gap_significant_ratio)
        {
            return Err(SkillScopeError::Configuration(
                "Gap severity ratios must be ascending".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&self.gaps.critical_penetration_pct) {
            return Err(SkillScopeError::Configuration(format!(
                "critical_penetration_pct must be in [0, 100], got {}",
                self.gaps.critical_penetration_pct
            )));
        }

        if self.anchors.skill_anchors.is_empty() {
            return Err(SkillScopeError::Configuration(
                "At least one skill anchor phrase is required".to_string(),
            ));
        }
        if self.anchors.categories.is_empty() {
            return Err(SkillScopeError::Configuration(
                "At least one category anchor is required".to_string(),
            ));
        }

        Ok(())
    }

    /// Domain weight for a category label, falling back to the default.
    pub fn domain_weight(&self, category: &str) -> f32 {
        self.anchors
            .categories
            .iter()
            .find(|c| c.label == category)
            .map(|c| c.gap_weight)
            .unwrap_or(self.gaps.default_domain_weight)
    }
}
