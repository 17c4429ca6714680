//! Scoring engine: skill coverage, experience fit, and composite ranking
//!
//! Combines the sub-scores into one weighted composite in [0, 1], maps it to
//! a quality tier, and labels the skill gap. Tier mapping and gap severity
//! are both monotonic; weights and cutoffs come from `MatchingConfig`.

use crate::analysis::inventory::SkillInventory;
use crate::analysis::requirements::{JobPosting, JobRequirements, Seniority};
use crate::config::{Config, MatchingConfig};
use crate::error::Result;
use crate::semantic::{MatchMethod, SemanticEngine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-supplied resume data: candidate skill tokens from upstream
/// extraction plus the raw text they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeInput {
    pub skills: Vec<String>,
    /// Raw resume text, used only for proficiency context.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub years_experience: u32,
    #[serde(default)]
    pub seniority: Seniority,
    #[serde(default)]
    pub role: Option<String>,
}

/// Everything the scorer needs to know about the candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub inventory: SkillInventory,
    pub total_years: u32,
    pub seniority: Seniority,
    /// Primary role, e.g. "data scientist"; enables title similarity.
    pub role: Option<String>,
}

impl ResumeProfile {
    /// Validate and categorize the candidate's skill tokens into a profile.
    pub fn build(
        engine: &mut SemanticEngine,
        config: &Config,
        input: &ResumeInput,
    ) -> Result<Self> {
        let inventory = SkillInventory::build(engine, config, &input.skills, &input.text)?;
        Ok(Self {
            inventory,
            total_years: input.years_experience,
            seniority: input.seniority,
            role: input.role.clone(),
        })
    }

    /// Synthesized "seniority + role" phrase compared against job titles.
    pub fn title_phrase(&self) -> Option<String> {
        self.role
            .as_ref()
            .map(|role| format!("{} {}", self.seniority.as_str(), role))
    }
}

/// Discrete match quality, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchQuality {
    Excellent,
    Strong,
    Good,
    Weak,
}

impl MatchQuality {
    pub fn recommendation(&self) -> &'static str {
        match self {
            MatchQuality::Excellent => "Apply immediately - ideal fit",
            MatchQuality::Strong => "Highly recommended",
            MatchQuality::Good => "Good opportunity",
            MatchQuality::Weak => "Not recommended",
        }
    }
}

/// Severity of the required-skill gap, a pure function of the
/// missing-to-required ratio (independent of the composite score).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapSeverity {
    None,
    Minor,
    Moderate,
    Significant,
    Critical,
}

impl GapSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            GapSeverity::None => "None - all requirements covered",
            GapSeverity::Minor => "Minor - easily addressable",
            GapSeverity::Moderate => "Moderate - requires preparation",
            GapSeverity::Significant => "Significant - needs work",
            GapSeverity::Critical => "Critical - may not be suitable",
        }
    }
}

/// One required skill matched against the resume inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMatchDetail {
    pub required: String,
    pub matched_as: String,
    pub score: f32,
    pub method: MatchMethod,
    pub proficiency: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCoverage {
    /// Combined required + preferred coverage in [0, 1].
    pub score: f32,
    pub required_coverage: f32,
    pub preferred_coverage: f32,
    pub matched_required: Vec<SkillMatchDetail>,
    pub missing_required: Vec<String>,
    pub matched_preferred: Vec<String>,
    pub missing_preferred: Vec<String>,
    pub gap_severity: GapSeverity,
    /// Set when the posting yielded no extractable requirements; the
    /// coverage of 0.0 then means "unknown", not "terrible".
    pub low_confidence: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceFit {
    pub score: f32,
    pub candidate_years: u32,
    pub required_years: u32,
    pub analysis: String,
    pub seniority_analysis: String,
}

/// Full scored match for one job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMatch {
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub overall_score: f32,
    pub quality: MatchQuality,
    pub recommendation: String,
    pub skill_coverage: SkillCoverage,
    pub experience: ExperienceFit,
    pub title_similarity: Option<f32>,
    pub requirements: JobRequirements,
    pub analyzed_at: DateTime<Utc>,
}

pub struct ScoringEngine {
    matching: MatchingConfig,
}

impl ScoringEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            matching: config.matching.clone(),
        }
    }

    /// Score one resume against one job posting.
    pub fn score_match(
        &self,
        engine: &mut SemanticEngine,
        profile: &ResumeProfile,
        job: &JobPosting,
    ) -> Result<JobMatch> {
        let requirements = JobRequirements::from_posting(job);

        let skill_coverage = self.score_skills(engine, &profile.inventory, &requirements)?;
        let experience = self.experience_fit(
            profile.total_years,
            profile.seniority,
            requirements.experience_years,
            requirements.seniority,
        );

        let title_similarity = match (profile.title_phrase(), job.title.trim().is_empty()) {
            (Some(phrase), false) => {
                Some(engine.similarity(&job.title, &phrase)?.clamp(0.0, 1.0))
            }
            _ => None,
        };

        let overall_score =
            self.composite(skill_coverage.score, experience.score, title_similarity);
        let quality = self.quality_for(overall_score);

        log::debug!(
            "Scored '{}': composite {:.3} ({:?})",
            job.title,
            overall_score,
            quality
        );

        Ok(JobMatch {
            job_title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            url: job.url.clone(),
            overall_score,
            quality,
            recommendation: quality.recommendation().to_string(),
            skill_coverage,
            experience,
            title_similarity,
            requirements,
            analyzed_at: Utc::now(),
        })
    }

    /// Coverage of required and preferred skills against the inventory.
    ///
    /// Each required skill tries an exact case-insensitive match first (the
    /// matcher's cheap path), then falls back to semantic lookup at the
    /// configured threshold.
    fn score_skills(
        &self,
        engine: &mut SemanticEngine,
        inventory: &SkillInventory,
        requirements: &JobRequirements,
    ) -> Result<SkillCoverage> {
        let resume_skills = inventory.skill_names();
        let threshold = self.matching.skill_match_threshold;

        let mut matched_required = Vec::new();
        let mut missing_required = Vec::new();
        for required in &requirements.required_skills {
            let record = engine.find_best_match(required, &resume_skills, threshold)?;
            match record.matched {
                Some(matched_as) => {
                    let proficiency = inventory
                        .find(&matched_as)
                        .map(|s| s.proficiency)
                        .unwrap_or(0.75);
                    matched_required.push(SkillMatchDetail {
                        required: required.clone(),
                        matched_as,
                        score: record.score,
                        method: record.method,
                        proficiency,
                    });
                }
                None => missing_required.push(required.clone()),
            }
        }

        let mut matched_preferred = Vec::new();
        let mut missing_preferred = Vec::new();
        for preferred in &requirements.preferred_skills {
            let record = engine.find_best_match(preferred, &resume_skills, threshold)?;
            if record.is_match() {
                matched_preferred.push(preferred.clone());
            } else {
                missing_preferred.push(preferred.clone());
            }
        }

        let low_confidence = requirements.required_skills.is_empty();
        let required_coverage = if low_confidence {
            // No parseable requirements: score zero and flag it rather than
            // silently scoring a perfect match.
            0.0
        } else {
            matched_required.len() as f32 / requirements.required_skills.len().max(1) as f32
        };

        let preferred_coverage = if requirements.preferred_skills.is_empty() {
            // Neutral: absence of nice-to-haves neither helps nor hurts much
            0.5
        } else {
            matched_preferred.len() as f32 / requirements.preferred_skills.len() as f32
        };

        let preferred_weight = self.matching.preferred_skill_weight;
        let score =
            required_coverage * (1.0 - preferred_weight) + preferred_coverage * preferred_weight;

        let gap_severity = self.gap_severity(
            missing_required.len(),
            requirements.required_skills.len(),
        );

        Ok(SkillCoverage {
            score,
            required_coverage,
            preferred_coverage,
            matched_required,
            missing_required,
            matched_preferred,
            missing_preferred,
            gap_severity,
            low_confidence,
        })
    }

    /// Years step function blended with seniority alignment, 60/40.
    /// Monotonic in candidate years at any fixed seniority pairing.
    pub fn experience_fit(
        &self,
        candidate_years: u32,
        candidate_seniority: Seniority,
        required_years: u32,
        required_seniority: Seniority,
    ) -> ExperienceFit {
        let (years_score, analysis) = if required_years == 0 {
            (0.9, "No specific requirement".to_string())
        } else {
            let candidate = candidate_years as f32;
            let required = required_years as f32;
            if candidate >= required * 1.5 {
                (
                    1.0,
                    format!(
                        "Significantly exceeds (+{} years)",
                        candidate_years - required_years
                    ),
                )
            } else if candidate >= required {
                (0.95, "Meets requirement".to_string())
            } else if candidate >= required * 0.8 {
                (
                    0.75,
                    format!("Slightly below (short by {})", required_years - candidate_years),
                )
            } else {
                // Capped at the 0.75 step above; more years never score less
                (
                    (candidate / required).clamp(0.3, 0.75),
                    "Below requirement".to_string(),
                )
            }
        };

        let (seniority_score, seniority_analysis) =
            seniority_alignment(candidate_seniority, required_seniority);

        ExperienceFit {
            score: (years_score * 0.6 + seniority_score * 0.4).min(1.0),
            candidate_years,
            required_years,
            analysis,
            seniority_analysis: seniority_analysis.to_string(),
        }
    }

    /// Weighted sum of the sub-scores. When no title score is available the
    /// remaining weights are renormalized so the composite stays in [0, 1].
    pub fn composite(&self, skill: f32, experience: f32, title: Option<f32>) -> f32 {
        let m = &self.matching;
        let score = match title {
            Some(title) => {
                skill * m.skill_weight + experience * m.experience_weight + title * m.title_weight
            }
            None => {
                let weight_sum = m.skill_weight + m.experience_weight;
                (skill * m.skill_weight + experience * m.experience_weight) / weight_sum
            }
        };
        score.clamp(0.0, 1.0)
    }

    /// Map a composite score to its quality tier (monotonic).
    pub fn quality_for(&self, score: f32) -> MatchQuality {
        let m = &self.matching;
        if score >= m.excellent_threshold {
            MatchQuality::Excellent
        } else if score >= m.strong_threshold {
            MatchQuality::Strong
        } else if score >= m.good_threshold {
            MatchQuality::Good
        } else {
            MatchQuality::Weak
        }
    }

    /// Severity of the missing-to-required ratio. Defined for every ratio,
    /// including 0 (no gap) and 1 (total gap).
    pub fn gap_severity(&self, missing: usize, required: usize) -> GapSeverity {
        if required == 0 || missing == 0 {
            return GapSeverity::None;
        }

        let ratio = missing as f32 / required as f32;
        let m = &self.matching;
        if ratio <= m.gap_minor_ratio {
            GapSeverity::Minor
        } else if ratio <= m.gap_moderate_ratio {
            GapSeverity::Moderate
        } else if ratio <= m.gap_significant_ratio {
            GapSeverity::Significant
        } else {
            GapSeverity::Critical
        }
    }
}

/// Candidate-vs-required seniority alignment matrix. Overqualification
/// costs little; underqualification scales with the distance.
fn seniority_alignment(candidate: Seniority, required: Seniority) -> (f32, &'static str) {
    use Seniority::{Junior, Mid, Senior};
    match (candidate, required) {
        (Junior, Junior) | (Mid, Mid) | (Senior, Senior) => (1.0, "Perfect match"),
        (Junior, Mid) => (0.6, "May need growth potential"),
        (Junior, Senior) => (0.2, "Significant gap"),
        (Mid, Junior) | (Senior, Mid) => (0.95, "Overqualified"),
        (Mid, Senior) => (0.7, "Close to required"),
        (Senior, Junior) => (0.9, "Highly overqualified"),
    }
}
