//! Skill clusterer: gap aggregation across many job matches
//!
//! Collapses synonymous missing-skill mentions ("AWS", "Amazon Web
//! Services") gathered across postings into canonical clusters so the gap
//! report never double-counts one competency under two spellings.

use crate::analysis::scoring::JobMatch;
use crate::config::Config;
use crate::error::Result;
use crate::semantic::SemanticEngine;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityTier {
    Critical,
    High,
    Low,
}

/// One canonical gap: a merged cluster of synonymous mentions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapCluster {
    /// Canonical label; clustering highest-frequency mentions first makes
    /// this the most common spelling.
    pub skill: String,
    pub category: String,
    /// Combined mention count across all merged spellings.
    pub frequency: usize,
    /// Percentage of analyzed postings that require this skill.
    pub market_penetration: f32,
    /// frequency x domain weight; ranks how urgent the gap is.
    pub severity: f32,
    pub priority: PriorityTier,
}

/// Aggregated gap analysis across all scored matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GapReport {
    /// All clusters, sorted by severity descending.
    pub clusters: Vec<GapCluster>,
    pub critical_gaps: Vec<String>,
    pub high_priority_gaps: Vec<String>,
    pub low_priority_gaps: Vec<String>,
    /// Cluster count per category.
    pub domain_breakdown: BTreeMap<String, usize>,
    pub total_jobs: usize,
}

pub struct SkillClusterer {
    config: Config,
}

impl SkillClusterer {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Collect missing required skills from scored matches into raw
    /// (mention, frequency) counts.
    pub fn collect_missing(matches: &[JobMatch]) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for job_match in matches {
            for missing in &job_match.skill_coverage.missing_required {
                *counts.entry(missing.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Cluster raw mentions and build the prioritized gap report.
    ///
    /// Mentions are processed most-frequent-first so the canonical label is
    /// usually the most common spelling; the merge threshold is
    /// deliberately high because a false merge ("Java" into "JavaScript")
    /// damages trust more than leaving two spellings separate.
    pub fn analyze(
        &self,
        engine: &mut SemanticEngine,
        raw_mentions: &HashMap<String, usize>,
        total_jobs: usize,
    ) -> Result<GapReport> {
        if raw_mentions.is_empty() || total_jobs == 0 {
            return Ok(GapReport {
                total_jobs,
                ..GapReport::default()
            });
        }

        log::info!(
            "Clustering {} raw gap mentions across {} jobs",
            raw_mentions.len(),
            total_jobs
        );

        // Frequency-descending, label ascending for deterministic order
        let mut ordered: Vec<(&String, &usize)> = raw_mentions.iter().collect();
        ordered.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        let mut canonical_labels: Vec<String> = Vec::new();
        let mut cluster_frequencies: Vec<usize> = Vec::new();

        for (mention, frequency) in ordered {
            let record = engine.find_best_match(
                mention,
                &canonical_labels,
                self.config.gaps.cluster_merge_threshold,
            )?;

            match record.matched {
                Some(canonical) => {
                    let index = canonical_labels
                        .iter()
                        .position(|label| *label == canonical)
                        .unwrap_or_else(|| unreachable!("matched label must exist"));
                    cluster_frequencies[index] += frequency;
                }
                None => {
                    canonical_labels.push(mention.clone());
                    cluster_frequencies.push(*frequency);
                }
            }
        }

        let categories = engine.classify_batch(&canonical_labels)?;

        let mut clusters: Vec<GapCluster> = canonical_labels
            .into_iter()
            .zip(cluster_frequencies)
            .zip(categories)
            .map(|((skill, frequency), category)| {
                let weight = self.config.domain_weight(&category);
                let severity = frequency as f32 * weight;
                let market_penetration = frequency as f32 / total_jobs as f32 * 100.0;
                let priority = self.priority_for(market_penetration, severity, frequency);

                GapCluster {
                    skill,
                    category,
                    frequency,
                    market_penetration,
                    severity,
                    priority,
                }
            })
            .collect();

        clusters.sort_by(|a, b| {
            b.severity
                .partial_cmp(&a.severity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.skill.cmp(&b.skill))
        });

        let mut report = GapReport {
            clusters,
            total_jobs,
            ..GapReport::default()
        };
        for cluster in &report.clusters {
            match cluster.priority {
                PriorityTier::Critical => report.critical_gaps.push(cluster.skill.clone()),
                PriorityTier::High => report.high_priority_gaps.push(cluster.skill.clone()),
                PriorityTier::Low => report.low_priority_gaps.push(cluster.skill.clone()),
            }
            *report
                .domain_breakdown
                .entry(cluster.category.clone())
                .or_insert(0) += 1;
        }

        log::info!(
            "Identified {} critical gaps out of {} clusters",
            report.critical_gaps.len(),
            report.clusters.len()
        );

        Ok(report)
    }

    fn priority_for(&self, penetration: f32, severity: f32, frequency: usize) -> PriorityTier {
        let gaps = &self.config.gaps;
        if penetration > gaps.critical_penetration_pct || severity >= gaps.critical_severity {
            PriorityTier::Critical
        } else if frequency > 1 {
            PriorityTier::High
        } else {
            PriorityTier::Low
        }
    }
}
