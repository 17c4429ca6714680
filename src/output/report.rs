//! Console and JSON rendering of match results and the gap report

use crate::analysis::clusterer::{GapReport, PriorityTier};
use crate::analysis::scoring::{JobMatch, MatchQuality, ResumeProfile};
use crate::error::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Complete output of one analysis session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub total_jobs: usize,
    pub resume_skill_count: usize,
    /// Scored matches, best first.
    pub matches: Vec<JobMatch>,
    pub gaps: GapReport,
}

impl AnalysisReport {
    pub fn new(profile: &ResumeProfile, mut matches: Vec<JobMatch>, gaps: GapReport) -> Self {
        matches.sort_by(|a, b| {
            b.overall_score
                .partial_cmp(&a.overall_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Self {
            generated_at: Utc::now(),
            total_jobs: matches.len(),
            resume_skill_count: profile.inventory.total_skills(),
            matches,
            gaps,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render_console(&self, detailed: bool) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "\n{}", "=== Job Match Report ===".bold());
        let _ = writeln!(
            out,
            "{} jobs analyzed against {} resume skills\n",
            self.total_jobs, self.resume_skill_count
        );

        for (rank, job_match) in self.matches.iter().enumerate() {
            let score_pct = format!("{:.0}%", job_match.overall_score * 100.0);
            let quality = quality_colored(job_match.quality);
            let _ = writeln!(
                out,
                "{:>2}. {} at {} — {} ({})",
                rank + 1,
                job_match.job_title.bold(),
                if job_match.company.is_empty() {
                    "unknown company"
                } else {
                    &job_match.company
                },
                score_pct,
                quality
            );
            let _ = writeln!(out, "    {}", job_match.recommendation.dimmed());

            if job_match.skill_coverage.low_confidence {
                let _ = writeln!(
                    out,
                    "    {}",
                    "⚠ no extractable requirements — low confidence".yellow()
                );
            }

            if detailed {
                let coverage = &job_match.skill_coverage;
                let _ = writeln!(
                    out,
                    "    skills {:.0}% | experience {:.0}% | gap: {}",
                    coverage.required_coverage * 100.0,
                    job_match.experience.score * 100.0,
                    coverage.gap_severity.label()
                );
                for detail in &coverage.matched_required {
                    let _ = writeln!(
                        out,
                        "      ✓ {} (as {}, {:.2})",
                        detail.required.green(),
                        detail.matched_as,
                        detail.score
                    );
                }
                for missing in &coverage.missing_required {
                    let _ = writeln!(out, "      ✗ {}", missing.red());
                }
            }
        }

        if !self.gaps.clusters.is_empty() {
            let _ = writeln!(out, "\n{}", "=== Skill Gap Report ===".bold());
            let _ = writeln!(
                out,
                "{} gaps across {} jobs\n",
                self.gaps.clusters.len(),
                self.gaps.total_jobs
            );

            for cluster in &self.gaps.clusters {
                let priority = priority_colored(cluster.priority);
                let _ = writeln!(
                    out,
                    "  [{}] {} ({}) — in {:.0}% of jobs, severity {:.1}",
                    priority,
                    cluster.skill.bold(),
                    cluster.category,
                    cluster.market_penetration,
                    cluster.severity
                );
            }

            if !self.gaps.domain_breakdown.is_empty() {
                let _ = writeln!(out, "\n  By domain:");
                for (domain, count) in &self.gaps.domain_breakdown {
                    let _ = writeln!(out, "    {}: {}", domain, count);
                }
            }
        }

        out
    }
}

fn quality_colored(quality: MatchQuality) -> colored::ColoredString {
    match quality {
        MatchQuality::Excellent => "Excellent Match".green().bold(),
        MatchQuality::Strong => "Strong Match".cyan(),
        MatchQuality::Good => "Good Match".yellow(),
        MatchQuality::Weak => "Weak Match".red(),
    }
}

fn priority_colored(priority: PriorityTier) -> colored::ColoredString {
    match priority {
        PriorityTier::Critical => "CRITICAL".red().bold(),
        PriorityTier::High => "HIGH".yellow(),
        PriorityTier::Low => "LOW".dimmed(),
    }
}
