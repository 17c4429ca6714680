//! Job postings and requirement parsing
//!
//! Skill lists arrive pre-extracted from upstream (extraction is not part of
//! this engine); what gets parsed here are the years-of-experience figure
//! and the seniority level buried in the job text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// One job posting as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
}

impl Seniority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Seniority::Junior => "junior",
            Seniority::Mid => "mid-level",
            Seniority::Senior => "senior",
        }
    }
}

impl Default for Seniority {
    fn default() -> Self {
        Seniority::Mid
    }
}

/// Requirements derived from a posting: its skill lists plus the parsed
/// experience figure and seniority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequirements {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_years: u32,
    pub seniority: Seniority,
}

impl JobRequirements {
    pub fn from_posting(job: &JobPosting) -> Self {
        let text = format!("{} {}", job.description, job.title).to_lowercase();

        Self {
            required_skills: dedupe_skills(&job.required_skills),
            preferred_skills: dedupe_skills(&job.preferred_skills),
            experience_years: parse_experience_years(&text),
            seniority: parse_seniority(&text),
        }
    }
}

/// Case-insensitive dedup keeping first occurrences; duplicate listings
/// must not inflate the coverage denominator or the gap counts.
fn dedupe_skills(skills: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .iter()
        .filter(|skill| seen.insert(skill.to_lowercase()))
        .cloned()
        .collect()
}

fn experience_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(\d+)\+?\s*(?:years?|yrs?)[^.\n]*?experience").unwrap(),
            Regex::new(r"minimum[^.\n]*?(\d+)\s*(?:years?|yrs?)").unwrap(),
            Regex::new(r"at least[^.\n]*?(\d+)\s*(?:years?|yrs?)").unwrap(),
        ]
    })
}

/// Parse a years-required figure from job text; 0 when none is stated.
pub fn parse_experience_years(text: &str) -> u32 {
    for pattern in experience_patterns() {
        if let Some(caps) = pattern.captures(text) {
            if let Ok(years) = caps[1].parse::<u32>() {
                return years;
            }
        }
    }
    0
}

/// Detect seniority from the posting's wording.
pub fn parse_seniority(text: &str) -> Seniority {
    const SENIOR: &[&str] = &["senior", "lead", "principal", "staff"];
    const JUNIOR: &[&str] = &["junior", "entry", "graduate"];

    if SENIOR.iter().any(|w| text.contains(w)) {
        Seniority::Senior
    } else if JUNIOR.iter().any(|w| text.contains(w)) {
        Seniority::Junior
    } else {
        Seniority::Mid
    }
}
