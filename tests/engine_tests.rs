//! Integration tests for the semantic matching and gap scoring pipeline
//!
//! All tests run against a deterministic stub embedder with hand-crafted
//! vectors, so similarity values are exact and no model download is needed.

use skillscope::analysis::clusterer::SkillClusterer;
use skillscope::analysis::requirements::{JobPosting, Seniority};
use skillscope::analysis::scoring::{
    GapSeverity, MatchQuality, ResumeInput, ResumeProfile, ScoringEngine,
};
use skillscope::config::Config;
use skillscope::embedding::TextEmbedder;
use skillscope::semantic::SemanticEngine;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const DIM: usize = 12;

/// Stub embedder over a fixed vector table, counting model invocations.
struct StubEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    calls: Arc<AtomicUsize>,
}

impl StubEmbedder {
    fn new(entries: &[(&str, Vec<f32>)]) -> Self {
        Self {
            vectors: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn lookup(&self, text: &str) -> Vec<f32> {
        if let Some(v) = self.vectors.get(text) {
            return v.clone();
        }
        let mut v = vec![0.0; DIM];
        let h: usize = text.bytes().map(|b| b as usize).sum();
        v[h % DIM] = 0.01;
        v
    }
}

impl TextEmbedder for StubEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(text)
    }

    fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        texts.iter().map(|t| self.lookup(t)).collect()
    }
}

fn axis(i: usize, value: f32) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[i] = value;
    v
}

/// A skill vector: some mass on the skill-anchor axis (0), some on its
/// category axis, and a dominant identity axis so distinct skills stay far
/// apart.
fn skill_vector(category_axis: usize, identity_axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[0] = 0.5;
    v[category_axis] = 0.3;
    v[identity_axis] = 1.0;
    v
}

/// Build an engine over a vocabulary where:
/// axis 0 = "is a technical skill", axes 1-5 = the five default categories,
/// axes 6+ = per-skill identities.
fn test_engine(config: &Config) -> (SemanticEngine, Arc<AtomicUsize>) {
    let mut entries: Vec<(&str, Vec<f32>)> = Vec::new();
    for phrase in &config.anchors.skill_anchors {
        entries.push((phrase.as_str(), axis(0, 1.0)));
    }
    for (i, cat) in config.anchors.categories.iter().enumerate() {
        entries.push((cat.definition.as_str(), axis(1 + i, 1.0)));
    }

    // Programming skills on axis 1, Cloud & DevOps on axis 4
    entries.push(("Python", skill_vector(1, 6)));
    entries.push(("Kubernetes", skill_vector(4, 7)));
    entries.push(("Docker", skill_vector(4, 8)));
    entries.push(("Go", skill_vector(1, 9)));
    entries.push(("AWS", skill_vector(4, 10)));

    // "Amazon Web Services" sits almost on top of AWS
    let mut amazon = skill_vector(4, 10);
    amazon[11] = 0.05;
    entries.push(("Amazon Web Services", amazon));

    // Azure is cloud but its own identity
    entries.push(("Azure", skill_vector(4, 11)));

    let embedder = StubEmbedder::new(&entries);
    let calls = embedder.calls.clone();
    let engine = SemanticEngine::new(Box::new(embedder), config).unwrap();
    (engine, calls)
}

fn resume_input(skills: &[&str], years: u32) -> ResumeInput {
    ResumeInput {
        skills: skills.iter().map(|s| s.to_string()).collect(),
        text: String::new(),
        years_experience: years,
        seniority: Seniority::Mid,
        role: None,
    }
}

fn posting(title: &str, required: &[&str]) -> JobPosting {
    JobPosting {
        title: title.to_string(),
        company: "Acme".to_string(),
        location: String::new(),
        url: String::new(),
        description: String::new(),
        required_skills: required.iter().map(|s| s.to_string()).collect(),
        preferred_skills: vec![],
    }
}

#[test]
fn similarity_is_symmetric() {
    let config = Config::default();
    let (mut engine, _) = test_engine(&config);

    let ab = engine.similarity("Python", "Kubernetes").unwrap();
    let ba = engine.similarity("Kubernetes", "Python").unwrap();
    assert_eq!(ab, ba);
}

#[test]
fn batch_validation_agrees_with_single() {
    let config = Config::default();
    let candidates: Vec<String> = ["Python", "Kubernetes", "zzz unrelated phrase", "x"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let threshold = config.matching.skill_validation_threshold;

    let (mut engine, _) = test_engine(&config);
    let batched = engine.filter_skills(&candidates, threshold).unwrap();

    let (mut engine, _) = test_engine(&config);
    let singles: Vec<String> = candidates
        .iter()
        .filter(|c| engine.is_technical_skill(c, threshold).unwrap())
        .cloned()
        .collect();

    assert_eq!(batched, singles);
    assert!(batched.contains(&"Python".to_string()));
    assert!(!batched.contains(&"x".to_string()));
}

#[test]
fn find_best_match_threshold_monotonicity() {
    let config = Config::default();
    let (mut engine, _) = test_engine(&config);
    let options = vec!["Kubernetes".to_string(), "Go".to_string()];

    let mut matched_at_higher = false;
    for threshold in [0.95, 0.7, 0.4, 0.1, 0.0] {
        let record = engine.find_best_match("Docker", &options, threshold).unwrap();
        if matched_at_higher {
            assert!(record.is_match(), "lost match when lowering to {}", threshold);
        }
        matched_at_higher |= record.is_match();
    }
    assert!(matched_at_higher);
}

#[test]
fn empty_options_never_touch_the_model() {
    let config = Config::default();
    let (mut engine, calls) = test_engine(&config);
    let baseline = calls.load(Ordering::SeqCst);

    let record = engine.find_best_match("K8s", &[], 0.0).unwrap();

    assert!(!record.is_match());
    assert_eq!(record.score, 0.0);
    assert_eq!(calls.load(Ordering::SeqCst), baseline);
}

#[test]
fn scenario_k8s_resolves_to_kubernetes() {
    // Embedding space pinned to the spec'd similarities:
    // sim(K8s, Kubernetes) = 0.82, sim(K8s, Java) = 0.10
    let config = Config::default();
    let s = 0.82_f32;
    let t = 0.10_f32;
    let mut k8s = vec![0.0; DIM];
    k8s[6] = s;
    k8s[7] = t;
    k8s[8] = (1.0 - s * s - t * t).sqrt();

    let embedder = StubEmbedder::new(&[
        ("Kubernetes", axis(6, 1.0)),
        ("Java", axis(7, 1.0)),
        ("K8s", k8s),
    ]);
    let mut engine = SemanticEngine::new(Box::new(embedder), &config).unwrap();

    let options = vec!["Kubernetes".to_string(), "Java".to_string()];
    let record = engine.find_best_match("K8s", &options, 0.65).unwrap();

    assert_eq!(record.matched.as_deref(), Some("Kubernetes"));
    assert!((record.score - 0.82).abs() < 1e-4);
}

#[test]
fn scenario_partial_coverage_is_significant_gap() {
    let config = Config::default();
    let (mut engine, _) = test_engine(&config);

    let profile = ResumeProfile::build(
        &mut engine,
        &config,
        &resume_input(&["Python", "Kubernetes"], 5),
    )
    .unwrap();
    assert_eq!(profile.inventory.total_skills(), 2);

    let scorer = ScoringEngine::new(&config);
    let job = posting("Backend Engineer", &["Python", "Docker", "Go"]);
    let job_match = scorer.score_match(&mut engine, &profile, &job).unwrap();

    let coverage = &job_match.skill_coverage;
    // Python matches exactly; Docker and Go find nothing above 0.70
    assert_eq!(coverage.matched_required.len(), 1);
    assert_eq!(coverage.matched_required[0].required, "Python");
    assert!((coverage.required_coverage - 1.0 / 3.0).abs() < 1e-4);
    assert_eq!(
        coverage.missing_required,
        vec!["Docker".to_string(), "Go".to_string()]
    );
    assert_eq!(coverage.gap_severity, GapSeverity::Significant);
    assert!(!coverage.low_confidence);
}

#[test]
fn job_without_requirements_is_low_confidence_not_perfect() {
    let config = Config::default();
    let (mut engine, _) = test_engine(&config);

    let profile =
        ResumeProfile::build(&mut engine, &config, &resume_input(&["Python"], 5)).unwrap();
    let scorer = ScoringEngine::new(&config);
    let job = posting("Mystery Role", &[]);

    let job_match = scorer.score_match(&mut engine, &profile, &job).unwrap();

    assert!(job_match.skill_coverage.low_confidence);
    assert_eq!(job_match.skill_coverage.required_coverage, 0.0);
    assert_eq!(job_match.skill_coverage.gap_severity, GapSeverity::None);
}

#[test]
fn scenario_gap_clustering_merges_synonyms_only() {
    let config = Config::default();
    let (mut engine, _) = test_engine(&config);
    let clusterer = SkillClusterer::new(&config);

    let raw: HashMap<String, usize> = [
        ("AWS".to_string(), 5),
        ("Amazon Web Services".to_string(), 2),
        ("Azure".to_string(), 3),
    ]
    .into_iter()
    .collect();

    let report = clusterer.analyze(&mut engine, &raw, 10).unwrap();

    // Two clusters, never three, never one
    assert_eq!(report.clusters.len(), 2);
    let aws = report.clusters.iter().find(|c| c.skill == "AWS").unwrap();
    assert_eq!(aws.frequency, 7);
    let azure = report.clusters.iter().find(|c| c.skill == "Azure").unwrap();
    assert_eq!(azure.frequency, 3);

    // Conservation: no mention lost or double-counted
    let total: usize = report.clusters.iter().map(|c| c.frequency).sum();
    assert_eq!(total, 10);
}

#[test]
fn full_pipeline_produces_ranked_matches_and_gap_report() {
    let config = Config::default();
    let (mut engine, _) = test_engine(&config);

    let profile = ResumeProfile::build(
        &mut engine,
        &config,
        &resume_input(&["Python", "Kubernetes"], 6),
    )
    .unwrap();
    let scorer = ScoringEngine::new(&config);

    let postings = vec![
        posting("Platform Engineer", &["Python", "Kubernetes"]),
        posting("Cloud Engineer", &["AWS", "Kubernetes"]),
        posting("Data Engineer", &["Python", "AWS", "Azure"]),
    ];

    let mut matches = Vec::new();
    for job in &postings {
        matches.push(scorer.score_match(&mut engine, &profile, job).unwrap());
    }

    // Perfect coverage beats partial coverage
    let perfect = matches
        .iter()
        .find(|m| m.job_title == "Platform Engineer")
        .unwrap();
    assert_eq!(perfect.skill_coverage.required_coverage, 1.0);
    assert_eq!(perfect.skill_coverage.gap_severity, GapSeverity::None);
    assert!(matches
        .iter()
        .all(|m| m.overall_score <= perfect.overall_score + 1e-6));
    assert!(perfect.quality != MatchQuality::Weak);

    // Missing AWS in two jobs, Azure in one
    let clusterer = SkillClusterer::new(&config);
    let raw = SkillClusterer::collect_missing(&matches);
    let report = clusterer.analyze(&mut engine, &raw, matches.len()).unwrap();

    let aws = report.clusters.iter().find(|c| c.skill == "AWS").unwrap();
    assert_eq!(aws.frequency, 2);
    assert_eq!(aws.category, "Cloud & DevOps");
    // 2 of 3 jobs ask for it: above the 40% critical penetration line
    assert!(report.critical_gaps.contains(&"AWS".to_string()));
}
