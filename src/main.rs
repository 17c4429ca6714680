//! Skillscope: semantic skill matching and gap scoring for job search

mod analysis;
mod cli;
mod config;
mod embedding;
mod error;
mod output;
mod semantic;

use analysis::clusterer::SkillClusterer;
use analysis::requirements::JobPosting;
use analysis::scoring::{JobMatch, ResumeInput, ResumeProfile, ScoringEngine};
use clap::Parser;
use cli::{Cli, Commands, ConfigAction, ModelAction};
use config::{Config, OutputFormat};
use embedding::model_manager::ModelManager;
use error::{Result, SkillScopeError};
use log::{error, info};
use output::report::AnalysisReport;
use semantic::SemanticEngine;
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if !config.output.color_output {
        colored::control::set_override(false);
    }

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            jobs,
            embedding,
            detailed,
            output,
            save,
        } => {
            cli::validate_file_extension(&resume, &["json"])
                .map_err(|e| SkillScopeError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&jobs, &["json"])
                .map_err(|e| SkillScopeError::InvalidInput(format!("Jobs file: {}", e)))?;

            let output_format =
                cli::parse_output_format(&output).map_err(SkillScopeError::InvalidInput)?;

            let resume_input: ResumeInput =
                serde_json::from_str(&std::fs::read_to_string(&resume)?)?;
            let postings: Vec<JobPosting> =
                serde_json::from_str(&std::fs::read_to_string(&jobs)?)?;

            info!(
                "Analyzing {} candidate skills against {} job postings",
                resume_input.skills.len(),
                postings.len()
            );

            // Make sure the embedding model is on disk before loading it
            let mut model_manager = ModelManager::new(config.models.models_dir.clone()).await?;
            let model_id = match embedding {
                Some(requested) => model_manager.resolve_model_id(&requested).ok_or_else(|| {
                    SkillScopeError::ModelNotFound(format!(
                        "Unknown embedding model: {}",
                        requested
                    ))
                })?,
                None => config.models.default_embedding_model.clone(),
            };
            model_manager.ensure_model_available(&model_id).await?;
            config.models.default_embedding_model = model_id;

            let mut engine = SemanticEngine::from_config(&config)?;
            let report = run_analysis(&mut engine, &config, &resume_input, &postings)?;

            let rendered = match output_format {
                OutputFormat::Console => report.render_console(detailed || config.output.detailed),
                OutputFormat::Json => report.to_json()?,
            };

            match save {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }

            Ok(())
        }

        Commands::Models { action } => {
            let mut model_manager = ModelManager::new(config.models.models_dir.clone()).await?;
            match action {
                ModelAction::List => {
                    println!("Available embedding models:");
                    for (id, model) in model_manager.list_available_models() {
                        let status = if model_manager.is_model_downloaded(id) {
                            "downloaded"
                        } else {
                            "available"
                        };
                        println!(
                            "  {} — {} ({} MB, {} dims) [{}]",
                            id, model.description, model.size_mb, model.dimensions, status
                        );
                    }
                    Ok(())
                }
                ModelAction::Download { model } => {
                    let model_id = model_manager.resolve_model_id(&model).ok_or_else(|| {
                        SkillScopeError::ModelNotFound(format!("Unknown model: {}", model))
                    })?;
                    model_manager.download_model(&model_id).await?;
                    Ok(())
                }
                ModelAction::Remove { model } => {
                    let model_id = model_manager.resolve_model_id(&model).ok_or_else(|| {
                        SkillScopeError::ModelNotFound(format!("Unknown model: {}", model))
                    })?;
                    model_manager.remove_model(&model_id).await?;
                    println!("Removed model {}", model_id);
                    Ok(())
                }
            }
        }

        Commands::Config { action } => {
            match action.unwrap_or(ConfigAction::Show) {
                ConfigAction::Show => {
                    let content = toml::to_string_pretty(&config).map_err(|e| {
                        SkillScopeError::Configuration(format!("Failed to render config: {}", e))
                    })?;
                    println!("{}", content);
                }
                ConfigAction::Path => {
                    println!("{}", Config::config_path().display());
                }
                ConfigAction::Reset => {
                    let defaults = Config::default();
                    defaults.save()?;
                    println!("Configuration reset to defaults");
                }
            }
            Ok(())
        }
    }
}

/// Full analysis pipeline: profile, per-job scoring, then gap clustering.
fn run_analysis(
    engine: &mut SemanticEngine,
    config: &Config,
    resume_input: &ResumeInput,
    postings: &[JobPosting],
) -> Result<AnalysisReport> {
    let profile = ResumeProfile::build(engine, config, resume_input)?;
    let scorer = ScoringEngine::new(config);

    let mut matches: Vec<JobMatch> = Vec::with_capacity(postings.len());
    for posting in postings {
        matches.push(scorer.score_match(engine, &profile, posting)?);
    }

    let clusterer = SkillClusterer::new(config);
    let raw_gaps = SkillClusterer::collect_missing(&matches);
    let gaps = clusterer.analyze(engine, &raw_gaps, matches.len())?;

    Ok(AnalysisReport::new(&profile, matches, gaps))
}
