//! `spam-detector` — classify emails as spam or safe and explain their lexical risk.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialise logging.
//! 2. Load config ([`config::load_config`]).
//! 3. `train`: read a labeled CSV ([`dataset`]), fit ([`pipeline::training`]), save the
//!    [`model::artifact::ModelArtifact`].
//! 4. `predict`: load the artifact once, classify ([`pipeline::inference`]) and assess
//!    ([`risk::scorer`]) one email.
//! 5. `batch`: validate the CSV, score every record in parallel ([`batch`]), write or
//!    render the results ([`report`]).
//! 6. Any error exits with code `1`.

mod batch;
mod cli;
mod config;
mod dataset;
mod error;
mod model;
mod models;
mod pipeline;
mod report;
mod risk;
mod text;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cli::{BatchFormat, Cli, Command, ReportFormat};
use config::{load_config, Config};
use model::artifact::ModelArtifact;
use pipeline::inference::InferencePipeline;
use pipeline::training::TrainingPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = load_config(&cwd, cli.config.as_deref())?;
    let model_path = cli
        .model
        .clone()
        .unwrap_or_else(|| config.model.path.clone());

    match cli.command {
        Command::Train {
            data,
            out,
            seed,
            test_ratio,
        } => {
            let out = out.unwrap_or(model_path);
            train(&config, &data, &out, seed, test_ratio, cli.quiet)
        }
        Command::Predict { text, file, report } => {
            let raw = match (text, file) {
                (Some(text), _) => text,
                (None, Some(file)) => std::fs::read_to_string(&file)
                    .with_context(|| format!("reading {}", file.display()))?,
                (None, None) => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            predict(&config, &model_path, &raw, report, cli.quiet)
        }
        Command::Batch {
            input,
            output,
            report,
        } => {
            run_batch(
                &config,
                &model_path,
                &input,
                output.as_deref(),
                report,
                cli.verbose,
                cli.quiet,
            )
            .await
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` / `-q` pick the crate's level.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "spam_detector=debug"
    } else if quiet {
        "spam_detector=warn"
    } else {
        "spam_detector=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn train(
    config: &Config,
    data: &Path,
    out: &Path,
    seed: Option<u64>,
    test_ratio: Option<f64>,
    quiet: bool,
) -> Result<()> {
    let mut training = config.training;
    if let Some(seed) = seed {
        training.seed = seed;
    }
    if let Some(ratio) = test_ratio {
        training.test_ratio = ratio;
    }

    let corpus = dataset::load_corpus(data)
        .with_context(|| format!("loading training data from {}", data.display()))?;

    if !quiet {
        eprintln!(
            "  {} {} labeled emails from {}",
            "→".cyan(),
            corpus.len(),
            data.display()
        );
    }

    let artifact = TrainingPipeline::new(training).fit(&corpus)?;
    artifact
        .save(out)
        .with_context(|| format!("saving model to {}", out.display()))?;

    report::terminal::render_training(&artifact.metadata, out, quiet);
    Ok(())
}

fn load_model(path: &Path) -> Result<ModelArtifact> {
    ModelArtifact::load(path).with_context(|| {
        format!(
            "loading model from {} (run `spam-detector train` first)",
            path.display()
        )
    })
}

fn predict(
    config: &Config,
    model_path: &Path,
    raw: &str,
    report: ReportFormat,
    quiet: bool,
) -> Result<()> {
    let artifact = load_model(model_path)?;
    let scorer = config.risk.scorer()?;

    if raw.trim().is_empty() && !quiet {
        eprintln!("  {} empty email text, prediction uses class priors only", "⚠".yellow());
    }

    let prediction = InferencePipeline::new(&artifact).predict(raw);
    let risk = scorer.assess(raw);

    match report {
        ReportFormat::Terminal => {
            report::terminal::render_prediction(raw, &prediction, &risk, quiet);
        }
        ReportFormat::Json => {
            let body = serde_json::json!({
                "label": prediction.label,
                "confidence": prediction.confidence,
                "posteriors": prediction.posteriors,
                "risk": risk,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

async fn run_batch(
    config: &Config,
    model_path: &Path,
    input_path: &Path,
    output: Option<&Path>,
    report: BatchFormat,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    // structural problems reject the whole file before anything is scored
    let input = dataset::load_batch(input_path)
        .with_context(|| format!("reading batch input {}", input_path.display()))?;
    let headers = input.headers.clone();

    let artifact = Arc::new(load_model(model_path)?);
    let scorer = Arc::new(config.risk.scorer()?);

    if !quiet {
        eprintln!(
            "  {} scoring {} records from {}",
            "→".cyan(),
            input.len(),
            input_path.display()
        );
    }

    let progress = if !quiet {
        let pb = ProgressBar::new(input.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let records =
        batch::score_batch(artifact, scorer, input, config.batch.chunk_size, progress).await?;

    match report {
        BatchFormat::Terminal => {
            report::terminal::render_batch(&records, input_path, verbose, quiet)?;
        }
        BatchFormat::Json => {
            let body = serde_json::to_string_pretty(&records)?;
            match output {
                Some(path) => std::fs::write(path, body)?,
                None => println!("{}", body),
            }
        }
        BatchFormat::Csv => match output {
            Some(path) => {
                dataset::write_batch(std::fs::File::create(path)?, &headers, &records)?;
                if !quiet {
                    eprintln!("  {} wrote {}", "✓".green(), path.display());
                }
            }
            None => dataset::write_batch(std::io::stdout().lock(), &headers, &records)?,
        },
    }

    Ok(())
}
