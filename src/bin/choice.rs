#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use choice_scorer::config::load_config_from_path;
use choice_scorer::engine::ScoringEngine;
use choice_scorer::report::{build_report, render_report_markdown, summarize, ReportOptions};
use choice_scorer::request::load_request_from_path;

#[derive(Parser)]
#[command(name = "choice", version, about = "Multi-criteria decision scorer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Md,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a request and write a report
    Score {
        #[arg(long)]
        request: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Overrides config.rng_seed
        #[arg(long)]
        seed: Option<u64>,
        /// Replaces the request's embedded config
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 10)]
        top_n: usize,
        #[arg(long)]
        no_breakdown: bool,
    },
    /// Validate a request and print the feasible option names
    Validate {
        #[arg(long)]
        request: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Score {
            request,
            out,
            format,
            seed,
            config,
            top_n,
            no_breakdown,
        } => {
            let mut req = load_request_from_path(&request)?;
            if let Some(path) = config {
                req.config = load_config_from_path(path)?;
            }
            let outcome = req.run(seed)?;
            let opts = ReportOptions {
                top_n,
                include_breakdown: !no_breakdown,
                ..Default::default()
            };
            let report = build_report(&req, &outcome, &opts);
            let body = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&report)?,
                OutputFormat::Md => render_report_markdown(&report),
            };
            let mut file = File::create(&out)?;
            file.write_all(body.as_bytes())?;
            eprintln!("[choice] {}", summarize(&outcome.decision));
            eprintln!("[choice] report written to {}", out.display());
        }
        Commands::Validate { request, config } => {
            let mut req = load_request_from_path(&request)?;
            if let Some(path) = config {
                req.config = load_config_from_path(path)?;
            }
            req.validate()?;
            let engine = ScoringEngine::from_config(&req.config)?;
            choice_scorer::types::validate_candidates(&req.options)?;
            let (kept, rejected) = engine.filter(&req.options);
            for opt in &kept {
                println!("{}", opt.name);
            }
            for r in &rejected {
                eprintln!("[choice] rejected {} ({})", r.option, r.constraint);
            }
        }
    }
    Ok(())
}
