//! Rubricate CLI: build rubrics, manage weight configurations, and
//! consolidate rubric scores from the terminal.

mod args;
mod commands;

use clap::Parser;
use rubricate_core::{DomainCategory, EvaluationDimension, NormalizationMethod, RubricType};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::args::{parse_criterion, parse_key_value};

/// Rubricate: rubric-based scoring for LLM evaluation
#[derive(Parser, Debug)]
#[command(name = "rubricate", version, about, long_about = None)]
struct Cli {
    /// Workspace directory
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Normalize raw weights so they sum to 1.0
    Normalize {
        /// Weights as key=value (e.g. accuracy=2 style=1)
        #[arg(required = true, value_parser = parse_key_value)]
        weights: Vec<(String, f64)>,
    },
    /// Build, inspect, and list rubrics
    Rubric {
        #[command(subcommand)]
        action: RubricAction,
    },
    /// Browse domains
    Domain {
        #[command(subcommand)]
        action: DomainAction,
    },
    /// Create and list weight configurations
    Weights {
        #[command(subcommand)]
        action: WeightsAction,
    },
    /// Consolidate rubric scores under a weight configuration
    Consolidate {
        /// Weight configuration id
        config_id: String,

        /// Rubric score as rubric_id=value (0-100)
        #[arg(short, long = "score", value_parser = parse_key_value)]
        scores: Vec<(String, f64)>,

        /// Require a score for every configured rubric
        #[arg(long, conflicts_with = "renormalize")]
        strict: bool,

        /// Drop rubrics without a score and renormalize the rest
        #[arg(long)]
        renormalize: bool,

        /// Override the configuration's normalization method
        #[arg(long)]
        method: Option<NormalizationMethod>,
    },
    /// Merge a catalog file (.yaml, .toml, .json) into the workspace catalog
    Import {
        /// Path to the catalog spec file
        file: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum RubricAction {
    /// Build a rubric from criteria
    Build {
        /// Owning domain (omit for a shared rubric)
        #[arg(short, long)]
        domain: Option<String>,

        /// Rubric type (e.g. accuracy, code_quality)
        #[arg(short = 't', long = "type")]
        rubric_type: RubricType,

        /// Evaluation dimension
        #[arg(long, default_value = "response_quality")]
        dimension: EvaluationDimension,

        /// Rubric id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Criterion as name:weight[:description]
        #[arg(short, long = "criterion", required = true, value_parser = parse_criterion)]
        criteria: Vec<rubricate_core::CriterionSpec>,

        /// Store the rubric in the workspace catalog
        #[arg(long)]
        save: bool,
    },
    /// List rubrics in the catalog
    List {
        /// Only rubrics owned by this domain
        #[arg(short, long)]
        domain: Option<String>,

        #[arg(short = 't', long = "type")]
        rubric_type: Option<RubricType>,

        #[arg(long)]
        dimension: Option<EvaluationDimension>,
    },
    /// Show a rubric with its criteria
    Show {
        /// Rubric id
        id: String,
    },
    /// Instantiate the standard rubric templates for a domain
    Templates {
        /// Domain id
        domain_id: String,

        /// Store the rubrics in the workspace catalog
        #[arg(long)]
        save: bool,
    },
}

#[derive(clap::Subcommand, Debug)]
enum DomainAction {
    /// List domains
    List {
        #[arg(short, long)]
        category: Option<DomainCategory>,
    },
    /// Search domains by name or description
    Search {
        query: String,
    },
}

#[derive(clap::Subcommand, Debug)]
enum WeightsAction {
    /// Create a weight configuration from raw rubric weights
    Create {
        /// Configuration id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        #[arg(short, long)]
        name: Option<String>,

        /// Owning domain; every rubric must belong to it or be shared
        #[arg(short, long)]
        domain: Option<String>,

        /// Normalization method (defaults to consolidation.default_method)
        #[arg(short, long)]
        method: Option<NormalizationMethod>,

        /// Rubric weight as rubric_id=weight
        #[arg(short, long = "rubric", required = true, value_parser = parse_key_value)]
        rubrics: Vec<(String, f64)>,

        /// Store the configuration in the workspace catalog
        #[arg(long)]
        save: bool,
    },
    /// List weight configurations
    List {
        #[arg(short, long)]
        domain: Option<String>,
    },
    /// Show a weight configuration
    Show {
        id: String,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Write a default .rubricate/config.toml
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let config = rubricate_core::config::load_config(Some(&workspace), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Human-readable layer for stderr (always active)
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    // JSON file layer for structured logging
    let mut _guard = None;
    let json_layer = if config.logging.json_file {
        let log_dir = rubricate_core::config::log_dir().unwrap_or_else(|| PathBuf::from("."));
        let _ = std::fs::create_dir_all(&log_dir);
        let file_appender = tracing_appender::rolling::daily(&log_dir, "rubricate.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        _guard = Some(guard);
        Some(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new("debug")),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    for warning in config.validate() {
        tracing::warn!("{}", warning);
    }

    let ctx = commands::Context {
        workspace,
        config,
        json: cli.json,
    };
    commands::handle_command(cli.command, &ctx)
}
