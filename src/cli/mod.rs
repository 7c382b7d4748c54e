//! CLI interface for verisift.

pub mod handlers;
pub mod input;
pub mod output;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{load_pipeline_config, resolve_data_path, PipelineConfig};
use output::OutputMode;

/// verisift - Reduce extracted video claims to a verification shortlist
#[derive(Parser)]
#[command(name = "verisift", version, about, long_about = None)]
pub struct Cli {
    /// Override data directory (default: ~/.verisift)
    #[arg(long, env = "VERISIFT_DATA_PATH", global = true)]
    pub data_path: Option<PathBuf>,

    /// Pipeline config file (TOML); replaces {data_path}/verisift.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Budget overrides shared by commands that derive a claim budget.
#[derive(Args, Debug, Clone, Default)]
pub struct BudgetArgs {
    /// Target claims per minute of video
    #[arg(long)]
    pub claims_per_minute: Option<f64>,

    /// Lower bound of the duration-derived budget
    #[arg(long)]
    pub min_claims: Option<usize>,

    /// Use exactly this budget instead of deriving it from duration
    #[arg(long)]
    pub max_claims: Option<usize>,
}

impl BudgetArgs {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(cpm) = self.claims_per_minute {
            config.claims_per_minute = cpm;
        }
        if let Some(min) = self.min_claims {
            config.min_claims = min;
        }
        if self.max_claims.is_some() {
            config.max_claims_override = self.max_claims;
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the claim pipeline for one video and write its reports
    Run {
        /// Video identifier, used to name the report files
        video_id: String,

        /// Video duration in minutes
        #[arg(long, short)]
        duration: f64,

        /// Per-segment extraction output files (JSON, optionally in a markdown fence)
        #[arg(long = "segment", value_name = "FILE")]
        segments: Vec<PathBuf>,

        /// Counter-narrative claim files (JSON or YAML)
        #[arg(long = "counter", value_name = "FILE")]
        counter: Vec<PathBuf>,

        /// Press release claim files (JSON or YAML)
        #[arg(long = "press", value_name = "FILE")]
        press: Vec<PathBuf>,

        /// Report directory (default: {data_path}/reports)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// K-means seed
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        budget: BudgetArgs,
    },

    /// Show the claim budget for a video duration
    Budget {
        /// Video duration in minutes
        duration: f64,

        #[command(flatten)]
        budget: BudgetArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, elvish, powershell)
        shell: clap_complete::Shell,
    },
}

/// Resolve the pipeline config for this invocation.
///
/// An explicit `--config` file must parse; otherwise the data-path lookup applies.
pub fn resolve_config(cli: &Cli) -> Result<PipelineConfig> {
    match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config '{}': {}", path.display(), e)),
        None => Ok(load_pipeline_config(&resolve_data_path(
            cli.data_path.clone(),
        ))),
    }
}

/// Execute a CLI command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mode = OutputMode::from_json_flag(cli.json);

    match &cli.command {
        Commands::Run {
            video_id,
            duration,
            segments,
            counter,
            press,
            output,
            seed,
            budget,
        } => {
            let mut config = resolve_config(cli)?;
            budget.apply(&mut config);
            if let Some(seed) = seed {
                config.clustering.seed = *seed;
            }
            let output_dir = output
                .clone()
                .unwrap_or_else(|| resolve_data_path(cli.data_path.clone()).join("reports"));
            let inputs = handlers::run::RunInputs {
                video_id,
                duration_minutes: *duration,
                segments,
                counter,
                press,
                output_dir: &output_dir,
            };
            handlers::run::handle_run(&inputs, config, mode)?
        }

        Commands::Budget { duration, budget } => {
            let mut config = resolve_config(cli)?;
            budget.apply(&mut config);
            handlers::budget::handle_budget(*duration, &config, mode)?
        }

        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "verisift", &mut std::io::stdout());
        }
    }

    Ok(())
}
