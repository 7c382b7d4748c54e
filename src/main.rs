//! verisift - Reduce extracted video claims to a verification shortlist
//!
//! Usage:
//!   verisift run <video_id> -d 42 --segment seg1.json --press press.yaml
//!   verisift budget 60           Show the claim budget for a 60 minute video
//!   verisift completions zsh     Generate shell completions
//!   verisift --help              Show all commands

use anyhow::Result;
use clap::Parser;

use verisift::cli::{execute, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing to stderr so --json output stays clean on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("verisift=info".parse()?),
        )
        .init();

    execute(&cli)
}
