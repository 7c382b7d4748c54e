use anyhow::Result;

use crate::cli::output::{output_json, print_header, print_hint, print_kv, OutputMode};
use crate::config::PipelineConfig;
use crate::services::budget::calculate_max_claims;

pub fn handle_budget(duration_minutes: f64, config: &PipelineConfig, mode: OutputMode) -> Result<()> {
    if !duration_minutes.is_finite() || duration_minutes < 0.0 {
        anyhow::bail!("Duration must be a non-negative number of minutes");
    }

    let max_claims = calculate_max_claims(
        duration_minutes,
        config.claims_per_minute,
        config.min_claims,
        config.max_claims_override,
    );

    match mode {
        OutputMode::Json => {
            output_json(&serde_json::json!({
                "duration_minutes": duration_minutes,
                "claims_per_minute": config.claims_per_minute,
                "min_claims": config.min_claims,
                "max_claims_override": config.max_claims_override,
                "max_claims": max_claims,
            }));
        }
        OutputMode::Human => {
            print_header("Claim budget");
            print_kv("Duration", &format!("{} min", duration_minutes));
            print_kv("Claims per minute", &config.claims_per_minute.to_string());
            print_kv("Floor", &config.min_claims.to_string());
            print_kv("Max claims", &max_claims.to_string());
            if config.max_claims_override.is_some() {
                print_hint("Budget set explicitly with --max-claims or max_claims_override");
            }
        }
    }

    Ok(())
}
