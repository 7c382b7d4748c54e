use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::warn;

use crate::cli::input::{read_claim_file, read_segment_file};
use crate::cli::output::{
    cell, output_json, print_header, print_kv, print_success, print_table, print_warning,
    OutputMode,
};
use crate::config::PipelineConfig;
use crate::models::SourceType;
use crate::services::pipeline::ClaimPipeline;
use crate::services::report::write_reports;

/// Input locations for one `run` invocation.
pub struct RunInputs<'a> {
    pub video_id: &'a str,
    pub duration_minutes: f64,
    pub segments: &'a [PathBuf],
    pub counter: &'a [PathBuf],
    pub press: &'a [PathBuf],
    pub output_dir: &'a Path,
}

/// Read auxiliary claim files into the pipeline. Unreadable files are skipped.
fn add_claim_files(pipeline: &mut ClaimPipeline, source: SourceType, files: &[PathBuf]) {
    for path in files {
        match read_claim_file(path) {
            Ok(claims) => {
                pipeline.add_claims(source, &claims);
            }
            Err(e) => {
                warn!(file = %path.display(), "Skipping claim file: {}", e);
                print_warning(&format!("Skipping '{}': {}", path.display(), e));
            }
        }
    }
}

pub fn handle_run(inputs: &RunInputs<'_>, config: PipelineConfig, mode: OutputMode) -> Result<()> {
    if !inputs.duration_minutes.is_finite() || inputs.duration_minutes < 0.0 {
        anyhow::bail!("Duration must be a non-negative number of minutes");
    }
    if inputs.segments.is_empty() && inputs.counter.is_empty() && inputs.press.is_empty() {
        anyhow::bail!("Nothing to process. Pass at least one --segment, --counter or --press file");
    }

    let mut pipeline = ClaimPipeline::new(inputs.video_id, inputs.duration_minutes, config);

    let mut segments = Vec::with_capacity(inputs.segments.len());
    for path in inputs.segments {
        match read_segment_file(path) {
            Ok(segment) => segments.push(segment),
            Err(e) => {
                warn!(file = %path.display(), "Skipping segment: {}", e);
                print_warning(&format!("Skipping segment '{}': {}", path.display(), e));
            }
        }
    }
    if !segments.is_empty() {
        pipeline.add_segments(segments);
    }
    add_claim_files(&mut pipeline, SourceType::YoutubeCounter, inputs.counter);
    add_claim_files(&mut pipeline, SourceType::PressRelease, inputs.press);

    let run = pipeline.run();
    let paths = write_reports(inputs.output_dir, &run.report)
        .map_err(|e| anyhow::anyhow!("Failed to write reports: {}", e))?;

    match mode {
        OutputMode::Json => {
            output_json(&serde_json::json!({
                "report_file": paths.report,
                "final_claims_file": paths.final_claims,
                "report": run.report,
            }));
        }
        OutputMode::Human => {
            let report = &run.report;
            print_header(&format!("Claims for {}", report.video_id));
            print_kv("Budget", &report.max_claims.to_string());
            print_kv(
                "Candidates",
                &format!(
                    "{} ({} rejected)",
                    report.total_candidates, report.rejected_claims
                ),
            );
            print_kv(
                "Clustering",
                &format!(
                    "{} ({} clusters)",
                    report.clustering.strategy,
                    report.clustering.sizes.len()
                ),
            );
            print_kv(
                "Quartiles",
                &format!(
                    "{:?} -> {:?}",
                    report.candidate_quartiles, report.final_quartiles
                ),
            );
            println!();

            let rows: Vec<Vec<String>> = run
                .final_claims
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    vec![
                        (i + 1).to_string(),
                        c.global_id().to_string(),
                        c.timestamp().to_string(),
                        format!("{:.1}", c.ranking_score()),
                        c.cluster_size().map_or("-".to_string(), |s| s.to_string()),
                        cell(c.claim_text(), 70),
                    ]
                })
                .collect();
            print_table(&["#", "ID", "Time", "Score", "Cluster", "Claim"], rows);

            println!();
            print_success(&format!("Wrote {}", paths.report.display()));
            print_success(&format!("Wrote {}", paths.final_claims.display()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_writes_reports() {
        let dir = tempfile::tempdir().unwrap();
        let press = dir.path().join("press.json");
        std::fs::write(
            &press,
            r#"["The company states the formula was tested on 1,200 adults in 2021"]"#,
        )
        .unwrap();
        let out = dir.path().join("out");
        let press_files = vec![press];
        let inputs = RunInputs {
            video_id: "vid42",
            duration_minutes: 10.0,
            segments: &[],
            counter: &[],
            press: &press_files,
            output_dir: &out,
        };
        handle_run(&inputs, PipelineConfig::default(), OutputMode::Json).unwrap();
        assert!(out.join("vid42_claims_report.json").exists());
        assert!(out.join("vid42_final_claims.json").exists());
    }

    #[test]
    fn test_run_without_inputs_fails() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = RunInputs {
            video_id: "vid",
            duration_minutes: 10.0,
            segments: &[],
            counter: &[],
            press: &[],
            output_dir: dir.path(),
        };
        assert!(handle_run(&inputs, PipelineConfig::default(), OutputMode::Json).is_err());
    }
}
