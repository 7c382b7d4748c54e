//! Report persistence.
//!
//! A run produces two artifacts in the output directory:
//! `<video_id>_claims_report.json` (full diagnostics) and
//! `<video_id>_final_claims.json` (the selected claims only).

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::models::report::ProcessingReport;
use crate::SiftError;

/// Paths of the files written for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPaths {
    pub report: PathBuf,
    pub final_claims: PathBuf,
}

impl ReportPaths {
    pub fn for_video(output_dir: &Path, video_id: &str) -> Self {
        let stem = sanitize_file_stem(video_id);
        Self {
            report: output_dir.join(format!("{}_claims_report.json", stem)),
            final_claims: output_dir.join(format!("{}_final_claims.json", stem)),
        }
    }
}

/// Keep video ids usable as file names.
fn sanitize_file_stem(video_id: &str) -> String {
    let stem: String = video_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "video".to_string()
    } else {
        stem
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SiftError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)
        .map_err(|e| SiftError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

/// Write both report artifacts, creating `output_dir` if needed.
pub fn write_reports(output_dir: &Path, report: &ProcessingReport) -> Result<ReportPaths, SiftError> {
    std::fs::create_dir_all(output_dir).map_err(|e| {
        SiftError::Io(format!(
            "Failed to create output directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    let paths = ReportPaths::for_video(output_dir, &report.video_id);
    write_json(&paths.report, report)?;
    write_json(&paths.final_claims, &report.final_claims)?;

    info!(
        report = %paths.report.display(),
        claims = report.final_claims.len(),
        "Wrote claim reports"
    );
    Ok(paths)
}
