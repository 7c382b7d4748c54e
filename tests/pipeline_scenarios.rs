mod common;

use std::collections::HashSet;

use common::{keyword_pipeline, segment, spread_claims, RawClaimBuilder};
use pretty_assertions::assert_eq;
use verisift::config::PipelineConfig;
use verisift::models::{RawClaim, SourceType};
use verisift::services::fusion::fuse_segments;
use verisift::services::pipeline::ClaimPipeline;
use verisift::services::selection::quartile_counts;

#[test]
fn test_identical_segments_fuse_to_one_claim() {
    let text = "This tea melts 10 pounds of belly fat in a week";
    let segments = vec![
        segment("first", &[text]),
        segment("second", &[text]),
        segment("third", &[text]),
    ];
    let fused = fuse_segments(segments, &PipelineConfig::default().dedup);
    assert_eq!(fused.claims, vec![RawClaim::from(text)]);
    assert_eq!(fused.stats.exact_removed, 2);
    assert!(fused.initial_report.contains("[Segment 3]"));
}

#[test]
fn test_hour_long_video_budget_is_capped() {
    let pipeline = ClaimPipeline::new("long", 60.0, PipelineConfig::default());
    assert_eq!(pipeline.max_claims(), 40);
}

#[test]
fn test_leaked_field_prefix_is_removed_end_to_end() {
    let mut pipeline = keyword_pipeline("vid", 10.0, PipelineConfig::default());
    let raw: RawClaim = serde_json::from_str(
        r#"{"claim_text": "claim_text This supplement cures diabetes in 3 days"}"#,
    )
    .unwrap();
    pipeline.add_claims(SourceType::VideoAnalysis, &[raw]);
    let run = pipeline.run();
    assert_eq!(run.final_claims.len(), 1);
    assert_eq!(
        run.final_claims[0].claim_text(),
        "This supplement cures diabetes in 3 days"
    );
}

#[test]
fn test_tiny_claim_dropped_regardless_of_fields() {
    let mut pipeline = keyword_pipeline("vid", 10.0, PipelineConfig::default());
    let accepted = pipeline.add_claims(
        SourceType::VideoAnalysis,
        &[RawClaimBuilder::new("ok")
            .at("01:00")
            .by("Dr. Jane Smith")
            .assessed("False and dangerous")
            .build()],
    );
    assert_eq!(accepted, 0);
    let run = pipeline.run();
    assert!(run.final_claims.is_empty());
    assert_eq!(run.report.rejected_claims, 1);
}

#[test]
fn test_under_budget_every_claim_is_its_own_cluster() {
    let mut pipeline = ClaimPipeline::new("vid", 10.0, PipelineConfig::default());
    pipeline.add_claims(SourceType::VideoAnalysis, &spread_claims(5, 10.0));
    let run = pipeline.run();
    assert_eq!(run.report.clustering.strategy, "singleton");
    assert_eq!(run.report.clustering.sizes, vec![1; 5]);
    assert_eq!(run.final_claims.len(), 5);
    assert!(run.final_claims.iter().all(|c| c.cluster_size() == Some(1)));
}

#[test]
fn test_global_ids_unique_across_sources() {
    let mut pipeline = keyword_pipeline("vid", 30.0, PipelineConfig::default());
    pipeline.add_claims(SourceType::PressRelease, &spread_claims(4, 30.0));
    pipeline.add_claims(SourceType::VideoAnalysis, &spread_claims(6, 30.0));
    pipeline.add_claims(SourceType::YoutubeCounter, &spread_claims(3, 30.0));
    pipeline.add_claims(SourceType::YoutubeCounter, &spread_claims(2, 30.0));
    let run = pipeline.run();

    assert_eq!(run.report.total_candidates, 15);
    assert_eq!(run.report.source_counts[&SourceType::YoutubeCounter], 5);
    let ids: HashSet<&str> = run.final_claims.iter().map(|c| c.global_id()).collect();
    assert_eq!(ids.len(), run.final_claims.len());
}

#[test]
fn test_same_claim_from_two_sources_is_kept_twice() {
    let text = "The supplement contains 400mg of caffeine per serving";
    let mut pipeline = keyword_pipeline("vid", 10.0, PipelineConfig::default());
    pipeline.add_claims(SourceType::VideoAnalysis, &[RawClaim::from(text)]);
    pipeline.add_claims(SourceType::PressRelease, &[RawClaim::from(text)]);
    let run = pipeline.run();
    let ids: Vec<&str> = run.final_claims.iter().map(|c| c.global_id()).collect();
    assert_eq!(ids, vec!["video_0", "press_0"]);
}

#[test]
fn test_scores_equal_breakdown_sums() {
    let mut pipeline = ClaimPipeline::new("vid", 45.0, PipelineConfig::default());
    pipeline.add_claims(SourceType::VideoAnalysis, &spread_claims(60, 45.0));
    let run = pipeline.run();
    assert!(!run.final_claims.is_empty());
    for claim in &run.final_claims {
        let sum: f64 = claim.scoring_breakdown().entries().iter().map(|(_, v)| v).sum();
        assert_eq!(claim.ranking_score(), sum);
    }
}

#[test]
fn test_final_claims_sorted_and_within_budget() {
    let mut pipeline = ClaimPipeline::new("vid", 60.0, PipelineConfig::default());
    pipeline.add_claims(SourceType::VideoAnalysis, &spread_claims(120, 60.0));
    pipeline.add_claims(SourceType::YoutubeCounter, &spread_claims(30, 60.0));
    let run = pipeline.run();
    assert!(run.final_claims.len() <= 40);
    assert!(run
        .final_claims
        .windows(2)
        .all(|w| w[0].ranking_score() >= w[1].ranking_score()));
}

#[test]
fn test_every_quartile_represented() {
    let config = PipelineConfig {
        max_claims_override: Some(6),
        ..Default::default()
    };
    let mut pipeline = keyword_pipeline("vid", 40.0, config);
    // Front-loaded: most claims in the first quartile, a few later
    let mut raw = Vec::new();
    for i in 0..30 {
        raw.push(
            RawClaimBuilder::new(format!(
                "Early claim {i}: the FDA approved this supplement after a clinical trial"
            ))
            .at(format!("{:02}:{:02}", i / 6, (i * 7) % 60))
            .by("Dr. Jane Smith")
            .build(),
        );
    }
    raw.push(RawClaimBuilder::new("Later the host says the moon landing was staged").at("12:00").build());
    raw.push(RawClaimBuilder::new("A viewer reports nothing changed at all").at("25:00").build());
    raw.push(RawClaimBuilder::new("The ending claims aliens built the pyramids").at("38:30").build());
    pipeline.add_claims(SourceType::VideoAnalysis, &raw);

    let run = pipeline.run();
    assert_eq!(run.report.candidate_quartiles, [30, 1, 1, 1]);
    let coverage = quartile_counts(&run.final_claims, 40.0);
    assert_eq!(run.final_claims.len(), 6);
    assert!(coverage.iter().all(|&c| c >= 1), "coverage was {coverage:?}");
    assert!(run.report.temporal_reconciliation);
}

#[test]
fn test_runs_are_deterministic() {
    let build = || {
        let mut pipeline = ClaimPipeline::new("vid", 50.0, PipelineConfig::default());
        pipeline.add_claims(SourceType::VideoAnalysis, &spread_claims(90, 50.0));
        pipeline.add_claims(SourceType::PressRelease, &spread_claims(10, 50.0));
        pipeline
    };
    let first = build().run();
    let second = build().run();
    assert_eq!(first.final_claims, second.final_claims);
    assert_eq!(first.report.clustering, second.report.clustering);
}

#[test]
fn test_empty_input_yields_empty_report() {
    let run = ClaimPipeline::new("nothing", 25.0, PipelineConfig::default()).run();
    assert!(run.final_claims.is_empty());
    assert_eq!(run.report.total_candidates, 0);
    assert_eq!(run.report.final_quartiles, [0; 4]);
    assert_eq!(run.report.max_claims, 25);
}
