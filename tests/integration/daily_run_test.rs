// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use arxiv_daily::application::bootstrap::build_daily_run;
use arxiv_daily::application::use_cases::daily_run::RunError;
use arxiv_daily::config::settings::{AnalysisFailurePolicy, AnalysisProvider};
use arxiv_daily::domain::models::analysis::AnalysisResult;
use arxiv_daily::domain::models::run::RunStage;
use arxiv_daily::utils::errors::ReportError;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::*;

#[tokio::test]
async fn test_full_run_writes_all_artifacts() {
    let arxiv = MockServer::start().await;
    mount_feed(&arxiv, day_feed(12)).await;
    let out = TempDir::new().unwrap();
    let settings = test_settings(&arxiv, out.path());

    let summary = build_daily_run(&settings)
        .unwrap()
        .run(run_at())
        .await
        .unwrap();

    assert_eq!(summary.target_date.to_string(), "2025-01-15");
    assert_eq!(summary.collected, 12);
    assert_eq!(summary.ranked, 10);
    assert!(!summary.artifacts.email_sent);
    assert_eq!(summary.artifacts.failed_analyses, 0);

    // CSV keyed by run date
    assert_eq!(
        summary.csv_path,
        out.path().join("daily_top10").join("top10_20250116.csv")
    );
    let csv = std::fs::read_to_string(&summary.csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(
        lines[0],
        "rank,title,url,score,authors,categories,published,updated,abstract"
    );
    assert!(lines[1].starts_with("1,"));
    // keyword-heavy titles outrank the rest
    assert!(lines[1].contains("Large Language Model Agents"));

    // JSON keyed by run timestamp, ordered by rank
    assert_eq!(
        summary.artifacts.analysis_json,
        out.path()
            .join("analysis")
            .join("analysis_results_20250116_060000.json")
    );
    let text = std::fs::read_to_string(&summary.artifacts.analysis_json).unwrap();
    let results: Vec<AnalysisResult> = serde_json::from_str(&text).unwrap();
    assert_eq!(results.len(), 10);
    let ranks: Vec<u32> = results.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, (1..=10).collect::<Vec<u32>>());
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(results.iter().all(|r| r.submission_date == "2025-01-15"));
    assert_eq!(results[0].text_field("summary"), Some("We propose a method."));

    // HTML report
    assert_eq!(
        summary.artifacts.report_html,
        out.path().join("reports").join("report_20250116_060000.html")
    );
    let html = std::fs::read_to_string(&summary.artifacts.report_html).unwrap();
    assert!(html.contains("arXiv cs.AI daily top 10 for 2025-01-15"));
}

#[tokio::test]
async fn test_empty_day_writes_empty_artifacts_and_sends_no_email() {
    let arxiv = MockServer::start().await;
    // the older paper only extends the window and is itself skipped
    mount_feed(&arxiv, day_feed(0)).await;
    let out = TempDir::new().unwrap();
    let mut settings = test_settings(&arxiv, out.path());
    enable_unreachable_email(&mut settings);

    let summary = build_daily_run(&settings)
        .unwrap()
        .run(run_at())
        .await
        .unwrap();

    assert_eq!(summary.collected, 0);
    assert_eq!(summary.ranked, 0);
    assert!(!summary.artifacts.email_sent);
    let json = std::fs::read_to_string(&summary.artifacts.analysis_json).unwrap();
    assert_eq!(json, "[]");
    let html = std::fs::read_to_string(&summary.artifacts.report_html).unwrap();
    assert!(html.contains("No papers were found"));
    let csv = std::fs::read_to_string(&summary.csv_path).unwrap();
    assert_eq!(csv.lines().count(), 1);
}

#[tokio::test]
async fn test_feed_failure_before_any_paper_fails_collection() {
    let arxiv = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&arxiv)
        .await;
    let out = TempDir::new().unwrap();
    let settings = test_settings(&arxiv, out.path());

    let err = build_daily_run(&settings)
        .unwrap()
        .run(run_at())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), RunStage::Collecting);
    assert!(matches!(err, RunError::Collection(_)));
    assert!(!out.path().join("analysis").exists());
}

#[tokio::test]
async fn test_llm_failures_are_kept_as_placeholders() {
    let arxiv = MockServer::start().await;
    mount_feed(&arxiv, day_feed(3)).await;
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .expect(3)
        .mount(&llm)
        .await;
    let out = TempDir::new().unwrap();
    let mut settings = test_settings(&arxiv, out.path());
    settings.analysis.provider = AnalysisProvider::Llm;
    settings.analysis.api_key = Some("sk-test".into());
    settings.analysis.api_base_url = format!("{}/v1", llm.uri());

    let summary = build_daily_run(&settings)
        .unwrap()
        .run(run_at())
        .await
        .unwrap();

    assert_eq!(summary.artifacts.failed_analyses, 3);
    let text = std::fs::read_to_string(&summary.artifacts.analysis_json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value[0]["outcome"]["status"], json!("failed"));
}

#[tokio::test]
async fn test_llm_abort_policy_stops_after_csv() {
    let arxiv = MockServer::start().await;
    mount_feed(&arxiv, day_feed(3)).await;
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&llm)
        .await;
    let out = TempDir::new().unwrap();
    let mut settings = test_settings(&arxiv, out.path());
    settings.analysis.provider = AnalysisProvider::Llm;
    settings.analysis.api_key = Some("sk-test".into());
    settings.analysis.api_base_url = format!("{}/v1", llm.uri());
    settings.analysis.failure_policy = AnalysisFailurePolicy::Abort;

    let err = build_daily_run(&settings)
        .unwrap()
        .run(run_at())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), RunStage::Analyzing);
    assert!(out.path().join("daily_top10").join("top10_20250116.csv").exists());
    assert!(!out.path().join("analysis").exists());
}

#[tokio::test]
async fn test_llm_analysis_is_persisted() {
    let arxiv = MockServer::start().await;
    mount_feed(&arxiv, day_feed(2)).await;
    let llm = MockServer::start().await;
    let content = json!({
        "summary": "A planning agent.",
        "key_contributions": ["new planner"],
        "methodology": "search",
        "strengths": ["simple"],
        "limitations": ["small eval"],
        "significance": "moderate",
        "relevance_score": 7
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": format!("```json\n{}\n```", content) } }]
        })))
        .mount(&llm)
        .await;
    let out = TempDir::new().unwrap();
    let mut settings = test_settings(&arxiv, out.path());
    settings.analysis.provider = AnalysisProvider::Llm;
    settings.analysis.api_key = Some("sk-test".into());
    settings.analysis.api_base_url = format!("{}/v1", llm.uri());

    let summary = build_daily_run(&settings)
        .unwrap()
        .run(run_at())
        .await
        .unwrap();

    let text = std::fs::read_to_string(&summary.artifacts.analysis_json).unwrap();
    let results: Vec<AnalysisResult> = serde_json::from_str(&text).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].text_field("methodology"), Some("search"));
    let html = std::fs::read_to_string(&summary.artifacts.report_html).unwrap();
    assert!(html.contains("<li>new planner</li>"));
    assert!(html.contains("Relevance 7/10"));
}

#[tokio::test]
async fn test_email_failure_keeps_generated_report() {
    let arxiv = MockServer::start().await;
    mount_feed(&arxiv, day_feed(2)).await;
    let out = TempDir::new().unwrap();
    let mut settings = test_settings(&arxiv, out.path());
    enable_unreachable_email(&mut settings);

    let err = build_daily_run(&settings)
        .unwrap()
        .run(run_at())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), RunStage::Notifying);
    match err {
        RunError::Report(ReportError::Notification { report_path, .. }) => {
            assert!(report_path.exists());
            assert_eq!(
                report_path,
                out.path().join("reports").join("report_20250116_060000.html")
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}
