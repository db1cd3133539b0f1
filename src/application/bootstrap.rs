// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::application::use_cases::daily_run::DailyRunUseCase;
use crate::config::settings::{AnalysisProvider, Settings};
use crate::domain::feed::source::{FeedQuery, PaperFeed};
use crate::domain::repositories::artifact_repository::ArtifactRepository;
use crate::domain::services::collector::{CollectorConfig, DateWindowCollector};
use crate::domain::services::delivery::ReportNotifier;
use crate::domain::services::paper_analyzer::{
    HeuristicPaperAnalyzer, LlmPaperAnalyzer, PaperAnalyzer,
};
use crate::domain::services::quality_scorer::HeuristicQualityScorer;
use crate::domain::services::reporter::Reporter;
use crate::infrastructure::arxiv::ArxivFeed;
use crate::infrastructure::notify::email::SmtpNotifier;
use crate::infrastructure::report::html::HtmlReportRenderer;
use crate::infrastructure::storage::LocalArtifactStore;

fn build_analyzer(settings: &Settings) -> Result<Arc<dyn PaperAnalyzer>> {
    let analysis = &settings.analysis;
    let has_key = analysis
        .api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());

    match analysis.provider {
        AnalysisProvider::Llm if has_key => {
            info!(model = %analysis.model, "Using LLM paper analyzer");
            let analyzer = LlmPaperAnalyzer::new(
                analysis.api_key.clone(),
                analysis.model.clone(),
                analysis.api_base_url.clone(),
                Duration::from_secs(analysis.timeout_secs),
            )
            .context("Failed to build LLM analyzer")?;
            Ok(Arc::new(analyzer))
        }
        AnalysisProvider::Llm => {
            warn!("LLM analysis requested but no API key configured, falling back to heuristic analysis");
            Ok(Arc::new(HeuristicPaperAnalyzer::new(
                HeuristicQualityScorer::new(settings.ranking.keywords.clone()),
            )))
        }
        AnalysisProvider::Heuristic => Ok(Arc::new(HeuristicPaperAnalyzer::new(
            HeuristicQualityScorer::new(settings.ranking.keywords.clone()),
        ))),
    }
}

fn build_notifier(settings: &Settings) -> Result<Option<Arc<dyn ReportNotifier>>> {
    if !settings.email.enabled {
        return Ok(None);
    }
    let notifier = SmtpNotifier::from_settings(&settings.email)
        .context("Failed to configure SMTP notifier")?;
    Ok(Some(Arc::new(notifier)))
}

/// 根据配置组装每日运行的全部组件
pub fn build_daily_run(settings: &Settings) -> Result<DailyRunUseCase> {
    let feed: Arc<dyn PaperFeed> =
        Arc::new(ArxivFeed::from_settings(&settings.feed).context("Failed to build arXiv client")?);
    let collector = DateWindowCollector::new(
        feed,
        FeedQuery::latest_submissions(settings.feed.category.clone(), settings.feed.max_results),
        CollectorConfig {
            item_delay: Duration::from_millis(settings.collector.item_delay_ms),
            max_lookback_days: settings.collector.max_lookback_days,
        },
    );

    let store: Arc<dyn ArtifactRepository> =
        Arc::new(LocalArtifactStore::from_settings(&settings.output));
    let reporter = Reporter::new(
        build_analyzer(settings)?,
        store.clone(),
        Arc::new(HtmlReportRenderer::new(settings.output.report_dir.clone())),
        build_notifier(settings)?,
        settings.analysis.failure_policy,
    );

    Ok(DailyRunUseCase::new(
        collector,
        Arc::new(HeuristicQualityScorer::new(settings.ranking.keywords.clone())),
        settings.ranking.top_n,
        store,
        reporter,
    ))
}
