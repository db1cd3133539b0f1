// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::models::paper::ScoredPaper;
use crate::domain::models::run::{RunStage, RunSummary};
use crate::domain::models::window::TargetWindow;
use crate::domain::repositories::artifact_repository::ArtifactRepository;
use crate::domain::services::collector::DateWindowCollector;
use crate::domain::services::delivery::ReportContext;
use crate::domain::services::ranker::{rank_top, QualityScorer};
use crate::domain::services::reporter::Reporter;
use crate::utils::errors::{CollectionError, PersistenceError, ReportError};
use crate::utils::text::{collapse_whitespace, truncate_chars};

/// 每日运行错误，按失败阶段区分
#[derive(Error, Debug)]
pub enum RunError {
    #[error("collection failed: {0}")]
    Collection(#[from] CollectionError),

    #[error("top 10 export failed: {0}")]
    Export(#[source] PersistenceError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl RunError {
    /// 出错的阶段
    pub fn stage(&self) -> RunStage {
        match self {
            RunError::Collection(_) => RunStage::Collecting,
            RunError::Export(_) => RunStage::Ranking,
            RunError::Report(ReportError::Analysis { .. }) => RunStage::Analyzing,
            RunError::Report(ReportError::Persistence(_)) => RunStage::Persisting,
            RunError::Report(ReportError::Render(_)) => RunStage::Rendering,
            RunError::Report(ReportError::Notification { .. }) => RunStage::Notifying,
        }
    }
}

/// 记录阶段推进
struct StageTracker {
    current: RunStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            current: RunStage::Idle,
        }
    }

    fn advance(&mut self, next: RunStage) {
        debug_assert!(
            self.current.can_advance_to(next),
            "illegal stage transition {} -> {}",
            self.current,
            next
        );
        info!(from = %self.current, to = %next, "Run stage changed");
        self.current = next;
    }
}

/// 每日 Top 10 运行：收集 → 排序 → 分析 → 持久化 → 渲染 → 通知
pub struct DailyRunUseCase {
    collector: DateWindowCollector,
    scorer: Arc<dyn QualityScorer>,
    top_n: usize,
    store: Arc<dyn ArtifactRepository>,
    reporter: Reporter,
}

impl DailyRunUseCase {
    pub fn new(
        collector: DateWindowCollector,
        scorer: Arc<dyn QualityScorer>,
        top_n: usize,
        store: Arc<dyn ArtifactRepository>,
        reporter: Reporter,
    ) -> Self {
        Self {
            collector,
            scorer,
            top_n,
            store,
            reporter,
        }
    }

    /// 以 `now` 为运行时间执行一次，目标日期为 `now` 的前一个 UTC 日
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunSummary, RunError> {
        let started = Instant::now();
        let mut tracker = StageTracker::new();

        let result = self.run_stages(now, &mut tracker).await;

        histogram!("daily_run_duration_seconds").record(started.elapsed().as_secs_f64());
        match &result {
            Ok(summary) => {
                tracker.advance(RunStage::Done);
                counter!("daily_runs_total", "outcome" => "success").increment(1);
                info!(
                    target_date = %summary.target_date,
                    collected = summary.collected,
                    ranked = summary.ranked,
                    "Daily run finished in {:.1}s",
                    started.elapsed().as_secs_f64()
                );
            }
            Err(e) => {
                tracker.advance(RunStage::Failed);
                counter!("daily_runs_total", "outcome" => "failure").increment(1);
                error!(stage = %e.stage(), "Daily run failed: {}", e);
            }
        }
        result
    }

    async fn run_stages(
        &self,
        now: DateTime<Utc>,
        tracker: &mut StageTracker,
    ) -> Result<RunSummary, RunError> {
        let target_date = TargetWindow::for_yesterday(now).target_date();
        let ctx = ReportContext {
            target_date,
            run_at: now,
            category: self.collector.query().category.clone(),
        };
        info!(%target_date, category = %ctx.category, "Starting daily run");

        tracker.advance(RunStage::Collecting);
        let papers = self.collector.collect(target_date).await?;

        tracker.advance(RunStage::Ranking);
        let top = rank_top(&papers, self.scorer.as_ref(), self.top_n);
        let csv_path = self
            .store
            .save_top10_csv(&top, now)
            .await
            .map_err(RunError::Export)?;
        info!("Top {} saved to {}", top.len(), csv_path.display());
        log_top_table(&top);

        let artifacts = self
            .reporter
            .report_with_stages(&top, &ctx, |stage| tracker.advance(stage))
            .await?;

        Ok(RunSummary {
            target_date,
            collected: papers.len(),
            ranked: top.len(),
            csv_path,
            artifacts,
        })
    }
}

/// 在日志中输出 Top 10 表格
fn log_top_table(top: &[ScoredPaper]) {
    if top.is_empty() {
        info!("No papers to rank");
        return;
    }
    info!("Top {} papers:", top.len());
    for scored in top {
        let paper = &scored.paper;
        info!(
            "{:>2}. {} | {} | score {:.2} | {} authors | {} | published {} | updated {}",
            scored.rank,
            truncate_chars(&collapse_whitespace(&paper.title), 70),
            paper.entry_id,
            scored.score,
            paper.authors.len(),
            paper.categories.join(", "),
            paper.published.format("%Y-%m-%d"),
            paper.updated.format("%Y-%m-%d"),
        );
    }
}
