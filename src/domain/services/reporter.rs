// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::settings::AnalysisFailurePolicy;
use crate::domain::models::analysis::AnalysisResult;
use crate::domain::models::paper::ScoredPaper;
use crate::domain::models::run::{ReportArtifacts, RunStage};
use crate::domain::repositories::artifact_repository::ArtifactRepository;
use crate::domain::services::delivery::{ReportContext, ReportNotifier, ReportRenderer};
use crate::domain::services::paper_analyzer::PaperAnalyzer;
use crate::utils::errors::ReportError;

/// 报告编排：逐篇分析、持久化、渲染、投递
///
/// 各步骤依次执行，任一步骤失败即返回，不会回滚已经写出的文件
pub struct Reporter {
    analyzer: Arc<dyn PaperAnalyzer>,
    store: Arc<dyn ArtifactRepository>,
    renderer: Arc<dyn ReportRenderer>,
    /// 为 `None` 时跳过邮件发送
    notifier: Option<Arc<dyn ReportNotifier>>,
    policy: AnalysisFailurePolicy,
}

impl Reporter {
    pub fn new(
        analyzer: Arc<dyn PaperAnalyzer>,
        store: Arc<dyn ArtifactRepository>,
        renderer: Arc<dyn ReportRenderer>,
        notifier: Option<Arc<dyn ReportNotifier>>,
        policy: AnalysisFailurePolicy,
    ) -> Self {
        Self {
            analyzer,
            store,
            renderer,
            notifier,
            policy,
        }
    }

    /// 执行完整的报告流程
    ///
    /// # 错误
    /// * `Analysis` - 策略为 `abort` 时第一篇分析失败
    /// * `Persistence` / `Render` - 文件写入失败
    /// * `Notification` - 报告已生成但发送失败，携带报告路径
    pub async fn report(
        &self,
        top10: &[ScoredPaper],
        ctx: &ReportContext,
    ) -> Result<ReportArtifacts, ReportError> {
        self.report_with_stages(top10, ctx, |_| {}).await
    }

    /// 同 [`report`](Self::report)，每个步骤开始前以对应的 [`RunStage`] 调用 `on_stage`
    pub async fn report_with_stages<F>(
        &self,
        top10: &[ScoredPaper],
        ctx: &ReportContext,
        mut on_stage: F,
    ) -> Result<ReportArtifacts, ReportError>
    where
        F: FnMut(RunStage) + Send,
    {
        on_stage(RunStage::Analyzing);
        let results = self.analyze_all(top10).await?;

        on_stage(RunStage::Persisting);
        let analysis_json = self.persist(&results, ctx).await?;

        on_stage(RunStage::Rendering);
        let report_html = self.render(&results, ctx).await?;

        on_stage(RunStage::Notifying);
        let email_sent = self.notify(&results, &report_html, ctx).await?;

        Ok(ReportArtifacts {
            analysis_json,
            report_html,
            failed_analyses: results.iter().filter(|r| r.is_failed()).count(),
            email_sent,
        })
    }

    /// 按排名顺序逐篇分析
    async fn analyze_all(
        &self,
        top10: &[ScoredPaper],
    ) -> Result<Vec<AnalysisResult>, ReportError> {
        let mut results = Vec::with_capacity(top10.len());

        for paper in top10 {
            info!(
                rank = paper.rank,
                arxiv_id = paper.paper.short_id(),
                analyzer = self.analyzer.name(),
                "Analyzing paper: {}",
                paper.paper.title
            );
            match self.analyzer.analyze(paper).await {
                Ok(analysis) => results.push(AnalysisResult::completed(paper, analysis)),
                Err(e) => {
                    counter!("reporter_analysis_failures_total").increment(1);
                    match self.policy {
                        AnalysisFailurePolicy::Abort => {
                            error!(rank = paper.rank, "Analysis failed, aborting: {}", e);
                            return Err(ReportError::Analysis {
                                title: paper.paper.title.clone(),
                                source: e,
                            });
                        }
                        AnalysisFailurePolicy::BestEffort => {
                            warn!(rank = paper.rank, "Analysis failed, keeping placeholder: {}", e);
                            results.push(AnalysisResult::failed(paper, e.to_string()));
                        }
                    }
                }
            }
        }

        Ok(results)
    }

    async fn persist(
        &self,
        results: &[AnalysisResult],
        ctx: &ReportContext,
    ) -> Result<PathBuf, ReportError> {
        let path = self.store.save_analysis_results(results, ctx.run_at).await?;
        info!("Analysis results saved to {}", path.display());
        Ok(path)
    }

    async fn render(
        &self,
        results: &[AnalysisResult],
        ctx: &ReportContext,
    ) -> Result<PathBuf, ReportError> {
        let path = self
            .renderer
            .render(results, ctx)
            .await
            .map_err(ReportError::Render)?;
        info!("HTML report generated: {}", path.display());
        Ok(path)
    }

    /// 发送报告邮件，返回是否实际发送
    async fn notify(
        &self,
        results: &[AnalysisResult],
        report_path: &Path,
        ctx: &ReportContext,
    ) -> Result<bool, ReportError> {
        let Some(notifier) = &self.notifier else {
            info!("Email delivery disabled, skipping notification");
            return Ok(false);
        };
        if results.is_empty() {
            info!("No papers for {}, skipping email", ctx.target_date);
            return Ok(false);
        }

        notifier
            .send_report(results, report_path, ctx)
            .await
            .map_err(|source| ReportError::Notification {
                report_path: report_path.to_path_buf(),
                source,
            })?;
        info!("Report email sent");
        Ok(true)
    }
}

#[cfg(test)]
#[path = "reporter_test.rs"]
mod tests;
