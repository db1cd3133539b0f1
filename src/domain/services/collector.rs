// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDate;
use futures::StreamExt;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::domain::feed::source::{FeedQuery, PaperFeed};
use crate::domain::models::paper::PaperRecord;
use crate::domain::models::window::TargetWindow;
use crate::utils::errors::CollectionError;

/// 默认最多回看天数
pub const DEFAULT_MAX_LOOKBACK_DAYS: u32 = 3;

/// 收集器配置
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 每收集一篇后的固定等待
    pub item_delay: Duration,
    /// 窗口为空时最多向前扩展的天数
    pub max_lookback_days: u32,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            item_delay: Duration::from_millis(100),
            max_lookback_days: DEFAULT_MAX_LOOKBACK_DAYS,
        }
    }
}

/// 一次收集的结果，附带最终窗口
#[derive(Debug, Clone)]
pub struct Collected {
    pub papers: Vec<PaperRecord>,
    pub window: TargetWindow,
}

/// 日期窗口收集器
///
/// 按提交时间倒序遍历上游结果，只保留落在目标日期 `[start, end)` 内的论文。
/// 目标日期内还没有论文时，每遇到一篇更早的论文就把窗口起点向前扩展一天并跳过该篇，
/// 最多扩展 `max_lookback_days` 次；之后再遇到更早的论文即停止扫描。
pub struct DateWindowCollector {
    feed: Arc<dyn PaperFeed>,
    query: FeedQuery,
    config: CollectorConfig,
}

impl DateWindowCollector {
    pub fn new(feed: Arc<dyn PaperFeed>, query: FeedQuery, config: CollectorConfig) -> Self {
        Self {
            feed,
            query,
            config,
        }
    }

    pub fn query(&self) -> &FeedQuery {
        &self.query
    }

    /// 收集目标日期的论文
    ///
    /// # 错误
    /// * 上游出错且一篇都没有收集到时返回 `CollectionError::Feed`
    pub async fn collect(&self, target_date: NaiveDate) -> Result<Vec<PaperRecord>, CollectionError> {
        self.collect_window(target_date).await.map(|c| c.papers)
    }

    /// 同 [`collect`](Self::collect)，同时返回扩展后的窗口
    pub async fn collect_window(&self, target_date: NaiveDate) -> Result<Collected, CollectionError> {
        let mut window = TargetWindow::new(target_date);
        let mut papers: Vec<PaperRecord> = Vec::new();
        let mut skipped_newer = 0usize;

        info!(
            feed = self.feed.name(),
            category = %self.query.category,
            %target_date,
            "Collecting papers"
        );

        let mut stream = self.feed.results(&self.query);
        while let Some(item) = stream.next().await {
            let paper = match item {
                Ok(paper) => paper,
                Err(e) => {
                    error!("Error while collecting papers: {}", e);
                    if papers.is_empty() {
                        return Err(CollectionError::Feed {
                            target_date,
                            extensions: window.extensions(),
                            source: e,
                        });
                    }
                    warn!(
                        collected = papers.len(),
                        "Feed failed mid-scan, keeping partial result"
                    );
                    break;
                }
            };

            if window.contains(paper.published) {
                papers.push(paper);
                if !self.config.item_delay.is_zero() {
                    sleep(self.config.item_delay).await;
                }
                continue;
            }

            if window.is_after(paper.published) {
                skipped_newer += 1;
                continue;
            }

            // One extension per older paper; the paper that triggered it is not kept.
            if papers.is_empty() && window.extensions() < self.config.max_lookback_days {
                window.extend_back_one_day();
                info!(
                    "No papers found for {} yet, extending window to {} ({}/{})",
                    target_date,
                    window.start().format("%Y-%m-%d"),
                    window.extensions(),
                    self.config.max_lookback_days
                );
                continue;
            }
            debug!(published = %paper.published, "Reached papers older than window");
            break;
        }

        counter!("collector_papers_collected_total").increment(papers.len() as u64);
        counter!("collector_lookback_extensions_total").increment(window.extensions() as u64);
        info!(
            collected = papers.len(),
            skipped_newer,
            extensions = window.extensions(),
            "Collection finished for {}",
            target_date
        );

        Ok(Collected { papers, window })
    }
}

#[cfg(test)]
#[path = "collector_test.rs"]
mod tests;
