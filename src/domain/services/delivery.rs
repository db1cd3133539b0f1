// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::{Path, PathBuf};

use crate::domain::models::analysis::AnalysisResult;
use crate::utils::errors::{NotificationError, PersistenceError};

/// 一次报告的上下文信息
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// 报告覆盖的目标日期
    pub target_date: NaiveDate,
    /// 运行时间，决定文件名中的时间戳
    pub run_at: DateTime<Utc>,
    pub category: String,
}

impl ReportContext {
    /// 文件名时间戳 `YYYYMMDD_HHMMSS`
    pub fn timestamp(&self) -> String {
        self.run_at.format("%Y%m%d_%H%M%S").to_string()
    }
}

/// 报告渲染
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// 渲染并写入报告，返回报告文件路径
    async fn render(
        &self,
        results: &[AnalysisResult],
        ctx: &ReportContext,
    ) -> Result<PathBuf, PersistenceError>;
}

/// 报告投递
#[async_trait]
pub trait ReportNotifier: Send + Sync {
    async fn send_report(
        &self,
        results: &[AnalysisResult],
        report_path: &Path,
        ctx: &ReportContext,
    ) -> Result<(), NotificationError>;
}
