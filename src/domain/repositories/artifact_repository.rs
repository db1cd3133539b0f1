// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::domain::models::analysis::AnalysisResult;
use crate::domain::models::paper::ScoredPaper;
use crate::utils::errors::PersistenceError;

/// 运行产物仓库
///
/// 每个文件只写一次；文件名中的日期或时间戳取自 `run_at`
#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// 写入 Top 10 表格 `top10_YYYYMMDD.csv`
    async fn save_top10_csv(
        &self,
        top10: &[ScoredPaper],
        run_at: DateTime<Utc>,
    ) -> Result<PathBuf, PersistenceError>;

    /// 写入分析结果集合 `analysis_results_YYYYMMDD_HHMMSS.json`
    async fn save_analysis_results(
        &self,
        results: &[AnalysisResult],
        run_at: DateTime<Utc>,
    ) -> Result<PathBuf, PersistenceError>;

    /// 读回分析结果集合
    async fn load_analysis_results(&self, path: &Path)
        -> Result<Vec<AnalysisResult>, PersistenceError>;
}
