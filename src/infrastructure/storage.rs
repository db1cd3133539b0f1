// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::settings::OutputSettings;
use crate::domain::models::analysis::AnalysisResult;
use crate::domain::models::paper::ScoredPaper;
use crate::domain::repositories::artifact_repository::ArtifactRepository;
use crate::utils::errors::PersistenceError;
use crate::utils::text::collapse_whitespace;

const CSV_HEADER: [&str; 9] = [
    "rank",
    "title",
    "url",
    "score",
    "authors",
    "categories",
    "published",
    "updated",
    "abstract",
];

/// 本地文件系统上的运行产物存储
pub struct LocalArtifactStore {
    csv_dir: PathBuf,
    analysis_dir: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(csv_dir: impl Into<PathBuf>, analysis_dir: impl Into<PathBuf>) -> Self {
        Self {
            csv_dir: csv_dir.into(),
            analysis_dir: analysis_dir.into(),
        }
    }

    pub fn from_settings(settings: &OutputSettings) -> Self {
        Self::new(&settings.csv_dir, &settings.analysis_dir)
    }

    pub fn csv_path(&self, run_at: DateTime<Utc>) -> PathBuf {
        self.csv_dir
            .join(format!("top10_{}.csv", run_at.format("%Y%m%d")))
    }

    pub fn analysis_path(&self, run_at: DateTime<Utc>) -> PathBuf {
        self.analysis_dir.join(format!(
            "analysis_results_{}.json",
            run_at.format("%Y%m%d_%H%M%S")
        ))
    }
}

/// 写入文件，父目录不存在时先创建
pub(crate) async fn write_file(path: &Path, data: &[u8]) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| PersistenceError::io(parent, e))?;
    }

    let mut file = fs::File::create(path)
        .await
        .map_err(|e| PersistenceError::io(path, e))?;
    file.write_all(data)
        .await
        .map_err(|e| PersistenceError::io(path, e))?;
    file.flush().await.map_err(|e| PersistenceError::io(path, e))?;

    Ok(())
}

/// RFC 4180 字段转义
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(fields: &[String]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push_str("\r\n");
    line
}

/// 生成 Top 10 表格内容
pub fn render_top10_csv(top10: &[ScoredPaper]) -> String {
    let header: Vec<String> = CSV_HEADER.iter().map(|h| h.to_string()).collect();
    let mut out = csv_row(&header);

    for scored in top10 {
        let paper = &scored.paper;
        out.push_str(&csv_row(&[
            scored.rank.to_string(),
            collapse_whitespace(&paper.title),
            paper.entry_id.clone(),
            format!("{:?}", scored.score),
            paper.authors.len().to_string(),
            paper.categories.join(", "),
            paper.published.format("%Y-%m-%d").to_string(),
            paper.updated.format("%Y-%m-%d").to_string(),
            collapse_whitespace(&paper.summary),
        ]));
    }

    out
}

#[async_trait]
impl ArtifactRepository for LocalArtifactStore {
    async fn save_top10_csv(
        &self,
        top10: &[ScoredPaper],
        run_at: DateTime<Utc>,
    ) -> Result<PathBuf, PersistenceError> {
        let path = self.csv_path(run_at);
        write_file(&path, render_top10_csv(top10).as_bytes()).await?;
        Ok(path)
    }

    async fn save_analysis_results(
        &self,
        results: &[AnalysisResult],
        run_at: DateTime<Utc>,
    ) -> Result<PathBuf, PersistenceError> {
        let path = self.analysis_path(run_at);
        let json = serde_json::to_string_pretty(results)?;
        write_file(&path, json.as_bytes()).await?;
        Ok(path)
    }

    async fn load_analysis_results(
        &self,
        path: &Path,
    ) -> Result<Vec<AnalysisResult>, PersistenceError> {
        let data = fs::read(path)
            .await
            .map_err(|e| PersistenceError::io(path, e))?;
        Ok(serde_json::from_slice(&data)?)
    }
}
