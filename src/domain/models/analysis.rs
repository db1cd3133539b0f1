// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::models::paper::ScoredPaper;

/// 单篇论文的分析结果
///
/// 由 Reporter 为每篇 Top 10 论文生成一次，写入 JSON 集合后用于渲染报告和发送邮件
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub rank: u32,
    pub title: String,
    pub score: f64,
    /// 提交日期 `YYYY-MM-DD`
    pub submission_date: String,
    /// 规范链接
    pub html_url: String,
    pub outcome: AnalysisOutcome,
}

/// 分析结果：成功时为结构化数据，失败时记录原因
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Completed { analysis: Map<String, Value> },
    Failed { error: String },
}

impl AnalysisResult {
    pub fn completed(paper: &ScoredPaper, analysis: Map<String, Value>) -> Self {
        Self::with_outcome(paper, AnalysisOutcome::Completed { analysis })
    }

    pub fn failed(paper: &ScoredPaper, error: impl Into<String>) -> Self {
        Self::with_outcome(
            paper,
            AnalysisOutcome::Failed {
                error: error.into(),
            },
        )
    }

    fn with_outcome(paper: &ScoredPaper, outcome: AnalysisOutcome) -> Self {
        Self {
            rank: paper.rank,
            title: crate::utils::text::collapse_whitespace(&paper.paper.title),
            score: paper.score,
            submission_date: paper.paper.published.format("%Y-%m-%d").to_string(),
            html_url: paper.paper.entry_id.clone(),
            outcome,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, AnalysisOutcome::Failed { .. })
    }

    /// 读取分析结果中的字符串字段
    pub fn text_field(&self, key: &str) -> Option<&str> {
        match &self.outcome {
            AnalysisOutcome::Completed { analysis } => analysis.get(key).and_then(Value::as_str),
            AnalysisOutcome::Failed { .. } => None,
        }
    }

    /// 读取分析结果中的字符串列表字段，单个字符串视为一项
    pub fn list_field(&self, key: &str) -> Vec<String> {
        let AnalysisOutcome::Completed { analysis } = &self.outcome else {
            return Vec::new();
        };
        match analysis.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }
}
