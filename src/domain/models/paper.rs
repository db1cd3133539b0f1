// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 从上游拉取的论文记录，拉取后不可变
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaperRecord {
    /// 规范 abs 链接，例如 `http://arxiv.org/abs/2501.01234v1`
    pub entry_id: String,
    pub title: String,
    pub authors: Vec<String>,
    /// 所有分类标签，按 feed 中出现顺序
    pub categories: Vec<String>,
    pub primary_category: Option<String>,
    /// 摘要
    pub summary: String,
    /// 首次提交时间
    pub published: DateTime<Utc>,
    /// 最后更新时间
    pub updated: DateTime<Utc>,
    pub pdf_url: Option<String>,
    /// 作者备注（页数、会议、代码链接等）
    pub comment: Option<String>,
}

impl PaperRecord {
    /// 去掉版本号的 arXiv ID，例如 `2501.01234`
    pub fn short_id(&self) -> &str {
        let tail = self
            .entry_id
            .rsplit_once("/abs/")
            .map(|(_, id)| id)
            .unwrap_or(&self.entry_id);
        match tail.rfind('v') {
            Some(ix) if ix > 0 && tail[ix + 1..].chars().all(|c| c.is_ascii_digit()) => {
                &tail[..ix]
            }
            _ => tail,
        }
    }
}

/// 带质量分数与排名的论文
///
/// 排名在分配前为 0，分配后为 1 开始的连续整数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredPaper {
    pub paper: PaperRecord,
    pub score: f64,
    pub rank: u32,
}

impl ScoredPaper {
    pub fn new(paper: PaperRecord, score: f64) -> Self {
        Self {
            paper,
            score,
            rank: 0,
        }
    }
}
