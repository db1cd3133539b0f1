// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::paper::PaperRecord;
use crate::utils::errors::FeedError;
use futures::stream::BoxStream;

/// 排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCriterion {
    Relevance,
    LastUpdatedDate,
    SubmittedDate,
}

impl SortCriterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortCriterion::Relevance => "relevance",
            SortCriterion::LastUpdatedDate => "lastUpdatedDate",
            SortCriterion::SubmittedDate => "submittedDate",
        }
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

/// 论文源查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    /// 分类标签，例如 `cs.AI`
    pub category: String,
    /// 最多返回的条目数
    pub max_results: usize,
    pub sort_by: SortCriterion,
    pub sort_order: SortOrder,
}

impl FeedQuery {
    /// 某分类下按提交时间倒序的最新论文
    pub fn latest_submissions(category: impl Into<String>, max_results: usize) -> Self {
        Self {
            category: category.into(),
            max_results,
            sort_by: SortCriterion::SubmittedDate,
            sort_order: SortOrder::Descending,
        }
    }

    /// arXiv `search_query` 参数
    pub fn search_query(&self) -> String {
        format!("cat:{}", self.category.trim())
    }
}

/// 论文条目的惰性流，出错后流结束
pub type PaperStream<'a> = BoxStream<'a, Result<PaperRecord, FeedError>>;

/// 上游论文源
///
/// 实现负责透明分页；调用方停止拉取后不会再发起新的请求
pub trait PaperFeed: Send + Sync {
    fn results<'a>(&'a self, query: &'a FeedQuery) -> PaperStream<'a>;

    /// 论文源名称
    fn name(&self) -> &'static str;
}
