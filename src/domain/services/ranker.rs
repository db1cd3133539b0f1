// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::paper::{PaperRecord, ScoredPaper};

/// 默认保留篇数
pub const DEFAULT_TOP_N: usize = 10;

/// 论文质量打分
///
/// 必须是纯函数：同一篇论文多次打分结果相同，且没有副作用
pub trait QualityScorer: Send + Sync {
    fn score(&self, paper: &PaperRecord) -> f64;
}

impl<F> QualityScorer for F
where
    F: Fn(&PaperRecord) -> f64 + Send + Sync,
{
    fn score(&self, paper: &PaperRecord) -> f64 {
        self(paper)
    }
}

/// 对论文打分并返回前 10 篇
pub fn rank(papers: &[PaperRecord], scorer: &dyn QualityScorer) -> Vec<ScoredPaper> {
    rank_top(papers, scorer, DEFAULT_TOP_N)
}

/// 对论文打分，按分数降序稳定排序，截取前 `top_n` 篇并分配 1 开始的排名
///
/// 同分保持输入顺序；NaN 排在最后。非有限分数会被截断到 `f64` 的有限范围，
/// 保证分数可以写入 JSON 并原样读回
pub fn rank_top(papers: &[PaperRecord], scorer: &dyn QualityScorer, top_n: usize) -> Vec<ScoredPaper> {
    let mut scored: Vec<(usize, f64)> = papers
        .iter()
        .enumerate()
        .map(|(ix, paper)| (ix, finite_score(scorer.score(paper))))
        .collect();

    // sort_by is stable, ties keep encounter order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    scored
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(position, (ix, score))| {
            let mut ranked = ScoredPaper::new(papers[ix].clone(), score);
            ranked.rank = position as u32 + 1;
            ranked
        })
        .collect()
}

/// NaN 与 -inf 映射为 `f64::MIN`，+inf 映射为 `f64::MAX`
fn finite_score(score: f64) -> f64 {
    if score.is_nan() {
        f64::MIN
    } else {
        score.clamp(f64::MIN, f64::MAX)
    }
}
