// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::domain::models::paper::PaperRecord;
use crate::domain::services::ranker::QualityScorer;

static CODE_AVAILABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)github\.com|gitlab\.com|huggingface\.co|code (is |will be )?(publicly )?(available|released)|open[- ]source")
        .expect("code availability regex")
});

static VENUE_ACCEPTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)accepted (at|to|by|in)|\b(neurips|icml|iclr|aaai|ijcai|acl|emnlp|naacl|cvpr|iccv|eccv|kdd)\b")
        .expect("venue regex")
});

/// cs.AI 的默认关键词权重
const DEFAULT_KEYWORDS: &[(&str, f64)] = &[
    ("large language model", 2.0),
    ("llm", 1.5),
    ("reasoning", 1.5),
    ("agent", 1.2),
    ("alignment", 1.2),
    ("reinforcement learning", 1.2),
    ("multimodal", 1.0),
    ("benchmark", 1.0),
    ("safety", 1.0),
    ("retrieval", 0.8),
    ("theoretical", 0.8),
    ("state-of-the-art", 0.8),
    ("novel", 0.5),
];

struct Keyword {
    term: String,
    weight: f64,
    boundary: Regex,
}

/// 启发式论文质量打分器
///
/// 组合关键词相关度、作者规模、交叉分类、摘要篇幅、代码可得性与会议录用信号
pub struct HeuristicQualityScorer {
    keywords: Vec<Keyword>,
}

impl Default for HeuristicQualityScorer {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl HeuristicQualityScorer {
    /// `keywords` 为空时使用内置关键词表
    pub fn new(keywords: HashMap<String, f64>) -> Self {
        let mut pairs: Vec<(String, f64)> = if keywords.is_empty() {
            DEFAULT_KEYWORDS
                .iter()
                .map(|(k, w)| (k.to_string(), *w))
                .collect()
        } else {
            keywords
                .into_iter()
                .map(|(k, w)| (k.trim().to_lowercase(), w))
                .filter(|(k, _)| !k.is_empty())
                .collect()
        };
        // HashMap order is random; keep scoring order stable
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let keywords = pairs
            .into_iter()
            .map(|(term, weight)| {
                let pattern = format!(r"\b{}\b", regex::escape(&term));
                Keyword {
                    boundary: Regex::new(&pattern).expect("escaped keyword is a valid regex"),
                    term,
                    weight,
                }
            })
            .collect();

        Self { keywords }
    }

    /// 标题或摘要中命中的关键词
    pub fn matched_keywords(&self, paper: &PaperRecord) -> Vec<String> {
        let title = paper.title.to_lowercase();
        let summary = paper.summary.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| title.contains(&k.term) || summary.contains(&k.term))
            .map(|k| k.term.clone())
            .collect()
    }

    fn keyword_score(&self, title: &str, summary: &str) -> f64 {
        let mut score = 0.0;
        for keyword in &self.keywords {
            // Title relevance (highest weight)
            if title.contains(&keyword.term) {
                score += 2.0 * keyword.weight;
                if keyword.boundary.is_match(title) {
                    score += 1.0 * keyword.weight;
                }
            }
            // Abstract relevance
            if summary.contains(&keyword.term) {
                score += 0.8 * keyword.weight;
                if keyword.boundary.is_match(summary) {
                    score += 0.4 * keyword.weight;
                }
            }
        }
        score
    }

    /// 摘要篇幅：过短的摘要通常是占位或勘误
    fn substance_score(summary: &str) -> f64 {
        match summary.split_whitespace().count() {
            0..=79 => 0.0,
            80..=300 => 1.0,
            _ => 0.7,
        }
    }
}

impl QualityScorer for HeuristicQualityScorer {
    fn score(&self, paper: &PaperRecord) -> f64 {
        let title = paper.title.to_lowercase();
        let summary = paper.summary.to_lowercase();

        let mut score = self.keyword_score(&title, &summary);

        // Team size, log-scaled and capped
        score += (1.0 + paper.authors.len() as f64).ln().min(2.5);

        // Cross-listing breadth
        score += 0.3 * paper.categories.len().min(4) as f64;

        score += Self::substance_score(&paper.summary);

        let comment = paper.comment.as_deref().unwrap_or_default();
        if CODE_AVAILABLE.is_match(&paper.summary) || CODE_AVAILABLE.is_match(comment) {
            score += 1.0;
        }
        if VENUE_ACCEPTED.is_match(comment) {
            score += 1.5;
        }

        // Very short titles are often placeholders
        if paper.title.trim().chars().count() < 10 {
            score *= 0.8;
        }

        score
    }
}
