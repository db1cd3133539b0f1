// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::debug;

use crate::domain::models::paper::ScoredPaper;
use crate::domain::services::quality_scorer::HeuristicQualityScorer;
use crate::utils::errors::AnalysisError;
use crate::utils::text::{collapse_whitespace, first_sentence};

/// 单篇论文分析服务
#[async_trait]
pub trait PaperAnalyzer: Send + Sync {
    /// 分析一篇论文，返回结构化的分析字段
    async fn analyze(&self, paper: &ScoredPaper) -> Result<Map<String, Value>, AnalysisError>;

    fn name(&self) -> &'static str;
}

/// 期望 LLM 返回的字段
const ANALYSIS_FIELDS: &[&str] = &[
    "summary",
    "key_contributions",
    "methodology",
    "strengths",
    "limitations",
    "significance",
    "relevance_score",
];

/// 基于 OpenAI 兼容 chat completions 接口的论文分析
///
/// # 配置
///
/// - `api_key` - API 密钥，缺失时每次分析都返回 `NotConfigured`
/// - `model` - 模型名称
/// - `api_base_url` - API 基础 URL，例如 `https://api.openai.com/v1`
pub struct LlmPaperAnalyzer {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_base_url: String,
}

impl LlmPaperAnalyzer {
    pub fn new(
        api_key: Option<String>,
        model: String,
        api_base_url: String,
        timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn prompt(paper: &ScoredPaper) -> String {
        let record = &paper.paper;
        // Keep the abstract within a sane token budget
        let summary: String = collapse_whitespace(&record.summary)
            .chars()
            .take(6000)
            .collect();
        format!(
            "Analyze the following arXiv paper and return ONLY a JSON object with the keys \
            {}. `key_contributions`, `strengths` and `limitations` are arrays of short strings; \
            `relevance_score` is an integer from 1 to 10. No markdown formatting.\n\n\
            Title: {}\nAuthors: {}\nCategories: {}\nAbstract: {}",
            ANALYSIS_FIELDS.join(", "),
            collapse_whitespace(&record.title),
            record.authors.join(", "),
            record.categories.join(", "),
            summary
        )
    }

    /// 去掉可能的 Markdown 代码块包裹
    fn strip_code_fences(content: &str) -> &str {
        content
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
    }
}

#[async_trait]
impl PaperAnalyzer for LlmPaperAnalyzer {
    async fn analyze(&self, paper: &ScoredPaper) -> Result<Map<String, Value>, AnalysisError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AnalysisError::NotConfigured("LLM API key not configured".into()))?;

        let request_body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are an expert reviewer of AI research papers. You output only valid JSON."
                },
                {
                    "role": "user",
                    "content": Self::prompt(paper)
                }
            ],
            "temperature": 0.2
        });

        let url = format!("{}/chat/completions", self.api_base_url);
        debug!(rank = paper.rank, model = %self.model, "Requesting paper analysis");
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Response {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::InvalidJson(format!("response body: {}", e)))?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AnalysisError::InvalidJson("missing choices[0].message.content".into()))?;

        match serde_json::from_str::<Value>(Self::strip_code_fences(content)) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(AnalysisError::InvalidJson(format!(
                "expected object, got {}",
                other
            ))),
            Err(e) => Err(AnalysisError::InvalidJson(e.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

/// 离线分析：不访问网络，从元数据中提取摘要和关键词
pub struct HeuristicPaperAnalyzer {
    scorer: HeuristicQualityScorer,
}

impl HeuristicPaperAnalyzer {
    pub fn new(scorer: HeuristicQualityScorer) -> Self {
        Self { scorer }
    }
}

impl Default for HeuristicPaperAnalyzer {
    fn default() -> Self {
        Self::new(HeuristicQualityScorer::default())
    }
}

#[async_trait]
impl PaperAnalyzer for HeuristicPaperAnalyzer {
    async fn analyze(&self, paper: &ScoredPaper) -> Result<Map<String, Value>, AnalysisError> {
        let record = &paper.paper;
        let summary = collapse_whitespace(&record.summary);

        let mut analysis = Map::new();
        analysis.insert("summary".into(), json!(first_sentence(&summary)));
        analysis.insert(
            "keywords".into(),
            json!(self.scorer.matched_keywords(record)),
        );
        analysis.insert("quality_score".into(), json!(paper.score));
        analysis.insert("authors".into(), json!(record.authors));
        analysis.insert("categories".into(), json!(record.categories));
        if let Some(primary) = &record.primary_category {
            analysis.insert("primary_category".into(), json!(primary));
        }
        if let Some(comment) = &record.comment {
            analysis.insert("comment".into(), json!(collapse_whitespace(comment)));
        }
        if let Some(pdf) = &record.pdf_url {
            analysis.insert("pdf_url".into(), json!(pdf));
        }
        Ok(analysis)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}
