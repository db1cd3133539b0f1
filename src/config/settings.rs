// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含论文源、收集器、排序、分析、输出目录与邮件等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 上游论文源配置
    pub feed: FeedSettings,
    /// 日期窗口收集器配置
    pub collector: CollectorSettings,
    /// 排序配置
    pub ranking: RankingSettings,
    /// 深度分析配置
    pub analysis: AnalysisSettings,
    /// 产物输出目录配置
    pub output: OutputSettings,
    /// 邮件配置
    pub email: EmailSettings,
}

/// 上游论文源配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FeedSettings {
    /// arXiv API 地址
    pub base_url: String,
    /// 分类过滤，例如 `cs.AI`
    pub category: String,
    /// 单次扫描最多拉取的条目数
    pub max_results: usize,
    /// 每页条目数
    pub page_size: usize,
    /// 分页请求间隔（毫秒）
    pub page_delay_ms: u64,
    /// 单页最大重试次数
    pub page_retries: u32,
    /// HTTP 请求超时时间（秒）
    pub timeout_secs: u64,
    /// User-Agent
    pub user_agent: String,
}

impl FeedSettings {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 日期窗口收集器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorSettings {
    /// 每收集一篇论文后的固定等待（毫秒）
    pub item_delay_ms: u64,
    /// 窗口为空时最多向前扩展的天数
    pub max_lookback_days: u32,
}

/// 排序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    /// 保留前 N 篇
    pub top_n: usize,
    /// 关键词权重，键为小写关键词
    #[serde(default)]
    pub keywords: HashMap<String, f64>,
}

/// 分析服务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisProvider {
    /// OpenAI 兼容的 chat completions 接口
    Llm,
    /// 离线启发式分析
    Heuristic,
}

/// 单篇分析失败时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisFailurePolicy {
    /// 第一次失败即中止整个运行
    Abort,
    /// 记录失败条目并继续
    BestEffort,
}

/// 深度分析配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    pub provider: AnalysisProvider,
    /// LLM API 密钥
    pub api_key: Option<String>,
    /// 模型名称
    pub model: String,
    /// LLM API 基础 URL
    pub api_base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    pub failure_policy: AnalysisFailurePolicy,
}

/// 输出目录配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// Top 10 CSV 目录
    pub csv_dir: PathBuf,
    /// 分析结果 JSON 目录
    pub analysis_dir: PathBuf,
    /// HTML 报告目录
    pub report_dir: PathBuf,
}

/// SMTP 连接加密方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmtpTlsMode {
    Plaintext,
    StartTls,
    Tls,
}

/// 邮件配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct EmailSettings {
    /// 是否发送邮件
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub tls_mode: SmtpTlsMode,
    pub username: Option<String>,
    pub password: Option<String>,
    /// 发件人地址
    pub from: String,
    /// 收件人列表
    #[serde(default)]
    pub to: Vec<String>,
    /// 邮件主题前缀
    pub subject_prefix: String,
    /// SMTP 超时时间（秒）
    pub timeout_secs: u64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载内置默认值、`config/default.toml`、`config/{APP_ENVIRONMENT}.toml`
    /// 以及 `ARXIV_DAILY__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("ARXIV_DAILY")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("email.to")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 仅从内置默认值构建配置，不读取文件和环境变量
    pub fn from_defaults() -> Result<Self, ConfigError> {
        Self::defaults()?.build()?.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Feed
            .set_default("feed.base_url", "https://export.arxiv.org/api/query")?
            .set_default("feed.category", "cs.AI")?
            .set_default("feed.max_results", 200)?
            .set_default("feed.page_size", 100)?
            .set_default("feed.page_delay_ms", 3000)?
            .set_default("feed.page_retries", 3)?
            .set_default("feed.timeout_secs", 30)?
            .set_default(
                "feed.user_agent",
                concat!("arxiv-daily/", env!("CARGO_PKG_VERSION")),
            )?
            // Collector
            .set_default("collector.item_delay_ms", 100)?
            .set_default("collector.max_lookback_days", 3)?
            // Ranking
            .set_default("ranking.top_n", 10)?
            // Analysis
            .set_default("analysis.provider", "heuristic")?
            .set_default("analysis.model", "gpt-4o-mini")?
            .set_default("analysis.api_base_url", "https://api.openai.com/v1")?
            .set_default("analysis.timeout_secs", 120)?
            .set_default("analysis.failure_policy", "best_effort")?
            // Output
            .set_default("output.csv_dir", "data/daily_top10")?
            .set_default("output.analysis_dir", "data/analysis")?
            .set_default("output.report_dir", "data/reports")?
            // Email
            .set_default("email.enabled", false)?
            .set_default("email.smtp_host", "localhost")?
            .set_default("email.smtp_port", 587)?
            .set_default("email.tls_mode", "start_tls")?
            .set_default("email.from", "arxiv-daily@localhost")?
            .set_default("email.to", Vec::<String>::new())?
            .set_default("email.subject_prefix", "[arXiv Daily]")?
            .set_default("email.timeout_secs", 30)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
