// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use thiserror::Error;

/// 上游论文源错误类型
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("arXiv API returned HTTP {0}")]
    Status(u16),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("arXiv API error: {0}")]
    Api(String),

    #[error("Invalid feed configuration: {0}")]
    Config(String),
}

/// 论文收集错误类型
#[derive(Error, Debug)]
pub enum CollectionError {
    /// 上游报错且没有收集到任何论文
    #[error("no papers collected for {target_date} (window extended {extensions} times): {source}")]
    Feed {
        target_date: chrono::NaiveDate,
        extensions: u32,
        #[source]
        source: FeedError,
    },
}

/// 单篇论文分析错误类型
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Analysis service not configured: {0}")]
    NotConfigured(String),

    #[error("Analysis request failed: {0}")]
    Request(String),

    #[error("Analysis service returned {status}: {body}")]
    Response { status: u16, body: String },

    #[error("Analysis output is not a JSON object: {0}")]
    InvalidJson(String),
}

/// 持久化错误类型 (CSV / JSON / HTML)
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PersistenceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// 邮件通知错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Invalid mail address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),

    #[error("Mail task failed: {0}")]
    Join(String),
}

/// 报告阶段错误类型
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("analysis of '{title}' failed: {source}")]
    Analysis {
        title: String,
        #[source]
        source: AnalysisError,
    },

    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("report rendering failed: {0}")]
    Render(#[source] PersistenceError),

    /// 报告已生成但未发送
    #[error("report {} generated but not sent: {source}", report_path.display())]
    Notification {
        report_path: PathBuf,
        #[source]
        source: NotificationError,
    },
}
