// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// 每日运行的阶段，只能向前推进
///
/// `Idle → Collecting → Ranking → Analyzing → Persisting → Rendering → Notifying → Done`，
/// 任意阶段出现未恢复的错误都进入 `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    Idle,
    Collecting,
    Ranking,
    Analyzing,
    Persisting,
    Rendering,
    Notifying,
    Done,
    Failed,
}

impl RunStage {
    /// 是否允许从当前阶段转到 `next`
    pub fn can_advance_to(self, next: RunStage) -> bool {
        match (self, next) {
            (RunStage::Done, _) | (RunStage::Failed, _) => false,
            (_, RunStage::Failed) => true,
            (current, next) => next > current,
        }
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Idle => "idle",
            RunStage::Collecting => "collecting",
            RunStage::Ranking => "ranking",
            RunStage::Analyzing => "analyzing",
            RunStage::Persisting => "persisting",
            RunStage::Rendering => "rendering",
            RunStage::Notifying => "notifying",
            RunStage::Done => "done",
            RunStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// 报告阶段产出的文件
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportArtifacts {
    pub analysis_json: PathBuf,
    pub report_html: PathBuf,
    /// 分析失败的篇数
    pub failed_analyses: usize,
    pub email_sent: bool,
}

/// 一次每日运行的汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub target_date: NaiveDate,
    pub collected: usize,
    pub ranked: usize,
    pub csv_path: PathBuf,
    pub artifacts: ReportArtifacts,
}
