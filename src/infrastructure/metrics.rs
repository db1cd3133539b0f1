// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram, Unit};

/// 注册运行指标的说明
///
/// 不安装任何 recorder；嵌入方安装 recorder 后这些指标才会被导出
pub fn describe_metrics() {
    describe_counter!(
        "collector_papers_collected_total",
        "Total number of papers kept by the date-window collector"
    );
    describe_counter!(
        "collector_lookback_extensions_total",
        "Total number of one-day lookback extensions of the target window"
    );
    describe_counter!(
        "reporter_analysis_failures_total",
        "Total number of per-paper analysis failures"
    );
    describe_counter!("daily_runs_total", "Total number of daily runs by outcome");
    describe_histogram!(
        "daily_run_duration_seconds",
        Unit::Seconds,
        "Duration of a full daily run in seconds"
    );
}
