// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use arxiv_daily::application::bootstrap::build_daily_run;
use arxiv_daily::config::settings::Settings;
use arxiv_daily::infrastructure::metrics::describe_metrics;
use arxiv_daily::utils::telemetry;
use chrono::Utc;
use tracing::{error, info};

/// 主函数
///
/// 执行一次每日运行：目标日期固定为调用时刻的前一个 UTC 日。
/// 任一阶段失败时以非零状态退出，便于外部调度器感知。
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    describe_metrics();
    info!("Starting arxiv-daily {}", env!("CARGO_PKG_VERSION"));

    // 2. Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    info!(
        category = %settings.feed.category,
        provider = ?settings.analysis.provider,
        email = settings.email.enabled,
        "Configuration loaded"
    );

    // 3. Wire components
    let daily_run = build_daily_run(&settings)?;

    // 4. Run once
    match daily_run.run(Utc::now()).await {
        Ok(summary) => {
            info!(
                csv = %summary.csv_path.display(),
                analysis = %summary.artifacts.analysis_json.display(),
                report = %summary.artifacts.report_html.display(),
                email_sent = summary.artifacts.email_sent,
                "Done"
            );
            Ok(())
        }
        Err(e) => {
            error!(stage = %e.stage(), "Run aborted: {}", e);
            Err(e.into())
        }
    }
}
