// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use arxiv_daily::config::settings::{AnalysisProvider, Settings, SmtpTlsMode};
use chrono::{DateTime, TimeZone, Utc};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 运行时间：2025-01-16 06:00:00 UTC，目标日期为 2025-01-15
pub fn run_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 16, 6, 0, 0).unwrap()
}

/// 构造一条 Atom entry
pub fn atom_entry(id: u32, published: &str, title: &str, summary: &str) -> String {
    format!(
        r#"<entry>
    <id>http://arxiv.org/abs/2501.{id:05}v1</id>
    <updated>{published}</updated>
    <published>{published}</published>
    <title>{title}</title>
    <summary>{summary}</summary>
    <author><name>Author A{id}</name></author>
    <author><name>Author B{id}</name></author>
    <link href="http://arxiv.org/abs/2501.{id:05}v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2501.{id:05}v1" rel="related" type="application/pdf"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
  </entry>"#
    )
}

pub fn atom_feed(entries: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=cat:cs.AI</title>
  <opensearch:totalResults xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">{}</opensearch:totalResults>
  {}
</feed>"#,
        entries.len(),
        entries.join("\n  ")
    )
}

/// 目标日期前后各有论文的 feed：1 篇过新，`in_window` 篇在目标日期内，1 篇过旧
pub fn day_feed(in_window: u32) -> String {
    let mut entries = vec![atom_entry(
        9000,
        "2025-01-16T02:00:00Z",
        "Too new",
        "Submitted after the target day.",
    )];
    for i in 1..=in_window {
        let title = if i % 3 == 0 {
            format!("Large Language Model Agents for Reasoning, part {}", i)
        } else {
            format!("A study of graph partitioning, part {}", i)
        };
        entries.push(atom_entry(
            i,
            &format!("2025-01-15T{:02}:00:00Z", 23 - i.min(23)),
            &title,
            "We propose a method. It is evaluated on benchmarks.",
        ));
    }
    entries.push(atom_entry(
        9001,
        "2025-01-10T12:00:00Z",
        "Too old",
        "Submitted long before the target day.",
    ));
    atom_feed(&entries)
}

pub async fn mount_feed(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// 指向 mock 服务与临时目录、不做任何等待的配置
pub fn test_settings(arxiv: &MockServer, out: &Path) -> Settings {
    let mut settings = Settings::from_defaults().unwrap();
    settings.feed.base_url = format!("{}/api/query", arxiv.uri());
    settings.feed.page_delay_ms = 0;
    settings.feed.page_retries = 0;
    settings.feed.timeout_secs = 5;
    settings.collector.item_delay_ms = 0;
    settings.analysis.provider = AnalysisProvider::Heuristic;
    settings.output.csv_dir = out.join("daily_top10");
    settings.output.analysis_dir = out.join("analysis");
    settings.output.report_dir = out.join("reports");
    settings.email.enabled = false;
    settings
}

/// 启用邮件并指向一个没有监听的端口，任何发送尝试都会失败
pub fn enable_unreachable_email(settings: &mut Settings) {
    settings.email.enabled = true;
    settings.email.smtp_host = "127.0.0.1".into();
    settings.email.smtp_port = 1;
    settings.email.tls_mode = SmtpTlsMode::Plaintext;
    settings.email.from = "arxiv-daily@example.org".into();
    settings.email.to = vec!["reader@example.org".into()];
    settings.email.timeout_secs = 2;
}
