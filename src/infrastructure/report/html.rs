// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::domain::models::analysis::{AnalysisOutcome, AnalysisResult};
use crate::domain::services::delivery::{ReportContext, ReportRenderer};
use crate::infrastructure::storage::write_file;
use crate::utils::errors::PersistenceError;

/// 列表型分析字段及其标题
const LIST_SECTIONS: &[(&str, &str)] = &[
    ("key_contributions", "Key contributions"),
    ("strengths", "Strengths"),
    ("limitations", "Limitations"),
    ("keywords", "Keywords"),
];

/// 文本型分析字段及其标题
const TEXT_SECTIONS: &[(&str, &str)] = &[
    ("methodology", "Methodology"),
    ("significance", "Significance"),
];

const STYLE: &str = "body{font-family:-apple-system,Segoe UI,Helvetica,Arial,sans-serif;max-width:900px;margin:2em auto;padding:0 1em;color:#222}\
h1{font-size:1.6em}\
.paper{border:1px solid #ddd;border-radius:6px;padding:1em 1.2em;margin:1.2em 0}\
.paper h2{font-size:1.15em;margin:0 0 .4em}\
.meta{color:#666;font-size:.9em}\
.failed{background:#fff4f4;border-color:#e0b4b4}\
.empty{color:#666;font-style:italic}";

/// HTML 报告渲染器，输出 `report_YYYYMMDD_HHMMSS.html`
pub struct HtmlReportRenderer {
    report_dir: PathBuf,
}

impl HtmlReportRenderer {
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    pub fn report_path(&self, ctx: &ReportContext) -> PathBuf {
        self.report_dir
            .join(format!("report_{}.html", ctx.timestamp()))
    }
}

#[async_trait]
impl ReportRenderer for HtmlReportRenderer {
    async fn render(
        &self,
        results: &[AnalysisResult],
        ctx: &ReportContext,
    ) -> Result<PathBuf, PersistenceError> {
        let path = self.report_path(ctx);
        write_file(&path, render_html(results, ctx).as_bytes()).await?;
        Ok(path)
    }
}

/// 生成完整的 HTML 文档
pub fn render_html(results: &[AnalysisResult], ctx: &ReportContext) -> String {
    let title = format!(
        "arXiv {} daily top {} for {}",
        ctx.category,
        results.len(),
        ctx.target_date
    );

    let mut html = String::with_capacity(4096 + results.len() * 2048);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", encode_text(&title));
    let _ = writeln!(html, "<style>{}</style>\n</head>\n<body>", STYLE);
    let _ = writeln!(html, "<h1>{}</h1>", encode_text(&title));
    let _ = writeln!(
        html,
        "<p class=\"meta\">Generated {} UTC</p>",
        ctx.run_at.format("%Y-%m-%d %H:%M:%S")
    );

    if results.is_empty() {
        let _ = writeln!(
            html,
            "<p class=\"empty\">No papers were found in {} for {}.</p>",
            encode_text(&ctx.category),
            ctx.target_date
        );
    }

    for result in results {
        render_paper(&mut html, result);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_paper(html: &mut String, result: &AnalysisResult) {
    let class = if result.is_failed() {
        "paper failed"
    } else {
        "paper"
    };
    let _ = writeln!(html, "<div class=\"{}\">", class);
    let _ = writeln!(
        html,
        "<h2>#{} <a href=\"{}\">{}</a></h2>",
        result.rank,
        encode_double_quoted_attribute(&result.html_url),
        encode_text(&result.title)
    );
    let _ = writeln!(
        html,
        "<p class=\"meta\">Score {:.2} &middot; Submitted {}</p>",
        result.score,
        encode_text(&result.submission_date)
    );

    match &result.outcome {
        AnalysisOutcome::Failed { error } => {
            let _ = writeln!(
                html,
                "<p><strong>Analysis unavailable:</strong> {}</p>",
                encode_text(error)
            );
        }
        AnalysisOutcome::Completed { analysis } => {
            if let Some(summary) = result.text_field("summary") {
                let _ = writeln!(html, "<p>{}</p>", encode_text(summary));
            }
            for (key, heading) in TEXT_SECTIONS {
                if let Some(text) = result.text_field(key) {
                    let _ = writeln!(
                        html,
                        "<p><strong>{}:</strong> {}</p>",
                        heading,
                        encode_text(text)
                    );
                }
            }
            for (key, heading) in LIST_SECTIONS {
                let items = result.list_field(key);
                if items.is_empty() {
                    continue;
                }
                let _ = writeln!(html, "<p><strong>{}:</strong></p>\n<ul>", heading);
                for item in items {
                    let _ = writeln!(html, "<li>{}</li>", encode_text(&item));
                }
                html.push_str("</ul>\n");
            }
            if let Some(relevance) = analysis.get("relevance_score") {
                let _ = writeln!(
                    html,
                    "<p class=\"meta\">Relevance {}/10</p>",
                    encode_text(&relevance.to_string())
                );
            }
        }
    }

    html.push_str("</div>\n");
}
