// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::settings::{EmailSettings, SmtpTlsMode};
use crate::domain::models::analysis::AnalysisResult;
use crate::domain::services::delivery::{ReportContext, ReportNotifier};
use crate::utils::errors::NotificationError;
use crate::utils::text::truncate_chars;

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .trim()
        .parse()
        .map_err(|e: lettre::address::AddressError| NotificationError::Address {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// 通过 SMTP 发送报告邮件
///
/// 邮件为 multipart/alternative：纯文本摘要 + HTML 报告正文。
/// lettre 的同步传输在 `spawn_blocking` 中执行。
pub struct SmtpNotifier {
    transport: SmtpTransport,
    from: Mailbox,
    to: Vec<Mailbox>,
    subject_prefix: String,
}

impl SmtpNotifier {
    pub fn from_settings(settings: &EmailSettings) -> Result<Self, NotificationError> {
        let from = parse_mailbox(&settings.from)?;
        let to = settings
            .to
            .iter()
            .filter(|a| !a.trim().is_empty())
            .map(|a| parse_mailbox(a))
            .collect::<Result<Vec<_>, _>>()?;
        if to.is_empty() {
            return Err(NotificationError::Address {
                address: String::new(),
                reason: "no recipients configured".into(),
            });
        }

        let builder = match settings.tls_mode {
            SmtpTlsMode::Plaintext => SmtpTransport::builder_dangerous(&settings.smtp_host),
            SmtpTlsMode::StartTls => SmtpTransport::starttls_relay(&settings.smtp_host)
                .map_err(|e| NotificationError::Transport(format!("starttls relay init failed: {}", e)))?,
            SmtpTlsMode::Tls => SmtpTransport::relay(&settings.smtp_host)
                .map_err(|e| NotificationError::Transport(format!("tls relay init failed: {}", e)))?,
        };
        let mut builder = builder
            .port(settings.smtp_port)
            .timeout(Some(Duration::from_secs(settings.timeout_secs)));
        if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
            subject_prefix: settings.subject_prefix.clone(),
        })
    }

    pub fn subject(&self, count: usize, ctx: &ReportContext) -> String {
        format!(
            "{} Top {} {} papers for {}",
            self.subject_prefix, count, ctx.category, ctx.target_date
        )
        .trim()
        .to_string()
    }

    /// 构造邮件
    pub fn build_message(
        &self,
        results: &[AnalysisResult],
        html: String,
        ctx: &ReportContext,
    ) -> Result<Message, NotificationError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(self.subject(results.len(), ctx));
        for recipient in &self.to {
            builder = builder.to(recipient.clone());
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                plain_text_body(results, ctx),
                html,
            ))
            .map_err(|e| NotificationError::Message(e.to_string()))
    }
}

/// 邮件纯文本部分
pub fn plain_text_body(results: &[AnalysisResult], ctx: &ReportContext) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "arXiv {} top {} papers submitted on {}\n",
        ctx.category,
        results.len(),
        ctx.target_date
    );
    for result in results {
        let _ = writeln!(
            body,
            "{}. {} (score {:.2})\n   {}",
            result.rank, result.title, result.score, result.html_url
        );
        if let Some(summary) = result.text_field("summary") {
            let _ = writeln!(body, "   {}", truncate_chars(summary, 300));
        }
        body.push('\n');
    }
    body
}

#[async_trait]
impl ReportNotifier for SmtpNotifier {
    async fn send_report(
        &self,
        results: &[AnalysisResult],
        report_path: &Path,
        ctx: &ReportContext,
    ) -> Result<(), NotificationError> {
        let html = tokio::fs::read_to_string(report_path).await.map_err(|e| {
            NotificationError::Message(format!(
                "cannot read report {}: {}",
                report_path.display(),
                e
            ))
        })?;
        let message = self.build_message(results, html, ctx)?;

        let transport = self.transport.clone();
        let response = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| NotificationError::Join(e.to_string()))?
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        info!(
            recipients = self.to.len(),
            code = %response.code(),
            "Report email accepted by SMTP server"
        );
        Ok(())
    }
}
