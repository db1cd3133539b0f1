// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::domain::models::paper::PaperRecord;
use crate::utils::errors::FeedError;

/// 一页 Atom 结果
#[derive(Debug, Default)]
pub struct AtomPage {
    pub entries: Vec<PaperRecord>,
    /// `opensearch:totalResults`
    pub total_results: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Title,
    Summary,
    Published,
    Updated,
    AuthorName,
    Comment,
    TotalResults,
}

#[derive(Default)]
struct EntryBuilder {
    id: String,
    title: String,
    summary: String,
    published: String,
    updated: String,
    authors: Vec<String>,
    categories: Vec<String>,
    primary_category: Option<String>,
    pdf_url: Option<String>,
    comment: Option<String>,
}

impl EntryBuilder {
    fn is_api_error(&self) -> bool {
        self.id.contains("/api/errors")
    }

    fn build(self) -> Result<PaperRecord, FeedError> {
        let entry_id = self.id.trim().to_string();
        if entry_id.is_empty() {
            return Err(FeedError::Parse("entry without <id>".into()));
        }
        let published = parse_timestamp(&self.published, "published", &entry_id)?;
        // Fall back to the submission time when <updated> is missing
        let updated = if self.updated.trim().is_empty() {
            published
        } else {
            parse_timestamp(&self.updated, "updated", &entry_id)?
        };

        Ok(PaperRecord {
            entry_id,
            title: self.title.trim().to_string(),
            authors: self.authors,
            categories: self.categories,
            primary_category: self.primary_category,
            summary: self.summary.trim().to_string(),
            published,
            updated,
            pdf_url: self.pdf_url,
            comment: self
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        })
    }
}

fn parse_timestamp(raw: &str, field: &str, entry_id: &str) -> Result<DateTime<Utc>, FeedError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| FeedError::Parse(format!("bad <{}> '{}' in {}: {}", field, raw.trim(), entry_id, e)))
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// 处理带属性的元素，`<link>` / `<category>` 在 feed 中通常是自闭合的
fn apply_attributes(entry: &mut EntryBuilder, e: &BytesStart<'_>) {
    match e.local_name().as_ref() {
        b"category" => {
            if let Some(term) = attribute(e, b"term") {
                if !entry.categories.contains(&term) {
                    entry.categories.push(term);
                }
            }
        }
        b"primary_category" => {
            entry.primary_category = attribute(e, b"term");
        }
        b"link" => {
            let is_pdf = attribute(e, b"title").as_deref() == Some("pdf")
                || attribute(e, b"type").as_deref() == Some("application/pdf");
            if is_pdf && entry.pdf_url.is_none() {
                entry.pdf_url = attribute(e, b"href");
            }
        }
        _ => {}
    }
}

/// 解析 arXiv API 返回的 Atom feed
///
/// # 错误
/// * XML 不合法、必填字段缺失或时间戳无法解析时返回 `FeedError::Parse`
/// * feed 中包含 arXiv 的错误条目时返回 `FeedError::Api`
pub fn parse_feed(xml: &str) -> Result<AtomPage, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut page = AtomPage::default();
    let mut entry: Option<EntryBuilder> = None;
    let mut field: Option<Field> = None;
    let mut total_results = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                if name.as_ref() == b"entry" {
                    entry = Some(EntryBuilder::default());
                    field = None;
                } else {
                    field = match (name.as_ref(), entry.as_mut()) {
                        (b"totalResults", None) => Some(Field::TotalResults),
                        (b"id", Some(_)) => Some(Field::Id),
                        (b"title", Some(_)) => Some(Field::Title),
                        (b"summary", Some(_)) => Some(Field::Summary),
                        (b"published", Some(_)) => Some(Field::Published),
                        (b"updated", Some(_)) => Some(Field::Updated),
                        (b"name", Some(_)) => Some(Field::AuthorName),
                        (b"comment", Some(_)) => Some(Field::Comment),
                        (_, Some(current)) => {
                            apply_attributes(current, &e);
                            None
                        }
                        _ => None,
                    };
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(current) = entry.as_mut() {
                    apply_attributes(current, &e);
                }
            }
            Ok(Event::Text(t)) => {
                let text = match field {
                    Some(_) => t
                        .unescape()
                        .map_err(|e| FeedError::Parse(format!("bad text: {}", e)))?,
                    None => Default::default(),
                };
                if field == Some(Field::TotalResults) {
                    total_results.push_str(&text);
                } else if let (Some(target), Some(current)) = (field, entry.as_mut()) {
                    match target {
                        Field::Id => current.id.push_str(&text),
                        Field::Title => current.title.push_str(&text),
                        Field::Summary => current.summary.push_str(&text),
                        Field::Published => current.published.push_str(&text),
                        Field::Updated => current.updated.push_str(&text),
                        Field::AuthorName => current.authors.push(text.trim().to_string()),
                        Field::Comment => current
                            .comment
                            .get_or_insert_with(String::new)
                            .push_str(&text),
                        Field::TotalResults => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                field = None;
                if e.local_name().as_ref() == b"entry" {
                    if let Some(done) = entry.take() {
                        if done.is_api_error() {
                            let message = done.summary.trim();
                            return Err(FeedError::Api(if message.is_empty() {
                                done.id.trim().to_string()
                            } else {
                                message.to_string()
                            }));
                        }
                        page.entries.push(done.build()?);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FeedError::Parse(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    page.total_results = total_results.trim().parse().ok();
    Ok(page)
}
