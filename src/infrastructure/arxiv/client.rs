// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::stream::{self, StreamExt};
use reqwest::header::ACCEPT;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use super::atom::{parse_feed, AtomPage};
use crate::config::settings::FeedSettings;
use crate::domain::feed::source::{FeedQuery, PaperFeed, PaperStream};
use crate::domain::models::paper::PaperRecord;
use crate::utils::errors::FeedError;
use crate::utils::retry_policy::RetryPolicy;

/// arXiv 单页上限
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// arXiv Atom API 客户端
///
/// 透明分页：每页之间固定等待 `page_delay`，失败的页按重试策略重试。
/// 流在第一个无法恢复的错误之后结束。
pub struct ArxivFeed {
    client: reqwest::Client,
    base_url: Url,
    page_size: usize,
    page_delay: Duration,
    retry: RetryPolicy,
}

impl ArxivFeed {
    pub fn new(
        base_url: &str,
        page_size: usize,
        page_delay: Duration,
        retry: RetryPolicy,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, FeedError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FeedError::Config(format!("invalid base url '{}': {}", base_url, e)))?;
        if page_size == 0 {
            return Err(FeedError::Config("page_size must be greater than 0".into()));
        }
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            page_size,
            page_delay,
            retry,
        })
    }

    pub fn from_settings(settings: &FeedSettings) -> Result<Self, FeedError> {
        Self::new(
            &settings.base_url,
            settings.page_size,
            settings.page_delay(),
            RetryPolicy::for_feed(settings.page_retries, settings.page_delay()),
            settings.timeout(),
            &settings.user_agent,
        )
    }

    async fn fetch_page(
        &self,
        query: &FeedQuery,
        start: usize,
        size: usize,
    ) -> Result<AtomPage, FeedError> {
        let search_query = query.search_query();
        let start = start.to_string();
        let size = size.to_string();
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[
                ("search_query", search_query.as_str()),
                ("sortBy", query.sort_by.as_str()),
                ("sortOrder", query.sort_order.as_str()),
                ("start", start.as_str()),
                ("max_results", size.as_str()),
            ])
            .header(ACCEPT, "application/atom+xml, application/xml;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        parse_feed(&body)
    }

    async fn fetch_page_with_retry(
        &self,
        query: &FeedQuery,
        start: usize,
        size: usize,
    ) -> Result<AtomPage, FeedError> {
        let mut attempt = 0;
        loop {
            match self.fetch_page(query, start, size).await {
                Ok(page) => return Ok(page),
                Err(e) if self.retry.should_retry_with_error(attempt, &e) => {
                    attempt += 1;
                    let backoff = self.retry.calculate_backoff(attempt);
                    warn!(
                        start,
                        attempt,
                        max_retries = self.retry.max_retries,
                        "arXiv page request failed, retrying in {:?}: {}",
                        backoff,
                        e
                    );
                    sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

struct Cursor<'a> {
    feed: &'a ArxivFeed,
    query: &'a FeedQuery,
    /// 下一页的偏移量
    start: usize,
    yielded: usize,
    buffered: VecDeque<PaperRecord>,
    exhausted: bool,
}

impl<'a> Cursor<'a> {
    async fn next_item(mut self) -> Option<(Result<PaperRecord, FeedError>, Self)> {
        loop {
            if self.yielded >= self.query.max_results {
                return None;
            }
            if let Some(paper) = self.buffered.pop_front() {
                self.yielded += 1;
                return Some((Ok(paper), self));
            }
            if self.exhausted {
                return None;
            }

            if self.start > 0 && !self.feed.page_delay.is_zero() {
                sleep(self.feed.page_delay).await;
            }
            let size = self
                .feed
                .page_size
                .min(self.query.max_results - self.yielded);
            debug!(start = self.start, size, "Fetching arXiv page");

            match self.feed.fetch_page_with_retry(self.query, self.start, size).await {
                Ok(page) => {
                    let received = page.entries.len();
                    if received == 0 {
                        return None;
                    }
                    self.start += received;
                    self.exhausted = match page.total_results {
                        Some(total) => self.start >= total,
                        None => received < size,
                    };
                    self.buffered.extend(page.entries);
                }
                Err(e) => {
                    self.exhausted = true;
                    self.buffered.clear();
                    return Some((Err(e), self));
                }
            }
        }
    }
}

impl PaperFeed for ArxivFeed {
    fn results<'a>(&'a self, query: &'a FeedQuery) -> PaperStream<'a> {
        let cursor = Cursor {
            feed: self,
            query,
            start: 0,
            yielded: 0,
            buffered: VecDeque::new(),
            exhausted: false,
        };
        stream::unfold(cursor, Cursor::next_item).boxed()
    }

    fn name(&self) -> &'static str {
        "arxiv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn entry(id: u32, day: u32) -> String {
        format!(
            r#"<entry>
    <id>http://arxiv.org/abs/2501.{id:05}v1</id>
    <updated>2025-01-{day:02}T10:00:00Z</updated>
    <published>2025-01-{day:02}T10:00:00Z</published>
    <title>Paper {id}</title>
    <summary>Abstract {id}.</summary>
    <author><name>Author {id}</name></author>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
  </entry>"#
        )
    }

    fn feed_xml(total: usize, ids: std::ops::Range<u32>) -> String {
        let entries: String = ids.map(|id| entry(id, 15)).collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <opensearch:totalResults xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">{total}</opensearch:totalResults>
  {entries}
</feed>"#
        )
    }

    fn feed(server: &MockServer, page_size: usize) -> ArxivFeed {
        ArxivFeed::new(
            &format!("{}/api/query", server.uri()),
            page_size,
            Duration::ZERO,
            RetryPolicy::immediate(2),
            Duration::from_secs(5),
            "arxiv-daily-test",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_pages_until_total_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("search_query", "cat:cs.AI"))
            .and(query_param("sortBy", "submittedDate"))
            .and(query_param("sortOrder", "descending"))
            .and(query_param("start", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(5, 0..2)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("start", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(5, 2..4)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("start", "4"))
            .and(query_param("max_results", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(5, 4..5)))
            .expect(1)
            .mount(&server)
            .await;

        let feed = feed(&server, 2);
        let query = FeedQuery::latest_submissions("cs.AI", 200);
        let papers: Vec<_> = feed.results(&query).collect().await;

        assert_eq!(papers.len(), 5);
        assert!(papers.iter().all(|p| p.is_ok()));
    }

    #[tokio::test]
    async fn test_stops_at_max_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("max_results", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(100, 0..3)))
            .expect(1)
            .mount(&server)
            .await;

        let feed = feed(&server, 10);
        let query = FeedQuery::latest_submissions("cs.AI", 3);
        let papers: Vec<_> = feed.results(&query).collect().await;

        assert_eq!(papers.len(), 3);
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("start", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(4, 0..2)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("start", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(4, 2..4)))
            .expect(0)
            .mount(&server)
            .await;

        let feed = feed(&server, 2);
        let query = FeedQuery::latest_submissions("cs.AI", 200);
        let first: Vec<_> = feed.results(&query).take(2).collect().await;

        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn test_retries_server_errors_then_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let feed = feed(&server, 10);
        let query = FeedQuery::latest_submissions("cs.AI", 200);
        let items: Vec<_> = feed.results(&query).collect().await;

        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(FeedError::Status(503))));
    }

    #[tokio::test]
    async fn test_api_error_is_not_retried() {
        let server = MockServer::start().await;
        let body = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>
  <id>http://arxiv.org/api/errors#malformed_query</id>
  <title>Error</title><summary>malformed query</summary>
</entry></feed>"#;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let feed = feed(&server, 10);
        let query = FeedQuery::latest_submissions("cs.AI", 200);
        let items: Vec<_> = feed.results(&query).collect().await;

        assert!(matches!(items.as_slice(), [Err(FeedError::Api(_))]));
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let result = ArxivFeed::new(
            "not a url",
            100,
            Duration::ZERO,
            RetryPolicy::immediate(0),
            Duration::from_secs(1),
            "ua",
        );
        assert!(matches!(result, Err(FeedError::Config(_))));
    }
}
