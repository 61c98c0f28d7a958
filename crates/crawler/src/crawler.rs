// ABOUTME: The crawl engine: schedules spider requests, fetches pages concurrently and runs parse continuations.
// ABOUTME: De-duplicates URLs, resolves follow-up links, writes every batch through the sink and never aborts on a page error.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use bbref_extract::{EmittedRecord, Page};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::CrawlError;
use crate::fetch::{fetch, FetchOptions, FetchResult};
use crate::options::{CrawlOptions, CrawlerBuilder};
use crate::request::{ParseOutput, Request};
use crate::sink::OutputSink;
use crate::spiders::Spider;

/// Counters for one crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub requests_scheduled: usize,
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    pub parse_failures: usize,
    /// Rows written; a profile document counts the rows of all its tables.
    pub records_written: usize,
    pub write_failures: usize,
}

impl CrawlStats {
    pub fn failures(&self) -> usize {
        self.fetch_failures + self.parse_failures + self.write_failures
    }
}

/// Runs spiders against the site.
pub struct Crawler {
    opts: CrawlOptions,
    client: reqwest::Client,
    fetch_opts: FetchOptions,
    sink: Arc<dyn OutputSink>,
}

impl Crawler {
    pub fn builder() -> CrawlerBuilder {
        CrawlerBuilder::new()
    }

    pub(crate) fn new(opts: CrawlOptions, client: reqwest::Client, sink: Arc<dyn OutputSink>) -> Self {
        let fetch_opts = FetchOptions {
            headers: opts.headers.clone(),
        };
        Self {
            opts,
            client,
            fetch_opts,
            sink,
        }
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.opts
    }

    /// Crawls until no request is left.
    ///
    /// Only an unusable base URL fails the crawl. Fetch, parse and write
    /// errors are logged, counted and skipped.
    pub async fn run(&self, spider: &dyn Spider) -> Result<CrawlStats, CrawlError> {
        let base = Url::parse(&self.opts.base_url).map_err(|e| {
            CrawlError::invalid_url(&self.opts.base_url, Some(anyhow::anyhow!("invalid base URL: {}", e)))
        })?;

        let mut stats = CrawlStats::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<Request> = VecDeque::new();

        let start = spider.start_requests(base.as_str());
        info!(spider = spider.name(), requests = start.len(), "starting crawl");
        for request in start {
            self.schedule(&base, request, &mut seen, &mut queue, &mut stats);
        }

        let mut in_flight = FuturesUnordered::new();
        loop {
            while in_flight.len() < self.opts.concurrency {
                let Some(request) = queue.pop_front() else {
                    break;
                };
                in_flight.push(self.fetch_request(request));
            }

            let Some((request, result)) = in_flight.next().await else {
                break;
            };

            let fetched = match result {
                Ok(fetched) => fetched,
                Err(e) => {
                    stats.fetch_failures += 1;
                    warn!(callback = %request.callback, error = %e, "fetch failed");
                    continue;
                }
            };
            stats.pages_fetched += 1;

            let page = Page::new(fetched.final_url.clone(), fetched.text());
            let output = match spider.parse(&page, request.callback) {
                Ok(output) => output,
                Err(e) => {
                    stats.parse_failures += 1;
                    warn!(url = %page.url, callback = %request.callback, error = %e, "parse failed");
                    continue;
                }
            };
            debug!(
                url = %page.url,
                records = output.records.len(),
                follow = output.requests.len(),
                "parsed page"
            );

            let ParseOutput { records, requests } = output;
            let batches = records.len();
            let sink = Arc::clone(&self.sink);
            match tokio::task::spawn_blocking(move || write_batches(sink.as_ref(), &records)).await {
                Ok(written) => {
                    stats.records_written += written.rows;
                    stats.write_failures += written.failures;
                }
                Err(e) => {
                    stats.write_failures += batches;
                    warn!(url = %page.url, error = %e, "write task failed");
                }
            }

            let page_url = Url::parse(&page.url).unwrap_or_else(|_| base.clone());
            for follow in requests {
                self.schedule(&page_url, follow, &mut seen, &mut queue, &mut stats);
            }
        }

        info!(
            spider = spider.name(),
            pages = stats.pages_fetched,
            records = stats.records_written,
            failures = stats.failures(),
            "crawl finished"
        );
        Ok(stats)
    }

    /// Resolves `request` against `origin` and queues it unless already seen.
    fn schedule(
        &self,
        origin: &Url,
        request: Request,
        seen: &mut HashSet<String>,
        queue: &mut VecDeque<Request>,
        stats: &mut CrawlStats,
    ) {
        let url = match origin.join(&request.url) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(href = %request.url, error = %e, "skipping unresolvable link");
                return;
            }
        };
        if !seen.insert(url.clone()) {
            return;
        }
        stats.requests_scheduled += 1;
        queue.push_back(Request::new(url, request.callback));
    }

    async fn fetch_request(&self, request: Request) -> (Request, Result<FetchResult, CrawlError>) {
        debug!(url = %request.url, callback = %request.callback, "fetching");
        let result = fetch(&self.client, &request.url, &self.fetch_opts).await;
        (request, result)
    }
}

#[derive(Debug, Default)]
struct Written {
    rows: usize,
    failures: usize,
}

/// Writes every batch of one page. Runs on the blocking pool.
fn write_batches(sink: &dyn OutputSink, records: &[EmittedRecord]) -> Written {
    let mut written = Written::default();
    for record in records {
        match sink.write(record) {
            Ok(_) => written.rows += record.payload.row_count(),
            Err(e) => {
                written.failures += 1;
                warn!(path = %e.path().display(), error = %e, "write failed");
            }
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Callback;
    use bbref_extract::ExtractError;

    struct Fixed(Vec<Request>);

    impl Spider for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn start_requests(&self, _base_url: &str) -> Vec<Request> {
            self.0.clone()
        }

        fn parse(&self, _page: &Page, _callback: Callback) -> Result<ParseOutput, ExtractError> {
            Ok(ParseOutput::default())
        }
    }

    #[test]
    fn test_schedule_dedupes_and_resolves() {
        let crawler = Crawler::builder().build().unwrap();
        let origin = Url::parse("https://www.basketball-reference.com/leagues/NBA_2023_games-january.html").unwrap();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        let mut stats = CrawlStats::default();

        for href in ["/boxscores/202301150LAL.html", "/boxscores/202301150LAL.html", "../boxscores/202301150LAL.html"] {
            crawler.schedule(&origin, Request::new(href, Callback::BoxScore), &mut seen, &mut queue, &mut stats);
        }
        assert_eq!(queue.len(), 1);
        assert_eq!(stats.requests_scheduled, 1);
        assert_eq!(queue[0].url, "https://www.basketball-reference.com/boxscores/202301150LAL.html");
    }

    #[tokio::test]
    async fn test_invalid_base_url_fails_the_crawl() {
        let crawler = Crawler::builder().base_url("not a url").build().unwrap();
        let err = crawler.run(&Fixed(vec![])).await.unwrap_err();
        assert!(err.is_invalid_url());
    }

    #[tokio::test]
    async fn test_empty_spider_finishes_immediately() {
        let crawler = Crawler::builder().build().unwrap();
        let stats = crawler.run(&Fixed(vec![])).await.unwrap();
        assert_eq!(stats, CrawlStats::default());
    }
}
