// ABOUTME: Crawl engine configuration: CrawlOptions and the fluent CrawlerBuilder.
// ABOUTME: Holds base URL, output root, concurrency, user agent, timeout and extra headers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bbref_extract::urls::BASE_URL;

use crate::crawler::Crawler;
use crate::error::CrawlError;
use crate::sink::{FileSink, OutputSink};

/// Default `OUTPUT_DIR`-style output root.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Site root start requests are built against.
    pub base_url: String,
    pub output_dir: PathBuf,
    /// Maximum requests in flight.
    pub concurrency: usize,
    pub user_agent: String,
    pub timeout: Duration,
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::Client>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            concurrency: 8,
            user_agent: concat!("bbref/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            headers: HashMap::new(),
            http_client: None,
        }
    }
}

/// Builder for [`Crawler`].
#[derive(Clone, Default)]
pub struct CrawlerBuilder {
    opts: CrawlOptions,
    sink: Option<Arc<dyn OutputSink>>,
}

impl CrawlerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.opts.base_url = base_url.into();
        self
    }

    /// Root directory for the default file sink.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.opts.output_dir = dir.into();
        self
    }

    /// Maximum requests in flight; at least one.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.opts.concurrency = concurrency.max(1);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Uses a preconfigured HTTP client; user agent and timeout are then ignored.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Replaces the file sink rooted at the output directory.
    pub fn sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.opts
    }

    pub fn build(self) -> Result<Crawler, CrawlError> {
        let client = match &self.opts.http_client {
            Some(client) => client.clone(),
            None => reqwest::Client::builder()
                .user_agent(&self.opts.user_agent)
                .timeout(self.opts.timeout)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .map_err(|e| CrawlError::client(anyhow::anyhow!("failed to build HTTP client: {}", e)))?,
        };
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(FileSink::new(self.opts.output_dir.clone())));
        Ok(Crawler::new(self.opts, client, sink))
    }
}
