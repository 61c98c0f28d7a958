// ABOUTME: Crawl layer for basketball-reference: spiders, an async fetch engine and the file output sink.
// ABOUTME: Re-exports the spider registry, CrawlerBuilder and the error types.

//! bbref-crawler drives the page parsers of `bbref-extract` over the live
//! site (or any server laid out like it).
//!
//! ```no_run
//! use bbref_crawler::{build_spider, Crawler, SpiderArgs};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let args = SpiderArgs::parse(["seasons=2023", "months=1", "only-schedules"])?;
//! let spider = build_spider("boxscores", &args)?;
//! let crawler = Crawler::builder().output_dir("data").build()?;
//! let stats = crawler.run(spider.as_ref()).await?;
//! println!("{} records written", stats.records_written);
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod crawler;
pub mod error;
pub mod fetch;
pub mod options;
pub mod request;
pub mod sink;
pub mod spiders;

pub use args::SpiderArgs;
pub use crawler::{CrawlStats, Crawler};
pub use error::{ConfigError, CrawlError, SinkError};
pub use options::{CrawlOptions, CrawlerBuilder};
pub use request::{Callback, ParseOutput, Request};
pub use sink::{FileSink, OutputSink};
pub use spiders::{build_spider, build_spider_at, Spider, SPIDER_NAMES};
