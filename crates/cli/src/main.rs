// ABOUTME: bbref command line: run a spider against the site, or parse a saved page offline.
// ABOUTME: Installs the tracing subscriber (BBREF_LOG) and maps configuration errors to a failing exit.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use bbref_crawler::{build_spider, Crawler, FileSink, OutputSink, SpiderArgs, SPIDER_NAMES};
use bbref_extract::{
    parse_box_score, parse_player_list, parse_player_profile, parse_playoff_schedule,
    parse_schedule, parse_shot_chart, urls, Extraction, Page, ProfileOptions,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

/// Extract basketball-reference statistics into CSV and JSON files.
#[derive(Parser, Debug)]
#[command(name = "bbref")]
#[command(about = "Scrape basketball-reference schedules, box scores, players and shot charts", long_about = None)]
struct Cli {
    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a spider.
    Crawl(CrawlArgs),

    /// List the available spiders.
    Spiders,

    /// Parse a saved HTML page and write its records.
    Parse(ParseArgs),
}

#[derive(clap::Args, Debug)]
struct CrawlArgs {
    /// Spider name: boxscores, shots, player or playoff_schedule.
    spider: String,

    /// Spider argument as key=value (repeatable), e.g. -a seasons=2019,2020.
    #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE")]
    args: Vec<String>,

    /// Output root directory.
    #[arg(short = 'o', long, default_value = bbref_crawler::options::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Site root URL.
    #[arg(long, default_value = urls::BASE_URL)]
    base_url: String,

    /// Maximum concurrent requests.
    #[arg(long, default_value_t = 8)]
    concurrency: usize,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// User-Agent header.
    #[arg(long)]
    user_agent: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PageKind {
    Schedule,
    PlayoffSchedule,
    BoxScore,
    ShotChart,
    PlayerList,
    Player,
}

#[derive(clap::Args, Debug)]
struct ParseArgs {
    /// Saved HTML file.
    #[arg(long)]
    html: PathBuf,

    /// URL the page was fetched from; ids, seasons and letters are read from it.
    #[arg(long)]
    url: String,

    /// Page type; guessed from the URL when omitted.
    #[arg(long, value_enum)]
    page: Option<PageKind>,

    /// Output root directory.
    #[arg(short = 'o', long, default_value = bbref_crawler::options::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Also write flat season tables for player pages.
    #[arg(long)]
    season_stats: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("bbref error: {error:#}");
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        Command::Crawl(args) => crawl(args).await,
        Command::Spiders => {
            for name in SPIDER_NAMES {
                println!("{}", name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Parse(args) => parse_file(args),
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("BBREF_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

async fn crawl(args: CrawlArgs) -> Result<ExitCode> {
    let spider_args = SpiderArgs::parse(&args.args)?;
    let spider = build_spider(&args.spider, &spider_args)
        .with_context(|| format!("cannot start spider {}", args.spider))?;

    let mut builder = Crawler::builder()
        .base_url(args.base_url)
        .output_dir(args.output_dir)
        .concurrency(args.concurrency)
        .timeout(Duration::from_secs(args.timeout));
    if let Some(user_agent) = args.user_agent {
        builder = builder.user_agent(user_agent);
    }
    let crawler = builder.build()?;

    let stats = crawler.run(spider.as_ref()).await?;
    eprintln!(
        "{}: {} pages fetched, {} records written, {} fetch failures, {} parse failures, {} write failures",
        spider.name(),
        stats.pages_fetched,
        stats.records_written,
        stats.fetch_failures,
        stats.parse_failures,
        stats.write_failures,
    );
    Ok(ExitCode::SUCCESS)
}

fn parse_file(args: ParseArgs) -> Result<ExitCode> {
    let kind = match args.page {
        Some(kind) => kind,
        None => guess_page_kind(&args.url)
            .ok_or_else(|| anyhow!("cannot tell the page type of {}; pass --page", args.url))?,
    };
    let body = fs::read_to_string(&args.html)
        .with_context(|| format!("error reading file {:?}", args.html))?;
    let page = Page::new(args.url, body);

    let extraction: Extraction = match kind {
        PageKind::Schedule => parse_schedule(&page)?,
        PageKind::PlayoffSchedule => parse_playoff_schedule(&page)?,
        PageKind::BoxScore => parse_box_score(&page)?,
        PageKind::ShotChart => parse_shot_chart(&page)?,
        PageKind::PlayerList => parse_player_list(&page)?,
        PageKind::Player => parse_player_profile(
            &page,
            ProfileOptions {
                season_stats: args.season_stats,
            },
        )?,
    };

    let sink = FileSink::new(args.output_dir);
    let mut failed = false;
    for record in &extraction.records {
        match sink.write(record) {
            Ok(path) => println!("{}", path.display()),
            Err(error) => {
                eprintln!("error: {}", error);
                failed = true;
            }
        }
    }
    info!(records = extraction.records.len(), links = extraction.links.len(), "parsed page");

    if failed {
        bail!("some records could not be written");
    }
    Ok(ExitCode::SUCCESS)
}

fn guess_page_kind(url: &str) -> Option<PageKind> {
    if urls::schedule_from_url(url).is_some() {
        Some(PageKind::Schedule)
    } else if urls::playoff_season_from_url(url).is_some() {
        Some(PageKind::PlayoffSchedule)
    } else if url.contains("/boxscores/shot-chart/") {
        Some(PageKind::ShotChart)
    } else if url.contains("/boxscores/") {
        Some(PageKind::BoxScore)
    } else if url.contains("/players/") && url.ends_with(".html") {
        Some(PageKind::Player)
    } else if url.contains("/players/") {
        Some(PageKind::PlayerList)
    } else {
        None
    }
}
