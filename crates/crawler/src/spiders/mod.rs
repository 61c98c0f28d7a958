// ABOUTME: Spider trait and the spider registry: boxscores, shots, player, playoff_schedule.
// ABOUTME: Shared season, month and date-window argument handling for the schedule-driven spiders.

//! Spiders.
//!
//! A spider turns its arguments into start requests and binds each response
//! to a page parser. Spiders never fetch; follow-up pages are returned as
//! [`Request`]s for the engine to schedule.
//!
//! Season selection, shared by the schedule-driven spiders:
//!
//! - `seasons=2019,2020` lists seasons explicitly.
//! - `from_season=2015 to_season=2018` gives an inclusive range and replaces
//!   an explicit list when both are present.
//! - `date=today` selects the current month, `date=season` every month; both
//!   cover the seasons from last year to next year and override the two
//!   options above.

pub mod boxscores;
pub mod player;
pub mod playoff_schedule;
pub mod shots;

use bbref_extract::{urls, ExtractError, Page};
use chrono::{Datelike, Local, NaiveDate};
use tracing::warn;

use crate::args::SpiderArgs;
use crate::error::ConfigError;
use crate::request::{Callback, ParseOutput, Request};

pub use boxscores::BoxScoresSpider;
pub use player::PlayerSpider;
pub use playoff_schedule::PlayoffScheduleSpider;
pub use shots::ShotsSpider;

/// A crawl controller.
pub trait Spider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Initial requests, as absolute URLs below `base_url`.
    fn start_requests(&self, base_url: &str) -> Vec<Request>;

    /// Runs the parser bound to `callback` on a fetched page.
    fn parse(&self, page: &Page, callback: Callback) -> Result<ParseOutput, ExtractError>;
}

/// Names accepted by [`build_spider`].
pub const SPIDER_NAMES: [&str; 4] = ["boxscores", "shots", "player", "playoff_schedule"];

/// Builds the named spider, resolving relative dates against the local date.
pub fn build_spider(name: &str, args: &SpiderArgs) -> Result<Box<dyn Spider>, ConfigError> {
    build_spider_at(name, args, Local::now().date_naive())
}

/// Builds the named spider with `today` as the reference date.
pub fn build_spider_at(
    name: &str,
    args: &SpiderArgs,
    today: NaiveDate,
) -> Result<Box<dyn Spider>, ConfigError> {
    let spider: Box<dyn Spider> = match name {
        "boxscores" => Box::new(BoxScoresSpider::from_args_at(args, today)?),
        "shots" => Box::new(ShotsSpider::from_args_at(args, today)?),
        "player" => Box::new(PlayerSpider::from_args(args)?),
        "playoff_schedule" => Box::new(PlayoffScheduleSpider::from_args_at(args, today)?),
        other => return Err(ConfigError::UnknownSpider(other.to_string())),
    };
    Ok(spider)
}

/// Joins a site path onto the base URL.
pub(crate) fn absolute(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// The `date` shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    Today,
    Season,
}

impl DateWindow {
    pub fn from_args(args: &SpiderArgs) -> Result<Option<Self>, ConfigError> {
        match args.get("date") {
            None => Ok(None),
            Some("today") => Ok(Some(DateWindow::Today)),
            Some("season") => Ok(Some(DateWindow::Season)),
            Some(other) => Err(ConfigError::invalid("date", other, "expected today or season")),
        }
    }

    /// Last year, this year and next year: a season is named after the year
    /// it ends in and spans two calendar years.
    pub fn seasons(self, today: NaiveDate) -> Vec<i32> {
        let year = today.year();
        vec![year - 1, year, year + 1]
    }

    /// 0-based months.
    pub fn months(self, today: NaiveDate) -> Vec<usize> {
        match self {
            DateWindow::Today => vec![today.month0() as usize],
            DateWindow::Season => (0..12).collect(),
        }
    }
}

/// Seasons selected by `seasons`, `from_season`/`to_season` and `date`.
pub(crate) fn selected_seasons(
    args: &SpiderArgs,
    spider: &str,
    today: NaiveDate,
) -> Result<Vec<i32>, ConfigError> {
    let mut seasons = args.parse_list::<i32>("seasons")?.unwrap_or_default();

    match (
        args.parse_one::<i32>("from_season")?,
        args.parse_one::<i32>("to_season")?,
    ) {
        (Some(from), Some(to)) => {
            if from > to {
                return Err(ConfigError::EmptyRange { from, to });
            }
            if !seasons.is_empty() {
                warn!(spider, from, to, "season range replaces the explicit seasons list");
            }
            seasons = (from..=to).collect();
        }
        (Some(_), None) => {
            return Err(ConfigError::IncompleteRange {
                given: "from_season",
                missing: "to_season",
            })
        }
        (None, Some(_)) => {
            return Err(ConfigError::IncompleteRange {
                given: "to_season",
                missing: "from_season",
            })
        }
        (None, None) => {}
    }

    if let Some(window) = DateWindow::from_args(args)? {
        seasons = window.seasons(today);
    }
    Ok(seasons)
}

/// 0-based months selected by `months` (1-based list or `all`) and `date`.
/// Defaults to every month.
pub(crate) fn selected_months(args: &SpiderArgs, today: NaiveDate) -> Result<Vec<usize>, ConfigError> {
    if let Some(window) = DateWindow::from_args(args)? {
        return Ok(window.months(today));
    }
    match args.get("months") {
        None | Some("all") => Ok((0..12).collect()),
        Some(_) => args
            .parse_list::<usize>("months")?
            .unwrap_or_default()
            .into_iter()
            .map(|month| match month {
                1..=12 => Ok(month - 1),
                _ => Err(ConfigError::invalid("months", month.to_string(), "month must be 1-12")),
            })
            .collect(),
    }
}

/// Season/month/game selection shared by the boxscores and shots spiders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSelection {
    pub seasons: Vec<i32>,
    /// 0-based.
    pub months: Vec<usize>,
    /// Explicit game ids; only used when no season is selected.
    pub games: Vec<String>,
    /// Write schedules without following their game links.
    pub only_schedules: bool,
}

pub(crate) const GAME_SELECTION_ARGS: &[&str] = &[
    "seasons",
    "from_season",
    "to_season",
    "months",
    "date",
    "games",
    "only-schedules",
];

impl GameSelection {
    pub fn from_args_at(args: &SpiderArgs, spider: &str, today: NaiveDate) -> Result<Self, ConfigError> {
        let seasons = selected_seasons(args, spider, today)?;
        let months = selected_months(args, today)?;

        let mut games: Vec<String> = args
            .list("games")
            .unwrap_or_default()
            .into_iter()
            .map(str::to_string)
            .collect();
        if !seasons.is_empty() && !games.is_empty() {
            warn!(spider, games = games.len(), "ignoring games because seasons are selected");
            games.clear();
        }

        Ok(Self {
            seasons,
            months,
            games,
            only_schedules: args.flag("only-schedules"),
        })
    }

    /// One schedule request per selected season and month.
    pub fn schedule_requests(&self, base_url: &str) -> Vec<Request> {
        self.seasons
            .iter()
            .flat_map(|&season| {
                self.months
                    .iter()
                    .filter_map(move |&month| urls::schedule_path(season, month))
            })
            .map(|path| Request::new(absolute(base_url, &path), Callback::Schedule))
            .collect()
    }
}
