// ABOUTME: boxscores spider: monthly schedules and the box score of every game found on them.
// ABOUTME: Accepts seasons, a season range, months, a date window, explicit games and only-schedules.

use bbref_extract::{parse_box_score, parse_schedule, urls, ExtractError, Page};
use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::args::SpiderArgs;
use crate::error::ConfigError;
use crate::request::{Callback, ParseOutput, Request};
use crate::spiders::{absolute, GameSelection, Spider, GAME_SELECTION_ARGS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxScoresSpider {
    pub selection: GameSelection,
}

impl BoxScoresSpider {
    pub const NAME: &'static str = "boxscores";

    pub fn from_args(args: &SpiderArgs) -> Result<Self, ConfigError> {
        Self::from_args_at(args, Local::now().date_naive())
    }

    pub fn from_args_at(args: &SpiderArgs, today: NaiveDate) -> Result<Self, ConfigError> {
        args.warn_unknown(Self::NAME, GAME_SELECTION_ARGS);
        Ok(Self {
            selection: GameSelection::from_args_at(args, Self::NAME, today)?,
        })
    }
}

impl Spider for BoxScoresSpider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn start_requests(&self, base_url: &str) -> Vec<Request> {
        let mut requests = self.selection.schedule_requests(base_url);
        requests.extend(self.selection.games.iter().map(|game_id| {
            Request::new(absolute(base_url, &urls::box_score_path(game_id)), Callback::BoxScore)
        }));
        requests
    }

    fn parse(&self, page: &Page, callback: Callback) -> Result<ParseOutput, ExtractError> {
        match callback {
            Callback::Schedule => {
                let extraction = parse_schedule(page)?;
                let output = ParseOutput::new(extraction.records);
                if self.selection.only_schedules {
                    return Ok(output);
                }
                Ok(output.follow(
                    extraction
                        .links
                        .into_iter()
                        .map(|href| Request::new(href, Callback::BoxScore)),
                ))
            }
            Callback::BoxScore => Ok(ParseOutput::new(parse_box_score(page)?.records)),
            other => {
                debug!(spider = Self::NAME, callback = %other, url = %page.url, "no parser bound to callback");
                Ok(ParseOutput::default())
            }
        }
    }
}
