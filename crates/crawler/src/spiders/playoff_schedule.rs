// ABOUTME: playoff_schedule spider: one playoff schedule page per selected season.
// ABOUTME: Accepts seasons, a season range or a date window; game links are not followed.

use bbref_extract::{parse_playoff_schedule, urls, ExtractError, Page};
use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::args::SpiderArgs;
use crate::error::ConfigError;
use crate::request::{Callback, ParseOutput, Request};
use crate::spiders::{absolute, selected_seasons, Spider};

const PLAYOFF_ARGS: &[&str] = &["seasons", "from_season", "to_season", "date"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayoffScheduleSpider {
    pub seasons: Vec<i32>,
}

impl PlayoffScheduleSpider {
    pub const NAME: &'static str = "playoff_schedule";

    pub fn from_args(args: &SpiderArgs) -> Result<Self, ConfigError> {
        Self::from_args_at(args, Local::now().date_naive())
    }

    pub fn from_args_at(args: &SpiderArgs, today: NaiveDate) -> Result<Self, ConfigError> {
        args.warn_unknown(Self::NAME, PLAYOFF_ARGS);
        Ok(Self {
            seasons: selected_seasons(args, Self::NAME, today)?,
        })
    }
}

impl Spider for PlayoffScheduleSpider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn start_requests(&self, base_url: &str) -> Vec<Request> {
        self.seasons
            .iter()
            .map(|&season| {
                Request::new(
                    absolute(base_url, &urls::playoff_schedule_path(season)),
                    Callback::PlayoffSchedule,
                )
            })
            .collect()
    }

    fn parse(&self, page: &Page, callback: Callback) -> Result<ParseOutput, ExtractError> {
        match callback {
            Callback::PlayoffSchedule => Ok(ParseOutput::new(parse_playoff_schedule(page)?.records)),
            other => {
                debug!(spider = Self::NAME, callback = %other, url = %page.url, "no parser bound to callback");
                Ok(ParseOutput::default())
            }
        }
    }
}
