// ABOUTME: shots spider: shot charts for explicit games or for every game on the selected schedules.
// ABOUTME: Box score links found on schedule pages are rewritten to the game's shot chart page.

use bbref_extract::{parse_schedule, parse_shot_chart, urls, ExtractError, Page};
use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::args::SpiderArgs;
use crate::error::ConfigError;
use crate::request::{Callback, ParseOutput, Request};
use crate::spiders::{absolute, GameSelection, Spider, GAME_SELECTION_ARGS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotsSpider {
    pub selection: GameSelection,
}

impl ShotsSpider {
    pub const NAME: &'static str = "shots";

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

impl Spider for ShotsSpider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn start_requests(&self, base_url: &str) -> Vec<Request> {
        let mut requests = self.selection.schedule_requests(base_url);
        requests.extend(self.selection.games.iter().map(|game_id| {
            Request::new(absolute(base_url, &urls::shot_chart_path(game_id)), Callback::ShotChart)
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
                let charts = extraction
                    .links
                    .iter()
                    .filter_map(|href| urls::box_score_link_game_id(href))
                    .map(|game_id| Request::new(urls::shot_chart_path(game_id), Callback::ShotChart))
                    .collect::<Vec<_>>();
                Ok(output.follow(charts))
            }
            Callback::ShotChart => Ok(ParseOutput::new(parse_shot_chart(page)?.records)),
            other => {
                debug!(spider = Self::NAME, callback = %other, url = %page.url, "no parser bound to callback");
                Ok(ParseOutput::default())
            }
        }
    }
}
