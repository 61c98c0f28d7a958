// ABOUTME: Requests scheduled by spiders and the output of one parse continuation.
// ABOUTME: A Callback names the page parser that handles the response.

use std::fmt;

use bbref_extract::EmittedRecord;

/// The parser continuation bound to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callback {
    Schedule,
    PlayoffSchedule,
    BoxScore,
    ShotChart,
    PlayerList,
    PlayerProfile,
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Callback::Schedule => "schedule",
            Callback::PlayoffSchedule => "playoff_schedule",
            Callback::BoxScore => "box_score",
            Callback::ShotChart => "shot_chart",
            Callback::PlayerList => "player_list",
            Callback::PlayerProfile => "player_profile",
        };
        write!(f, "{}", s)
    }
}

/// A page to fetch. `url` may be relative; the engine resolves it against
/// the page it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub callback: Callback,
}

impl Request {
    pub fn new(url: impl Into<String>, callback: Callback) -> Self {
        Self {
            url: url.into(),
            callback,
        }
    }
}

/// Records to write and requests to schedule, produced from one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutput {
    pub records: Vec<EmittedRecord>,
    pub requests: Vec<Request>,
}

impl ParseOutput {
    pub fn new(records: Vec<EmittedRecord>) -> Self {
        Self {
            records,
            requests: Vec::new(),
        }
    }

    pub fn follow(mut self, requests: impl IntoIterator<Item = Request>) -> Self {
        self.requests.extend(requests);
        self
    }
}
