// ABOUTME: player spider: player profiles by id and alphabetical player indexes by letter.
// ABOUTME: Index pages are written as player lists and every profile they link to is followed.

use bbref_extract::{parse_player_list, parse_player_profile, urls, ExtractError, Page, ProfileOptions};
use tracing::debug;

use crate::args::SpiderArgs;
use crate::error::ConfigError;
use crate::request::{Callback, ParseOutput, Request};
use crate::spiders::{absolute, Spider};

const PLAYER_ARGS: &[&str] = &["ids", "l", "all", "season-stats"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSpider {
    pub ids: Vec<String>,
    pub letters: Vec<char>,
    pub profile: ProfileOptions,
}

impl PlayerSpider {
    pub const NAME: &'static str = "player";

    /// `ids=jamesle01,hardeja01` fetches profiles directly; `l=a,b` or `all`
    /// crawls index pages. `season-stats` also writes flat season tables.
    pub fn from_args(args: &SpiderArgs) -> Result<Self, ConfigError> {
        args.warn_unknown(Self::NAME, PLAYER_ARGS);

        let ids = args
            .list("ids")
            .unwrap_or_default()
            .into_iter()
            .map(str::to_string)
            .collect();

        let letters = match args.list("l") {
            Some(items) => items.into_iter().map(parse_letter).collect::<Result<_, _>>()?,
            None if args.flag("all") => ('a'..='z').collect(),
            None => Vec::new(),
        };

        Ok(Self {
            ids,
            letters,
            profile: ProfileOptions {
                season_stats: args.flag("season-stats"),
            },
        })
    }
}

fn parse_letter(item: &str) -> Result<char, ConfigError> {
    let mut chars = item.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => Ok(c),
        _ => Err(ConfigError::invalid("l", item, "expected a single letter a-z")),
    }
}

impl Spider for PlayerSpider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn start_requests(&self, base_url: &str) -> Vec<Request> {
        let profiles = self
            .ids
            .iter()
            .map(|id| Request::new(absolute(base_url, &urls::player_path(id)), Callback::PlayerProfile));
        let indexes = self.letters.iter().map(|&letter| {
            Request::new(absolute(base_url, &urls::player_index_path(letter)), Callback::PlayerList)
        });
        profiles.chain(indexes).collect()
    }

    fn parse(&self, page: &Page, callback: Callback) -> Result<ParseOutput, ExtractError> {
        match callback {
            Callback::PlayerList => {
                let extraction = parse_player_list(page)?;
                Ok(ParseOutput::new(extraction.records).follow(
                    extraction
                        .links
                        .into_iter()
                        .map(|href| Request::new(href, Callback::PlayerProfile)),
                ))
            }
            Callback::PlayerProfile => Ok(ParseOutput::new(
                parse_player_profile(page, self.profile)?.records,
            )),
            other => {
                debug!(spider = Self::NAME, callback = %other, url = %page.url, "no parser bound to callback");
                Ok(ParseOutput::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://www.basketball-reference.com";

    fn spider(items: &[&str]) -> Result<PlayerSpider, ConfigError> {
        PlayerSpider::from_args(&SpiderArgs::parse(items).unwrap())
    }

    #[test]
    fn test_ids_and_letters() {
        let requests = spider(&["ids=hardeja01", "l=q"]).unwrap().start_requests(BASE);
        assert_eq!(
            requests,
            vec![
                Request::new(format!("{}/players/h/hardeja01.html", BASE), Callback::PlayerProfile),
                Request::new(format!("{}/players/q/", BASE), Callback::PlayerList),
            ]
        );
    }

    #[test]
    fn test_all_letters() {
        let s = spider(&["all"]).unwrap();
        assert_eq!(s.letters.len(), 26);
        assert_eq!(s.letters.first(), Some(&'a'));
        assert_eq!(s.letters.last(), Some(&'z'));
    }

    #[test]
    fn test_explicit_letters_win_over_all() {
        let s = spider(&["all", "l=x,y"]).unwrap();
        assert_eq!(s.letters, vec!['x', 'y']);
    }

    #[test]
    fn test_bad_letter_is_fatal() {
        assert!(matches!(
            spider(&["l=ab"]),
            Err(ConfigError::InvalidValue { key: "l", .. })
        ));
        assert!(spider(&["l=Q"]).is_err());
        assert!(spider(&["l=1"]).is_err());
    }

    #[test]
    fn test_season_stats_flag() {
        assert!(spider(&["ids=jamesle01", "season-stats"]).unwrap().profile.season_stats);
        assert!(!spider(&["ids=jamesle01"]).unwrap().profile.season_stats);
    }
}
