// ABOUTME: URL templates and URL patterns for basketball-reference pages.
// ABOUTME: Builds start paths, recognizes follow-up links and derives ids from a page's own URL.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default site root.
pub const BASE_URL: &str = "https://www.basketball-reference.com";

/// Month names as used in schedule page paths, indexed from 0.
pub const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static BOX_SCORE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/boxscores/(\d{9}[A-Z]{3})\.html").unwrap());
static PLAYER_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/players/[a-z]/[a-z]{7}\d{2}\.html").unwrap());

static GAME_ID_IN_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"/(\d{9}[A-Z]{3})\.html").unwrap());
static PLAYER_ID_IN_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"/([a-z\d]+)\.html").unwrap());
static SCHEDULE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/NBA_(\d{4})_games-([a-z]+)\.html").unwrap());
static PLAYOFF_SCHEDULE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/NBA_(\d{4})_games\.html").unwrap());

/// `/leagues/NBA_{season}_games-{month}.html`; `month` is 0-based.
pub fn schedule_path(season: i32, month: usize) -> Option<String> {
    let name = MONTHS.get(month)?;
    Some(format!("/leagues/NBA_{}_games-{}.html", season, name))
}

pub fn playoff_schedule_path(season: i32) -> String {
    format!("/playoffs/NBA_{}_games.html", season)
}

pub fn box_score_path(game_id: &str) -> String {
    format!("/boxscores/{}.html", game_id)
}

pub fn shot_chart_path(game_id: &str) -> String {
    format!("/boxscores/shot-chart/{}.html", game_id)
}

/// `/players/{first letter}/{id}.html`.
pub fn player_path(player_id: &str) -> String {
    let letter = player_id.chars().next().unwrap_or('_');
    format!("/players/{}/{}.html", letter, player_id)
}

pub fn player_index_path(letter: char) -> String {
    format!("/players/{}/", letter)
}

pub fn is_box_score_link(href: &str) -> bool {
    BOX_SCORE_LINK.is_match(href)
}

/// Game id of a box score link, e.g. `/boxscores/202301150LAL.html`.
pub fn box_score_link_game_id(href: &str) -> Option<&str> {
    BOX_SCORE_LINK
        .captures(href)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn is_player_link(href: &str) -> bool {
    PLAYER_LINK.is_match(href)
}

/// Game id (`YYYYMMDD0TTT`) from a box score or shot chart URL.
pub fn game_id_from_url(url: &str) -> Option<&str> {
    GAME_ID_IN_URL
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Player id from a profile URL such as `/players/h/hardeja01.html`.
pub fn player_id_from_url(url: &str) -> Option<&str> {
    PLAYER_ID_IN_URL
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// `(season, month name)` from a schedule URL.
pub fn schedule_from_url(url: &str) -> Option<(&str, &str)> {
    let caps = SCHEDULE_URL.captures(url)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

pub fn playoff_season_from_url(url: &str) -> Option<&str> {
    PLAYOFF_SCHEDULE_URL
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Letter of a player index URL: the last character once trailing slashes
/// are removed.
pub fn index_letter_from_url(url: &str) -> Option<char> {
    url.trim_end_matches('/').chars().last()
}
