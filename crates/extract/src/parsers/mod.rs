// ABOUTME: Page parsers, one per page type.
// ABOUTME: Shared helpers for deriving dates from game ids live here.

//! Page parsers.
//!
//! Every parser is a plain function from a [`crate::Page`] to an
//! [`crate::Extraction`]. Nothing is retained between calls; options that
//! change a parser's output are passed in explicitly.

pub mod boxscore;
pub mod player_list;
pub mod player_profile;
pub mod schedule;
pub mod shots;

use chrono::NaiveDate;

/// ISO date (`YYYY-MM-DD`) encoded in the first 8 characters of a game id.
///
/// Characters from the 9th on (the `0` separator and the home team code) are
/// not part of the date.
pub fn game_date(game_id: &str) -> Option<NaiveDate> {
    let year = game_id.get(0..4)?.parse().ok()?;
    let month = game_id.get(4..6)?.parse().ok()?;
    let day = game_id.get(6..8)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn iso_game_date(game_id: &str) -> Option<String> {
    game_date(game_id).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Output partition for per-game files: `(year, rest of the id)`.
pub(crate) fn split_game_id(game_id: &str) -> (&str, &str) {
    game_id.split_at(4.min(game_id.len()))
}
