// ABOUTME: Schedule page parsers for regular-season months and playoff seasons.
// ABOUTME: Builds one ScheduleEntry per game row and collects box score links for follow-up.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::html_utils::{data_rows, first_text, hrefs};
use crate::page::{Extraction, Page};
use crate::parsers::iso_game_date;
use crate::record::{EmittedRecord, Entry, RecordKind, ScheduleEntry};
use crate::schema::TableKind;
use crate::urls;

static SCHEDULE_TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table#schedule").unwrap());

/// Parses a monthly schedule page (`/leagues/NBA_{season}_games-{month}.html`).
///
/// Emits `schedule/games/{season}_{month}.csv` and returns every box score
/// link on the page as a follow-up candidate.
pub fn parse_schedule(page: &Page) -> Result<Extraction, ExtractError> {
    let (season, month) = urls::schedule_from_url(&page.url)
        .ok_or_else(|| ExtractError::url_pattern(&page.url, "season and month"))?;

    let doc = page.document();
    let mut out = Extraction::new();
    out.links = hrefs(&doc)
        .filter(|href| urls::is_box_score_link(href))
        .map(str::to_string)
        .collect();

    let entries = schedule_entries(&doc);
    debug!(url = %page.url, games = entries.len(), links = out.links.len(), "parsed schedule");
    out.push_record(EmittedRecord::rows(
        RecordKind::Schedule,
        TableKind::Schedule,
        "schedule/games",
        format!("{}_{}", season, month),
        entries,
    ));
    Ok(out)
}

/// Parses a playoff schedule page (`/playoffs/NBA_{season}_games.html`).
///
/// Emits `schedule/playoffs/{season}.csv`. Links are not collected.
pub fn parse_playoff_schedule(page: &Page) -> Result<Extraction, ExtractError> {
    let season = urls::playoff_season_from_url(&page.url)
        .ok_or_else(|| ExtractError::url_pattern(&page.url, "season"))?;

    let doc = page.document();
    let entries = schedule_entries(&doc);
    debug!(url = %page.url, games = entries.len(), "parsed playoff schedule");

    let mut out = Extraction::new();
    out.push_record(EmittedRecord::rows(
        RecordKind::Schedule,
        TableKind::Schedule,
        "schedule/playoffs",
        season,
        entries,
    ));
    Ok(out)
}

fn schedule_entries(doc: &Html) -> Vec<Entry> {
    doc.select(&SCHEDULE_TABLE)
        .flat_map(data_rows)
        .map(|row| schedule_entry(row).into())
        .collect()
}

/// Builds the schedule entry of one game row.
pub fn schedule_entry(row: ElementRef<'_>) -> ScheduleEntry {
    let game_id = stat_sort_key(row, "date_game");
    let date = match game_id.as_deref() {
        Some(id) => {
            let date = iso_game_date(id);
            if date.is_none() {
                warn!(game_id = %id, "schedule row has an undecodable game id");
            }
            date
        }
        None => {
            warn!("schedule row has no date sort key");
            None
        }
    };

    ScheduleEntry {
        game_id,
        date,
        start_time: stat_text(row, "game_start_time"),
        visitor_team: stat_text(row, "visitor_team_name"),
        visitor_team_id: team_code(row, "visitor_team_name"),
        visitor_pts: stat_text(row, "visitor_pts"),
        home_team: stat_text(row, "home_team_name"),
        home_team_id: team_code(row, "home_team_name"),
        home_pts: stat_text(row, "home_pts"),
        overtimes: stat_text(row, "overtimes"),
        attendance: stat_text(row, "attendance"),
        game_remarks: stat_text(row, "game_remarks"),
    }
}

/// First element below `row` labelled with `stat`.
fn stat_cell<'a>(row: ElementRef<'a>, stat: &str) -> Option<ElementRef<'a>> {
    row.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().attr("data-stat") == Some(stat))
}

fn stat_text(row: ElementRef<'_>, stat: &str) -> Option<String> {
    stat_cell(row, stat).and_then(first_text)
}

/// First `csk` attribute on the labelled cell or anything inside it.
fn stat_sort_key(row: ElementRef<'_>, stat: &str) -> Option<String> {
    let cell = stat_cell(row, stat)?;
    cell.descendants()
        .filter_map(ElementRef::wrap)
        .find_map(|el| el.value().attr("csk"))
        .map(str::to_string)
}

/// Team code: the first three characters of the team cell's sort key.
fn team_code(row: ElementRef<'_>, stat: &str) -> Option<String> {
    stat_sort_key(row, stat).map(|csk| csk.chars().take(3).collect())
}
