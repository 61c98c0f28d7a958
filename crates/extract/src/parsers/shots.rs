// ABOUTME: Shot chart parser: one ShotEntry per tooltip marker in each team's shot overlay.
// ABOUTME: Reads quarter, clock and shot value from the tooltip, make/player from the class, position from the style.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::geometry::distance_cm_from_str;
use crate::page::{Extraction, Page};
use crate::parsers::split_game_id;
use crate::record::{EmittedRecord, Entry, RecordKind, ShotEntry};
use crate::schema::TableKind;
use crate::urls;

static TEAM_CONTAINERS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[id^="shots-"]"#).unwrap());
static TEAM_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"shots-([A-Z]{3})").unwrap());
static QUARTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\w\s]+),").unwrap());
static CLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r" (\d{1,2}:\d{2}.\d{1,2}) ").unwrap());
static MAKE: Lazy<Regex> = Lazy::new(|| Regex::new(r" make$").unwrap());
static PLAYER: Lazy<Regex> = Lazy::new(|| Regex::new(r" p-([a-z]{1,7}\d{2}) ").unwrap());
static LEFT: Lazy<Regex> = Lazy::new(|| Regex::new(r"left:\s*([\d.]+)px").unwrap());
static TOP: Lazy<Regex> = Lazy::new(|| Regex::new(r"top:\s*([\d.]+)px").unwrap());

/// Parses a shot chart page (`/boxscores/shot-chart/{game_id}.html`).
///
/// Shots of both teams are emitted together, in page order, as a single
/// `games/shots/{year}/{rest}.csv` batch.
pub fn parse_shot_chart(page: &Page) -> Result<Extraction, ExtractError> {
    let game_id = urls::game_id_from_url(&page.url)
        .ok_or_else(|| ExtractError::url_pattern(&page.url, "game id"))?;

    let doc = page.document();
    let mut shots: Vec<Entry> = Vec::new();

    for container in doc.select(&TEAM_CONTAINERS) {
        let id = container.value().attr("id").unwrap_or_default();
        let Some(team_id) = capture(&TEAM_ID, id) else {
            warn!(container_id = %id, game_id, "skipping shot container with unexpected id");
            continue;
        };
        let before = shots.len();
        shots.extend(
            container
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|el| el.value().attr("tip").is_some())
                .map(|marker| Entry::from(shot_entry(marker, game_id, team_id))),
        );
        debug!(game_id, team_id, shots = shots.len() - before, "parsed team shots");
    }

    let (year, rest) = split_game_id(game_id);
    let mut out = Extraction::new();
    out.push_record(EmittedRecord::rows(
        RecordKind::Shot,
        TableKind::Shot,
        format!("games/shots/{}", year),
        rest,
        shots,
    ));
    Ok(out)
}

/// Builds the shot entry of one marker element.
///
/// Fields whose pattern does not match are left empty; a marker is never
/// dropped.
pub fn shot_entry(marker: ElementRef<'_>, game_id: &str, team_id: &str) -> ShotEntry {
    let attrs = marker.value();
    let tip = attrs.attr("tip").unwrap_or_default();
    let class = attrs.attr("class");
    let style = attrs.attr("style").unwrap_or_default();

    let points = shot_points(tip);
    if points.is_none() {
        debug!(game_id, tip, "tooltip names no shot value");
    }

    let x_px = capture(&LEFT, style);
    let y_px = capture(&TOP, style);
    let distance_cm = match (x_px, y_px) {
        (Some(x), Some(y)) => distance_cm_from_str(x, y).map(|d| d.round() as i64),
        _ => None,
    };

    ShotEntry {
        game_id: game_id.to_string(),
        team_id: team_id.to_string(),
        player_id: class.and_then(|c| capture(&PLAYER, c)).map(str::to_string),
        quarter: capture(&QUARTER, tip).map(str::to_string),
        clock: capture(&CLOCK, tip).map(str::to_string),
        make: class.map(|c| MAKE.is_match(c)),
        points,
        x_px: x_px.map(str::to_string),
        y_px: y_px.map(str::to_string),
        distance_cm,
    }
}

/// 2 or 3, from the `2-pointer` / `3-pointer` wording of the tooltip.
pub fn shot_points(tip: &str) -> Option<u8> {
    if tip.contains("2-pointer") {
        Some(2)
    } else if tip.contains("3-pointer") {
        Some(3)
    } else {
        None
    }
}

fn capture<'a>(re: &Regex, haystack: &'a str) -> Option<&'a str> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
