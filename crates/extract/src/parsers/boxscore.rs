// ABOUTME: Game box score parser producing basic and advanced per-player rows.
// ABOUTME: Decodes team code and box type from each box- table id and numbers players per table.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::{debug, warn};

use crate::cells::{extract_row, BOX_SCORE_RULES};
use crate::error::ExtractError;
use crate::html_utils::data_rows;
use crate::page::{Extraction, Page};
use crate::parsers::{iso_game_date, split_game_id};
use crate::record::{EmittedRecord, Entry, RecordKind};
use crate::schema::TableKind;
use crate::urls;

static BOX_TABLES: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"table[id^="box-"]"#).unwrap());
static BOX_TABLE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^box-([A-Z]{3})-(.+-.+)$").unwrap());

/// Team code and box type decoded from a box score table id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxTable {
    pub team_id: String,
    /// e.g. `game-basic`, `game-advanced`, `q1-basic`.
    pub box_type: String,
}

impl BoxTable {
    /// Decodes ids of the form `box-{TEAM}-{period}-{variant}`.
    pub fn from_id(id: &str) -> Option<Self> {
        let caps = BOX_TABLE_ID.captures(id)?;
        Some(Self {
            team_id: caps.get(1)?.as_str().to_string(),
            box_type: caps.get(2)?.as_str().to_string(),
        })
    }

    /// Rows of an `...-advanced` table are advanced entries, all others basic.
    pub fn table_kind(&self) -> TableKind {
        if self.box_type.ends_with("advanced") {
            TableKind::AdvancedBoxScore
        } else {
            TableKind::BasicBoxScore
        }
    }
}

/// Parses a game box score page (`/boxscores/{game_id}.html`).
///
/// Emits up to two batches: `games/boxscores/advanced/{year}/{rest}.csv` and
/// `games/boxscores/basic/{year}/{rest}.csv`, each only when non-empty.
pub fn parse_box_score(page: &Page) -> Result<Extraction, ExtractError> {
    let game_id = urls::game_id_from_url(&page.url)
        .ok_or_else(|| ExtractError::url_pattern(&page.url, "game id"))?;
    let date = iso_game_date(game_id).ok_or_else(|| ExtractError::GameId(game_id.to_string()))?;

    let doc = page.document();
    let mut basic = Vec::new();
    let mut advanced = Vec::new();

    for table in doc.select(&BOX_TABLES) {
        let id = table.value().attr("id").unwrap_or_default();
        let Some(box_table) = BoxTable::from_id(id) else {
            warn!(table_id = %id, game_id, "skipping box table with unexpected id");
            continue;
        };
        let rows = table_entries(table, &box_table, game_id, &date);
        match box_table.table_kind() {
            TableKind::AdvancedBoxScore => advanced.extend(rows),
            _ => basic.extend(rows),
        }
    }
    debug!(game_id, basic = basic.len(), advanced = advanced.len(), "parsed box score");

    let (year, rest) = split_game_id(game_id);
    let mut out = Extraction::new();
    out.push_record(EmittedRecord::rows(
        RecordKind::BoxScore,
        TableKind::AdvancedBoxScore,
        format!("games/boxscores/advanced/{}", year),
        rest,
        advanced,
    ));
    out.push_record(EmittedRecord::rows(
        RecordKind::BoxScore,
        TableKind::BasicBoxScore,
        format!("games/boxscores/basic/{}", year),
        rest,
        basic,
    ));
    Ok(out)
}

/// One entry per player row of a box table; `pnum` restarts at 1 per table.
fn table_entries(table: ElementRef<'_>, box_table: &BoxTable, game_id: &str, date: &str) -> Vec<Entry> {
    let is_home = game_id.contains(box_table.team_id.as_str());
    data_rows(table)
        .enumerate()
        .map(|(index, row)| {
            let mut entry = Entry::new(box_table.table_kind());
            entry.set("game_id", game_id);
            entry.set("team_id", box_table.team_id.as_str());
            entry.set("box_type", box_table.box_type.as_str());
            entry.set("date", date);
            entry.set("ishome", is_home);
            entry.set("pnum", index + 1);
            entry.apply(extract_row(row, &BOX_SCORE_RULES));
            entry
        })
        .collect()
}
