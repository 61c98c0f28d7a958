// ABOUTME: Player index parser for the alphabetical /players/{letter}/ pages.
// ABOUTME: Builds PlayerListEntry rows and collects player profile links for follow-up.

use once_cell::sync::Lazy;
use scraper::Selector;
use tracing::debug;

use crate::cells::{extract_row, PLAYER_LIST_RULES};
use crate::error::ExtractError;
use crate::html_utils::{data_rows, hrefs};
use crate::page::{Extraction, Page};
use crate::record::{EmittedRecord, Entry, RecordKind, Value};
use crate::schema::TableKind;
use crate::urls;

static PLAYERS_TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table#players").unwrap());

/// Parses a player index page.
///
/// Emits `players/list/{letter}.csv` and returns every player profile link
/// on the page.
pub fn parse_player_list(page: &Page) -> Result<Extraction, ExtractError> {
    let letter = urls::index_letter_from_url(&page.url)
        .ok_or_else(|| ExtractError::url_pattern(&page.url, "index letter"))?;

    let doc = page.document();
    let mut out = Extraction::new();
    out.links = hrefs(&doc)
        .filter(|href| urls::is_player_link(href))
        .map(str::to_string)
        .collect();

    let entries: Vec<Entry> = doc
        .select(&PLAYERS_TABLE)
        .flat_map(data_rows)
        .map(|row| {
            let fields = extract_row(row, &PLAYER_LIST_RULES);
            player_list_entry(fields)
        })
        .collect();
    debug!(url = %page.url, players = entries.len(), links = out.links.len(), "parsed player list");

    out.push_record(EmittedRecord::rows(
        RecordKind::PlayerList,
        TableKind::PlayerList,
        "players/list",
        letter.to_string(),
        entries,
    ));
    Ok(out)
}

/// Builds a list entry from extracted row fields.
///
/// The list schema names the player's id column `player_id`; the index page
/// carries it as the player cell's `data-append-csv`, which the extractor
/// reports as `player_data-append-csv`.
fn player_list_entry(fields: Vec<(String, Value)>) -> Entry {
    let mut entry = Entry::new(TableKind::PlayerList);
    let xref = fields
        .iter()
        .find(|(name, _)| name == "player_data-append-csv")
        .map(|(_, value)| value.clone());
    entry.apply(fields);
    if let Some(id) = xref {
        entry.set("player_id", id);
    }
    entry
}
