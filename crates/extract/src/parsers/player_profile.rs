// ABOUTME: Player profile parser: every statistics table on the page, grouped by table id.
// ABOUTME: Unwraps comment-hidden tables first; optionally flattens season tables into CSV rows.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::cells::{extract_row, PLAYER_PROFILE_RULES};
use crate::error::ExtractError;
use crate::html_utils::{data_rows, unwrap_hidden_tables};
use crate::page::{Extraction, Page};
use crate::record::{EmittedRecord, Entry, ProfileEntry, ProfileTable, ProfileTables, RecordKind, Value};
use crate::schema::TableKind;
use crate::urls;

static STATS_TABLES: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"table[class*="stats_table"]"#).unwrap());

/// Tables whose rows are per-season stat lines.
pub const SEASON_TABLES: &[&str] = &["per_game", "totals", "per_minute", "per_poss"];

const PLAYOFFS_PREFIX: &str = "playoffs_";

/// Options for [`parse_player_profile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileOptions {
    /// Also emit season tables as flat `players/stats` CSV rows.
    pub season_stats: bool,
}

/// Parses a player profile page (`/players/{letter}/{player_id}.html`).
///
/// Emits `players/data/{letter}/{player_id}.json`, a mapping from table id
/// to that table's rows, and with [`ProfileOptions::season_stats`]
/// `players/stats/{letter}/{player_id}.csv`.
pub fn parse_player_profile(page: &Page, opts: ProfileOptions) -> Result<Extraction, ExtractError> {
    let player_id = urls::player_id_from_url(&page.url)
        .ok_or_else(|| ExtractError::url_pattern(&page.url, "player id"))?;

    let doc = Html::parse_document(&unwrap_hidden_tables(&page.body));
    let mut tables = ProfileTables::new();
    let mut season_rows = Vec::new();

    for table in doc.select(&STATS_TABLES) {
        let Some(table_id) = table.value().attr("id") else {
            warn!(player_id, "skipping statistics table without id");
            continue;
        };
        let entries = profile_entries(table, player_id, table_id);
        if opts.season_stats {
            if let Some((stat_type, is_playoff)) = season_table(table_id) {
                season_rows.extend(
                    entries
                        .iter()
                        .map(|e| season_stat_entry(e, stat_type, is_playoff)),
                );
            }
        }
        tables.insert(ProfileTable {
            id: table_id.to_string(),
            entries,
        });
    }
    debug!(player_id, tables = tables.len(), season_rows = season_rows.len(), "parsed player profile");

    let letter: String = player_id.chars().take(1).collect();
    let mut out = Extraction::new();
    out.push_record(EmittedRecord::tables(
        format!("players/data/{}", letter),
        player_id,
        tables,
    ));
    out.push_record(EmittedRecord::rows(
        RecordKind::PlayerStats,
        TableKind::SeasonStats,
        format!("players/stats/{}", letter),
        player_id,
        season_rows,
    ));
    Ok(out)
}

fn profile_entries(table: ElementRef<'_>, player_id: &str, table_id: &str) -> Vec<ProfileEntry> {
    data_rows(table)
        .map(|row| {
            let mut entry = ProfileEntry::new();
            entry.insert("player_id".into(), player_id.into());
            entry.insert("table_id".into(), table_id.into());
            for (name, value) in extract_row(row, &PLAYER_PROFILE_RULES) {
                entry.insert(name, value.to_json());
            }
            entry
        })
        .collect()
}

/// `(stat_type, is_playoff)` for season tables, None for everything else.
pub fn season_table(table_id: &str) -> Option<(&str, bool)> {
    let (stat_type, is_playoff) = match table_id.strip_prefix(PLAYOFFS_PREFIX) {
        Some(rest) => (rest, true),
        None => (table_id, false),
    };
    SEASON_TABLES
        .contains(&stat_type)
        .then_some((stat_type, is_playoff))
}

fn season_stat_entry(row: &ProfileEntry, stat_type: &str, is_playoff: bool) -> Entry {
    let mut entry = Entry::new(TableKind::SeasonStats);
    entry.apply(row.iter().map(|(name, value)| (name.clone(), from_json(value))));
    entry.set("stat_type", stat_type);
    entry.set("isplayoff", is_playoff);
    entry
}

fn from_json(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::String(s) => Value::Text(s.clone()),
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => n.as_i64().map(Value::Int).unwrap_or(Value::Text(n.to_string())),
        serde_json::Value::Null => Value::Missing,
        other => Value::Text(other.to_string()),
    }
}
