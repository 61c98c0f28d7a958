// ABOUTME: Record schema registry: ordered field lists and default values per tabular record kind.
// ABOUTME: The field order here is the CSV header order written by the output sink.

//! Schema registry.
//!
//! Each tabular record kind has a fixed, ordered list of field names. A fresh
//! [`crate::record::Entry`] is pre-populated from its schema so that a row
//! missing an optional cell still yields a complete record.
//!
//! Defaults: minutes played (`mp`) and seconds played (`sp`) default to zero
//! on box score kinds, every other field defaults to [`Value::Missing`].

use std::fmt;

use crate::record::Value;

/// Tabular record kinds known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Schedule,
    BasicBoxScore,
    AdvancedBoxScore,
    PlayerList,
    SeasonStats,
    Shot,
}

impl TableKind {
    pub const ALL: [TableKind; 6] = [
        TableKind::Schedule,
        TableKind::BasicBoxScore,
        TableKind::AdvancedBoxScore,
        TableKind::PlayerList,
        TableKind::SeasonStats,
        TableKind::Shot,
    ];

    /// Returns the registered schema for this kind.
    pub fn schema(self) -> &'static Schema {
        match self {
            TableKind::Schedule => &SCHEDULE,
            TableKind::BasicBoxScore => &BASIC_BOX_SCORE,
            TableKind::AdvancedBoxScore => &ADVANCED_BOX_SCORE,
            TableKind::PlayerList => &PLAYER_LIST,
            TableKind::SeasonStats => &SEASON_STATS,
            TableKind::Shot => &SHOT,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TableKind::Schedule => "schedule",
            TableKind::BasicBoxScore => "basic box score",
            TableKind::AdvancedBoxScore => "advanced box score",
            TableKind::PlayerList => "player list",
            TableKind::SeasonStats => "season stats",
            TableKind::Shot => "shot",
        };
        write!(f, "{}", s)
    }
}

/// Ordered field list plus default-value rule for one record kind.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    pub kind: TableKind,
    pub fields: &'static [&'static str],
    zero_fields: &'static [&'static str],
}

impl Schema {
    /// Position of `field` in the schema, if it belongs to it.
    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.position(field).is_some()
    }

    /// Default value for `field`: zero for count fields, Missing otherwise.
    pub fn default_value(&self, field: &str) -> Value {
        if self.zero_fields.contains(&field) {
            Value::Int(0)
        } else {
            Value::Missing
        }
    }

    /// One default value per field, in schema order.
    pub fn defaults(&self) -> Vec<Value> {
        self.fields.iter().map(|f| self.default_value(f)).collect()
    }
}

const MINUTES_FIELDS: &[&str] = &["mp", "sp"];

pub static SCHEDULE: Schema = Schema {
    kind: TableKind::Schedule,
    fields: &[
        "game_id",
        "date",
        "start_time",
        "visitor_team",
        "visitor_team_id",
        "visitor_pts",
        "home_team",
        "home_team_id",
        "home_pts",
        "overtimes",
        "attendance",
        "game_remarks",
    ],
    zero_fields: &[],
};

pub static BASIC_BOX_SCORE: Schema = Schema {
    kind: TableKind::BasicBoxScore,
    fields: &[
        "game_id",
        "team_id",
        "box_type",
        "date",
        "ishome",
        "pnum",
        "player",
        "player_href",
        "player_csk",
        "player_id",
        "mp",
        "sp",
        "fg",
        "fga",
        "fg_pct",
        "fg3",
        "fg3a",
        "fg3_pct",
        "ft",
        "fta",
        "ft_pct",
        "orb",
        "drb",
        "trb",
        "ast",
        "stl",
        "blk",
        "tov",
        "pf",
        "pts",
        "plus_minus",
        "reason",
    ],
    zero_fields: MINUTES_FIELDS,
};

pub static ADVANCED_BOX_SCORE: Schema = Schema {
    kind: TableKind::AdvancedBoxScore,
    fields: &[
        "game_id",
        "team_id",
        "box_type",
        "date",
        "ishome",
        "pnum",
        "player",
        "player_href",
        "player_csk",
        "player_id",
        "mp",
        "sp",
        "ts_pct",
        "efg_pct",
        "fg3a_per_fga_pct",
        "fta_per_fga_pct",
        "orb_pct",
        "drb_pct",
        "trb_pct",
        "ast_pct",
        "stl_pct",
        "blk_pct",
        "tov_pct",
        "usg_pct",
        "off_rtg",
        "def_rtg",
        "bpm",
        "reason",
    ],
    zero_fields: MINUTES_FIELDS,
};

pub static PLAYER_LIST: Schema = Schema {
    kind: TableKind::PlayerList,
    fields: &[
        "player",
        "player_href",
        "player_id",
        "year_min",
        "year_max",
        "pos",
        "weight",
        "height",
        "height_csk",
        "birth_date",
        "birth_date_csk",
        "colleges",
    ],
    zero_fields: &[],
};

pub static SEASON_STATS: Schema = Schema {
    kind: TableKind::SeasonStats,
    fields: &[
        "player_id",
        "stat_type",
        "isplayoff",
        "season",
        "season_href",
        "age",
        "team_id",
        "team_id_href",
        "lg_id",
        "lg_id_href",
        "pos",
        "g",
        "gs",
        "mp",
        "fg",
        "fga",
        "fg_pct",
        "fg3",
        "fg3a",
        "fg3_pct",
        "fg2",
        "fg2a",
        "fg2_pct",
        "ft",
        "fta",
        "ft_pct",
        "orb",
        "drb",
        "trb",
        "ast",
        "stl",
        "blk",
        "tov",
        "pf",
        "pts",
    ],
    zero_fields: &[],
};

pub static SHOT: Schema = Schema {
    kind: TableKind::Shot,
    fields: &[
        "game_id",
        "team_id",
        "player_id",
        "quarter",
        "make",
        "points",
        "x_px",
        "y_px",
        "distance_cm",
    ],
    zero_fields: &[],
};
