// ABOUTME: Extraction library for basketball-reference pages.
// ABOUTME: Re-exports page parsers, the schema registry, record types and the geometry converter.

//! bbref-extract turns fetched basketball-reference HTML pages into
//! schema-conformant records.
//!
//! Every parser takes a [`Page`] (the URL it was fetched from plus the body)
//! and returns an [`Extraction`]: the records to emit, in row order, and the
//! follow-up links discovered on the page. Parsers never fetch anything
//! themselves; following links is the caller's business.
//!
//! # Example
//!
//! ```
//! use bbref_extract::{parse_box_score, Page};
//!
//! let page = Page::new(
//!     "https://www.basketball-reference.com/boxscores/202301150LAL.html",
//!     "<html><body></body></html>",
//! );
//! let extraction = parse_box_score(&page).unwrap();
//! assert!(extraction.records.is_empty());
//! ```

pub mod cells;
pub mod error;
pub mod geometry;
pub mod html_utils;
pub mod page;
pub mod parsers;
pub mod record;
pub mod schema;
pub mod urls;

pub use cells::{extract_row, CellRules, LinkScope};
pub use error::ExtractError;
pub use geometry::{distance_cm, distance_cm_from_str};
pub use html_utils::unwrap_hidden_tables;
pub use page::{Extraction, Page};
pub use parsers::boxscore::parse_box_score;
pub use parsers::player_list::parse_player_list;
pub use parsers::player_profile::{parse_player_profile, ProfileOptions};
pub use parsers::schedule::{parse_playoff_schedule, parse_schedule};
pub use parsers::shots::parse_shot_chart;
pub use record::{
    EmittedRecord, Entry, Payload, ProfileEntry, ProfileTable, ProfileTables, RecordKind,
    ScheduleEntry, ShotEntry, Value,
};
pub use schema::{Schema, TableKind};
