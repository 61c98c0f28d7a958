// ABOUTME: Record types produced by the page parsers and consumed by the output sink.
// ABOUTME: Value sentinel, schema-bound Entry rows, typed schedule/shot entries, profile tables, EmittedRecord.

use std::borrow::Cow;
use std::path::PathBuf;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::trace;

use crate::schema::{Schema, TableKind};

/// A single field value.
///
/// `Missing` is the absent-value sentinel: distinct from zero and from the
/// empty string. It is written as an empty CSV cell and as JSON `null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Missing,
    Int(i64),
    Bool(bool),
    Text(String),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Returns the text payload, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value as a CSV cell.
    pub fn to_cell(&self) -> Cow<'_, str> {
        match self {
            Value::Missing => Cow::Borrowed(""),
            Value::Int(n) => Cow::Owned(n.to_string()),
            Value::Bool(true) => Cow::Borrowed("true"),
            Value::Bool(false) => Cow::Borrowed("false"),
            Value::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Converts into a JSON value, `Missing` becoming `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Missing => serde_json::Value::Null,
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u8> for Value {
    fn from(n: u8) -> Self {
        Value::Int(n.into())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Missing)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Missing => serializer.serialize_none(),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// A schema-bound tabular row.
///
/// Holds exactly one value per schema field, in schema order. Writes to
/// fields outside the schema are rejected, so an entry can never carry keys
/// its CSV header does not know about.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    kind: TableKind,
    values: Vec<Value>,
}

impl Entry {
    /// Creates an entry pre-populated with the schema defaults.
    pub fn new(kind: TableKind) -> Self {
        Self {
            kind,
            values: kind.schema().defaults(),
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn schema(&self) -> &'static Schema {
        self.kind.schema()
    }

    /// Sets a field. Returns false (and leaves the entry untouched) when the
    /// field is not part of the schema.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> bool {
        match self.schema().position(field) {
            Some(idx) => {
                self.values[idx] = value.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.schema().position(field).map(|idx| &self.values[idx])
    }

    /// `(field, value)` pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.schema().fields.iter().copied().zip(self.values.iter())
    }

    /// Writes extractor output into the entry, dropping fields the schema
    /// does not declare. Returns the number of dropped fields.
    pub fn apply<I>(&mut self, fields: I) -> usize
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut dropped = 0;
        for (name, value) in fields {
            if !self.set(&name, value) {
                trace!(field = %name, kind = %self.kind, "dropping field outside schema");
                dropped += 1;
            }
        }
        dropped
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.fields() {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// One game row of a schedule table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub game_id: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub visitor_team: Option<String>,
    pub visitor_team_id: Option<String>,
    pub visitor_pts: Option<String>,
    pub home_team: Option<String>,
    pub home_team_id: Option<String>,
    pub home_pts: Option<String>,
    pub overtimes: Option<String>,
    pub attendance: Option<String>,
    pub game_remarks: Option<String>,
}

impl From<ScheduleEntry> for Entry {
    fn from(e: ScheduleEntry) -> Self {
        let mut entry = Entry::new(TableKind::Schedule);
        entry.set("game_id", e.game_id);
        entry.set("date", e.date);
        entry.set("start_time", e.start_time);
        entry.set("visitor_team", e.visitor_team);
        entry.set("visitor_team_id", e.visitor_team_id);
        entry.set("visitor_pts", e.visitor_pts);
        entry.set("home_team", e.home_team);
        entry.set("home_team_id", e.home_team_id);
        entry.set("home_pts", e.home_pts);
        entry.set("overtimes", e.overtimes);
        entry.set("attendance", e.attendance);
        entry.set("game_remarks", e.game_remarks);
        entry
    }
}

/// One shot marker from a shot chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShotEntry {
    pub game_id: String,
    pub team_id: String,
    pub player_id: Option<String>,
    pub quarter: Option<String>,
    /// Game clock from the tooltip. Not part of the shot schema.
    pub clock: Option<String>,
    /// None only when the marker has no class attribute at all.
    pub make: Option<bool>,
    /// 2 or 3; None when the tooltip names neither.
    pub points: Option<u8>,
    pub x_px: Option<String>,
    pub y_px: Option<String>,
    pub distance_cm: Option<i64>,
}

impl From<ShotEntry> for Entry {
    fn from(s: ShotEntry) -> Self {
        let mut entry = Entry::new(TableKind::Shot);
        entry.set("game_id", s.game_id);
        entry.set("team_id", s.team_id);
        entry.set("player_id", s.player_id);
        entry.set("quarter", s.quarter);
        entry.set("make", s.make);
        entry.set("points", s.points);
        entry.set("x_px", s.x_px);
        entry.set("y_px", s.y_px);
        entry.set("distance_cm", s.distance_cm);
        entry
    }
}

/// A player profile row: open field set, insertion ordered.
pub type ProfileEntry = serde_json::Map<String, serde_json::Value>;

/// All rows of one statistics table on a player profile page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileTable {
    pub id: String,
    pub entries: Vec<ProfileEntry>,
}

/// Profile tables keyed by table id, in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileTables(Vec<ProfileTable>);

impl ProfileTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a table. A later table with the same id replaces the earlier one.
    pub fn insert(&mut self, table: ProfileTable) {
        match self.0.iter_mut().find(|t| t.id == table.id) {
            Some(existing) => *existing = table,
            None => self.0.push(table),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProfileTable> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ProfileTables {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for table in &self.0 {
            map.serialize_entry(&table.id, &table.entries)?;
        }
        map.end()
    }
}

/// Record kind of an emitted batch; decides the writer and file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Schedule,
    BoxScore,
    PlayerList,
    PlayerStats,
    Shot,
    Player,
}

impl RecordKind {
    /// True for kinds written as delimited text with a header row.
    pub fn is_tabular(self) -> bool {
        !matches!(self, RecordKind::Player)
    }

    pub fn extension(self) -> &'static str {
        if self.is_tabular() {
            "csv"
        } else {
            "json"
        }
    }
}

/// Batch payload: schema-bound rows or grouped profile tables.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Rows(Vec<Entry>),
    Tables(ProfileTables),
}

impl Payload {
    pub fn len(&self) -> usize {
        match self {
            Payload::Rows(rows) => rows.len(),
            Payload::Tables(tables) => tables.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows across the batch: table rows, or the rows of every profile table.
    pub fn row_count(&self) -> usize {
        match self {
            Payload::Rows(rows) => rows.len(),
            Payload::Tables(tables) => tables.iter().map(|t| t.entries.len()).sum(),
        }
    }
}

/// The unit handed to the output sink: one file's worth of records.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedRecord {
    /// Logical directory below the output root, e.g. `games/boxscores/basic/2023`.
    pub dir: String,
    /// File name without extension.
    pub file_name: String,
    pub kind: RecordKind,
    pub payload: Payload,
    /// Header schema; present for tabular kinds only.
    pub schema: Option<&'static Schema>,
}

impl EmittedRecord {
    /// Builds a tabular batch whose header is the schema of `table`.
    pub fn rows(
        kind: RecordKind,
        table: TableKind,
        dir: impl Into<String>,
        file_name: impl Into<String>,
        rows: Vec<Entry>,
    ) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
            kind,
            payload: Payload::Rows(rows),
            schema: Some(table.schema()),
        }
    }

    /// Builds a nested player-profile document.
    pub fn tables(
        dir: impl Into<String>,
        file_name: impl Into<String>,
        tables: ProfileTables,
    ) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
            kind: RecordKind::Player,
            payload: Payload::Tables(tables),
            schema: None,
        }
    }

    /// Path relative to the output root, extension included.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.dir).join(format!("{}.{}", self.file_name, self.kind.extension()))
    }

    /// Returns the rows when this is a tabular batch.
    pub fn entries(&self) -> Option<&[Entry]> {
        match &self.payload {
            Payload::Rows(rows) => Some(rows),
            Payload::Tables(_) => None,
        }
    }
}
