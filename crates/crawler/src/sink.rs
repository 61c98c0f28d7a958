// ABOUTME: Output sink writing each emitted batch to one CSV or JSON file below an output root.
// ABOUTME: CSV files get a schema header and \n line endings; JSON keeps key order and non-ASCII text.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bbref_extract::{EmittedRecord, Entry, Payload, ProfileTables, Schema, Value};
use tracing::debug;

use crate::error::SinkError;

/// Receives emitted batches.
pub trait OutputSink: Send + Sync {
    /// Writes one batch and returns the path it was written to.
    fn write(&self, record: &EmittedRecord) -> Result<PathBuf, SinkError>;
}

/// Writes `{root}/{dir}/{file_name}.{csv|json}`, replacing existing files.
#[derive(Debug, Clone)]
pub struct FileSink {
    root: PathBuf,
}

impl FileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, record: &EmittedRecord) -> PathBuf {
        self.root.join(record.relative_path())
    }
}

impl OutputSink for FileSink {
    fn write(&self, record: &EmittedRecord) -> Result<PathBuf, SinkError> {
        let path = self.path_for(record);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| SinkError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        match &record.payload {
            Payload::Rows(rows) => {
                let schema = record
                    .schema
                    .ok_or_else(|| SinkError::MissingSchema(path.clone()))?;
                write_csv(&path, schema, rows)?;
            }
            Payload::Tables(tables) => write_json(&path, tables)?,
        }
        debug!(path = %path.display(), rows = record.payload.row_count(), "wrote batch");
        Ok(path)
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, SinkError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| SinkError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Header = schema fields; each row is projected onto the schema by name, so
/// a field the schema does not declare is never written.
fn write_csv(path: &Path, schema: &Schema, rows: &[Entry]) -> Result<(), SinkError> {
    let csv_err = |source| SinkError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(create(path)?);

    writer.write_record(schema.fields).map_err(csv_err)?;
    for row in rows {
        let cells = schema.fields.iter().map(|field| {
            row.get(field)
                .map(|value| value.to_cell().into_owned())
                .unwrap_or_else(|| Value::Missing.to_cell().into_owned())
        });
        writer.write_record(cells).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json(path: &Path, tables: &ProfileTables) -> Result<(), SinkError> {
    let mut out = create(path)?;
    serde_json::to_writer(&mut out, tables).map_err(|source| SinkError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    out.flush().map_err(|source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbref_extract::{ProfileEntry, ProfileTable, RecordKind, TableKind};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn shot(player: &str, make: bool) -> Entry {
        let mut entry = Entry::new(TableKind::Shot);
        entry.set("game_id", "202301150LAL");
        entry.set("team_id", "LAL");
        entry.set("player_id", player);
        entry.set("make", make);
        entry.set("points", 3u8);
        entry.set("distance_cm", 701i64);
        entry
    }

    #[test]
    fn test_csv_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path());
        let record = EmittedRecord::rows(
            RecordKind::Shot,
            TableKind::Shot,
            "games/shots/2023",
            "01150LAL",
            vec![shot("jamesle01", true), shot("davisan02", false)],
        );

        let path = sink.write(&record).unwrap();
        assert_eq!(path, dir.path().join("games/shots/2023/01150LAL.csv"));
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "game_id,team_id,player_id,quarter,make,points,x_px,y_px,distance_cm\n\
             202301150LAL,LAL,jamesle01,,true,3,,,701\n\
             202301150LAL,LAL,davisan02,,false,3,,,701\n"
        );
    }

    #[test]
    fn test_csv_quotes_markup() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path());
        let mut entry = Entry::new(TableKind::PlayerList);
        entry.set("player", "Alaa Abdelnaby");
        entry.set("colleges", r#"<td data-stat="colleges"><a href="/c">Duke</a>, <a href="/d">X</a></td>"#);
        let record = EmittedRecord::rows(RecordKind::PlayerList, TableKind::PlayerList, "players/list", "a", vec![entry]);

        let path = sink.write(&record).unwrap();
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "Alaa Abdelnaby");
        assert_eq!(&row[11], r#"<td data-stat="colleges"><a href="/c">Duke</a>, <a href="/d">X</a></td>"#);
    }

    #[test]
    fn test_json_keeps_order_and_non_ascii() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path());
        let mut row = ProfileEntry::new();
        row.insert("player_id".into(), "jokicni01".into());
        row.insert("table_id".into(), "per_game".into());
        row.insert("birth_place".into(), "Sombor, Србија".into());
        row.insert("age".into(), serde_json::Value::Null);
        let mut tables = ProfileTables::new();
        tables.insert(ProfileTable { id: "per_game".into(), entries: vec![row] });

        let path = sink
            .write(&EmittedRecord::tables("players/data/j", "jokicni01", tables))
            .unwrap();
        assert_eq!(path, dir.path().join("players/data/j/jokicni01.json"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"per_game":[{"player_id":"jokicni01","table_id":"per_game","birth_place":"Sombor, Србија","age":null}]}"#
        );
    }

    #[test]
    fn test_rewrite_replaces_file() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path());
        let first = EmittedRecord::rows(RecordKind::Shot, TableKind::Shot, "s", "g", vec![shot("a", true), shot("b", true)]);
        let second = EmittedRecord::rows(RecordKind::Shot, TableKind::Shot, "s", "g", vec![shot("c", true)]);
        sink.write(&first).unwrap();
        let path = sink.write(&second).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_unwritable_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let sink = FileSink::new(&blocker);
        let record = EmittedRecord::rows(RecordKind::Shot, TableKind::Shot, "s", "g", vec![shot("a", true)]);
        let err = sink.write(&record).unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }
}
