//! Tabular codec for comma-delimited files
//!
//! Parses a file into an ordered sequence of [`Row`]s and serializes the
//! same shapes back out. Header mode zips the first physical line with each
//! subsequent record; headerless mode yields plain positional records. One
//! file never mixes the two shapes.

use csvdrop_common::{CsvDropError, Result};
use std::path::Path;

/// A single decoded record
///
/// Rows are a tagged variant rather than a duck-typed shape: either ordered
/// column/value pairs (header mode) or a plain ordered sequence of values
/// (headerless mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Ordered column -> value pairs (header mode)
    Keyed(Vec<(String, String)>),
    /// Plain ordered values (headerless mode)
    Positional(Vec<String>),
}

impl Row {
    /// Number of values in the row
    pub fn len(&self) -> usize {
        match self {
            Row::Keyed(pairs) => pairs.len(),
            Row::Positional(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads and writes comma-delimited files
///
/// Stateless apart from the header-mode flag; safe to share across files.
#[derive(Debug, Clone)]
pub struct CsvCodec {
    has_header: bool,
}

impl Default for CsvCodec {
    fn default() -> Self {
        Self { has_header: true }
    }
}

impl CsvCodec {
    pub fn new(has_header: bool) -> Self {
        Self { has_header }
    }

    /// Read all rows from `path`
    ///
    /// Fails with [`CsvDropError::NotFound`] when the path no longer exists
    /// at read time and [`CsvDropError::Decode`] for any lower-level parse
    /// or IO fault.
    ///
    /// In header mode the first line is consumed as column names and zipped
    /// positionally with each subsequent record. Records shorter than the
    /// header yield only the pairs that exist; surplus trailing fields are
    /// dropped. Neither case is an error.
    pub fn read(&self, path: &Path) -> Result<Vec<Row>> {
        if !path.exists() {
            return Err(CsvDropError::NotFound(path.to_path_buf()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| CsvDropError::Decode(e.to_string()))?;

        let mut records = reader.records();
        let mut rows = Vec::new();

        if self.has_header {
            let header: Vec<String> = match records.next() {
                Some(record) => {
                    let record = record.map_err(|e| CsvDropError::Decode(e.to_string()))?;
                    record.iter().map(str::to_string).collect()
                },
                // Zero-byte file: no header, no rows
                None => return Ok(rows),
            };

            for record in records {
                let record = record.map_err(|e| CsvDropError::Decode(e.to_string()))?;
                let pairs = header
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect();
                rows.push(Row::Keyed(pairs));
            }
        } else {
            for record in records {
                let record = record.map_err(|e| CsvDropError::Decode(e.to_string()))?;
                rows.push(Row::Positional(record.iter().map(str::to_string).collect()));
            }
        }

        Ok(rows)
    }

    /// Write `rows` to exactly the requested `path`
    ///
    /// No-op (the file is not created) when `rows` is empty. Keyed rows
    /// infer the column order from the first row's keys and write a header
    /// line; values missing from later rows serialize as empty. Callers that
    /// need crash safety across the write are responsible for writing to a
    /// temporary path and renaming.
    pub fn write(&self, path: &Path, rows: &[Row]) -> Result<()> {
        let Some(first) = rows.first() else {
            return Ok(());
        };

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(write_error)?;

        match first {
            Row::Keyed(pairs) => {
                let columns: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
                writer.write_record(&columns).map_err(write_error)?;

                for row in rows {
                    let Row::Keyed(pairs) = row else {
                        return Err(CsvDropError::Decode(
                            "mixed row shapes in one file".to_string(),
                        ));
                    };
                    let record: Vec<&str> = columns
                        .iter()
                        .map(|c| {
                            pairs
                                .iter()
                                .find(|(k, _)| k == c)
                                .map(|(_, v)| v.as_str())
                                .unwrap_or("")
                        })
                        .collect();
                    writer.write_record(&record).map_err(write_error)?;
                }
            },
            Row::Positional(_) => {
                for row in rows {
                    let Row::Positional(values) = row else {
                        return Err(CsvDropError::Decode(
                            "mixed row shapes in one file".to_string(),
                        ));
                    };
                    writer.write_record(values).map_err(write_error)?;
                }
            },
        }

        writer.flush()?;
        Ok(())
    }
}

/// Write-side faults are IO problems (unwritable destination, full disk),
/// not malformed tabular content; unwrap them to the Io variant.
fn write_error(e: csv::Error) -> CsvDropError {
    let message = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(io) => CsvDropError::Io(io),
        _ => CsvDropError::Decode(message),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn keyed(pairs: &[(&str, &str)]) -> Row {
        Row::Keyed(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_read_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "name,city\nalice,berlin\nbob,paris\n").unwrap();

        let rows = CsvCodec::new(true).read(&path).unwrap();
        assert_eq!(
            rows,
            vec![
                keyed(&[("name", "alice"), ("city", "berlin")]),
                keyed(&[("name", "bob"), ("city", "paris")]),
            ]
        );
    }

    #[test]
    fn test_read_headerless() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a,b\nc,d\n").unwrap();

        let rows = CsvCodec::new(false).read(&path).unwrap();
        assert_eq!(
            rows,
            vec![
                Row::Positional(vec!["a".to_string(), "b".to_string()]),
                Row::Positional(vec!["c".to_string(), "d".to_string()]),
            ]
        );
    }

    #[test]
    fn test_read_short_rows_do_not_crash() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("short.csv");
        fs::write(&path, "a,b,c\n1,2\n").unwrap();

        let rows = CsvCodec::new(true).read(&path).unwrap();
        assert_eq!(rows, vec![keyed(&[("a", "1"), ("b", "2")])]);
    }

    #[test]
    fn test_read_long_rows_drop_surplus() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("long.csv");
        fs::write(&path, "a,b\n1,2,3\n").unwrap();

        let rows = CsvCodec::new(true).read(&path).unwrap();
        assert_eq!(rows, vec![keyed(&[("a", "1"), ("b", "2")])]);
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = CsvCodec::default()
            .read(&dir.path().join("gone.csv"))
            .unwrap_err();
        assert!(matches!(err, CsvDropError::NotFound(_)));
    }

    #[test]
    fn test_read_empty_file_yields_no_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();

        assert!(CsvCodec::new(true).read(&path).unwrap().is_empty());
        assert!(CsvCodec::new(false).read(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_header_only_file_yields_no_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("header.csv");
        fs::write(&path, "a,b,c\n").unwrap();

        assert!(CsvCodec::new(true).read(&path).unwrap().is_empty());
    }

    #[test]
    fn test_write_empty_rows_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        CsvCodec::default().write(&path, &[]).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_write_keyed_infers_columns_from_first_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        CsvCodec::default()
            .write(&path, &[keyed(&[("x", "1"), ("y", "2")])])
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "x,y\n1,2\n");
    }

    #[test]
    fn test_round_trip_quoted_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quoted.csv");
        let rows = vec![keyed(&[("text", "hello, world"), ("quote", "say \"hi\"")])];

        let codec = CsvCodec::default();
        codec.write(&path, &rows).unwrap();
        assert_eq!(codec.read(&path).unwrap(), rows);
    }

    #[test]
    fn test_round_trip_law() {
        let dir = TempDir::new().unwrap();
        let codec = CsvCodec::default();
        let rows = vec![
            keyed(&[("a", "1"), ("b", "2")]),
            keyed(&[("a", "3"), ("b", "4")]),
        ];

        let first = dir.path().join("first.csv");
        codec.write(&first, &rows).unwrap();
        let second = dir.path().join("second.csv");
        codec.write(&second, &codec.read(&first).unwrap()).unwrap();

        assert_eq!(
            fs::read_to_string(&first).unwrap(),
            fs::read_to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_write_unwritable_destination_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("out.csv");

        let err = CsvCodec::default()
            .write(&path, &[keyed(&[("a", "1")])])
            .unwrap_err();
        assert!(matches!(err, CsvDropError::Io(_)), "got {:?}", err);
    }

    #[test]
    fn test_write_mixed_shapes_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mixed.csv");
        let rows = vec![keyed(&[("a", "1")]), Row::Positional(vec!["x".to_string()])];

        let err = CsvCodec::default().write(&path, &rows).unwrap_err();
        assert!(matches!(err, CsvDropError::Decode(_)));
    }
}
