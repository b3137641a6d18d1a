//! Tabular model and delimited file I/O.
//!
//! A [`Table`] is an ordered header plus rows of string fields, kept
//! length-synchronized at all times: every row has exactly as many fields as
//! the header has columns. Derived columns are appended through
//! [`Table::push_column`], which validates before mutating anything.
//!
//! # File Format
//!
//! The field delimiter is inferred from the file extension: `.csv` files are
//! comma separated, anything else (`.tsv`, `.raw`, ...) is tab separated.
//! Output paths are restricted to `.raw`, `.tsv` and `.csv`.

use std::io;
use std::path::Path;

/// Error type for table operations.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// A requested new column name already exists in the header.
    #[error("column '{0}' already exists in the header")]
    ColumnCollision(String),
    /// The table lacks a column an operation requires.
    #[error("required column '{0}' is missing from the header")]
    MissingColumn(String),
    /// A row's field count disagrees with the header.
    #[error("row {row} has {fields} fields but the header has {expected} columns")]
    RaggedRow {
        row: usize,
        fields: usize,
        expected: usize,
    },
    /// A derived column does not have exactly one value per row.
    #[error("derived column '{column}' has {values} values for {rows} rows")]
    LengthMismatch {
        column: String,
        values: usize,
        rows: usize,
    },
    /// An output path with an extension the writer does not support.
    #[error("unsupported output extension for '{0}' (expected .raw, .tsv or .csv)")]
    UnsupportedExtension(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),
}

/// Extensions accepted for output files.
const OUTPUT_EXTENSIONS: [&str; 3] = ["raw", "tsv", "csv"];

/// Field delimiter inferred from a file extension.
fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => b',',
        _ => b'\t',
    }
}

/// Check that a path is writable as far as its extension is concerned.
///
/// The CLI calls this before doing any work so a typo'd output path fails
/// fast instead of after a long scan.
pub fn ensure_output_extension<P: AsRef<Path>>(path: P) -> Result<(), TableError> {
    let path = path.as_ref();
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| OUTPUT_EXTENSIONS.contains(&ext));
    if supported {
        Ok(())
    } else {
        Err(TableError::UnsupportedExtension(
            path.display().to_string(),
        ))
    }
}

/// An ordered header plus rows of string fields.
///
/// Invariant: every row has exactly `header.len()` fields at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table from a header and rows.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RaggedRow`] if any row's field count disagrees
    /// with the header.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        for (position, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(TableError::RaggedRow {
                    row: position + 1,
                    fields: row.len(),
                    expected: header.len(),
                });
            }
        }
        Ok(Self { header, rows })
    }

    /// Read a table from a delimited file.
    ///
    /// The first record is the header; the delimiter follows the extension
    /// rule described in the module docs. Records whose field count
    /// disagrees with the header are rejected by the reader.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter_for(path))
            .from_path(path)?;

        let header: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        tracing::debug!(
            path = %path.display(),
            columns = header.len(),
            rows = rows.len(),
            "loaded table"
        );

        Ok(Self { header, rows })
    }

    /// Write the table to a delimited file.
    ///
    /// Fields are quoted only when necessary. The delimiter follows the
    /// extension rule; unsupported extensions are rejected before the file
    /// is created.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        let path = path.as_ref();
        ensure_output_extension(path)?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter_for(path))
            .from_path(path)?;
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        tracing::debug!(path = %path.display(), rows = self.rows.len(), "saved table");
        Ok(())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column in the header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column == name)
    }

    /// Position of a column the caller requires.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingColumn`] if the column is absent.
    pub fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Check that a column name is free for a derived column.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ColumnCollision`] if the name already exists.
    pub fn check_new_column(&self, name: &str) -> Result<(), TableError> {
        if self.column_index(name).is_some() {
            return Err(TableError::ColumnCollision(name.to_string()));
        }
        Ok(())
    }

    /// Append a derived column, one value per row, in row order.
    ///
    /// All validation happens before any mutation; on error the table is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ColumnCollision`] if the name already exists,
    /// or [`TableError::LengthMismatch`] if `values` is not exactly one per
    /// row.
    pub fn push_column(&mut self, name: &str, values: Vec<String>) -> Result<(), TableError> {
        self.check_new_column(name)?;
        if values.len() != self.rows.len() {
            return Err(TableError::LengthMismatch {
                column: name.to_string(),
                values: values.len(),
                rows: self.rows.len(),
            });
        }

        self.header.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn sample_table() -> Table {
        Table::new(
            strings(&["id", "lat", "lon"]),
            vec![
                strings(&["1", "40.0", "-75.0"]),
                strings(&["2", "41.0", "-74.0"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let result = Table::new(
            strings(&["id", "lat"]),
            vec![strings(&["1", "40.0"]), strings(&["2"])],
        );
        assert!(matches!(
            result,
            Err(TableError::RaggedRow {
                row: 2,
                fields: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn test_column_lookup() {
        let table = sample_table();
        assert_eq!(table.column_index("lat"), Some(1));
        assert_eq!(table.column_index("elevation"), None);
        assert!(matches!(
            table.require_column("elevation"),
            Err(TableError::MissingColumn(name)) if name == "elevation"
        ));
    }

    #[test]
    fn test_push_column_appends_in_row_order() {
        let mut table = sample_table();
        table
            .push_column("d", strings(&["0.0000", "1.0000"]))
            .unwrap();

        assert_eq!(table.header(), &strings(&["id", "lat", "lon", "d"]));
        assert_eq!(table.rows()[0], strings(&["1", "40.0", "-75.0", "0.0000"]));
        assert_eq!(table.rows()[1], strings(&["2", "41.0", "-74.0", "1.0000"]));
    }

    #[test]
    fn test_push_column_collision_leaves_table_unmodified() {
        let mut table = sample_table();
        let before = table.clone();

        let result = table.push_column("lat", strings(&["0", "0"]));
        assert!(matches!(result, Err(TableError::ColumnCollision(_))));
        assert_eq!(table, before);
    }

    #[test]
    fn test_push_column_length_mismatch_leaves_table_unmodified() {
        let mut table = sample_table();
        let before = table.clone();

        let result = table.push_column("d", strings(&["0.0000"]));
        assert!(matches!(result, Err(TableError::LengthMismatch { .. })));
        assert_eq!(table, before);
    }

    #[test]
    fn test_output_extension_rules() {
        assert!(ensure_output_extension("out.csv").is_ok());
        assert!(ensure_output_extension("out.tsv").is_ok());
        assert!(ensure_output_extension("out.raw").is_ok());
        assert!(ensure_output_extension("out.txt").is_err());
        assert!(ensure_output_extension("out").is_err());
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("points.csv");
        fs::write(&path, "id,lat,lon\n1,40.0,-75.0\n2,41.0,-74.0\n").unwrap();

        let table = Table::from_path(&path).unwrap();
        assert_eq!(table, sample_table());

        let out = dir.path().join("out.csv");
        table.write_to_path(&out).unwrap();
        assert_eq!(Table::from_path(&out).unwrap(), table);
    }

    #[test]
    fn test_tab_delimited_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("points.tsv");
        fs::write(&path, "id\tlat\tlon\n1\t40.0\t-75.0\n").unwrap();

        let table = Table::from_path(&path).unwrap();
        assert_eq!(table.header(), &strings(&["id", "lat", "lon"]));
        assert_eq!(table.len(), 1);

        // .raw output is tab separated as well
        let out = dir.path().join("out.raw");
        table.write_to_path(&out).unwrap();
        let written = fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("id\tlat\tlon"));
    }

    #[test]
    fn test_from_path_rejects_ragged_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "id,lat,lon\n1,40.0\n").unwrap();

        assert!(matches!(
            Table::from_path(&path),
            Err(TableError::Csv(_))
        ));
    }

    #[test]
    fn test_write_rejects_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let table = sample_table();
        let result = table.write_to_path(dir.path().join("out.parquet"));
        assert!(matches!(result, Err(TableError::UnsupportedExtension(_))));
    }
}
