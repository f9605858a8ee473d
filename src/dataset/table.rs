//! In-memory tabular dataset loaded from CSV.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{CareerLensError, Result};

/// Cell values treated as missing, in addition to empty cells.
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#NA", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-missing value parses as a number (or the column is empty).
    Numeric,
    /// At least one value is free text.
    Textual,
}

/// A header row plus records whose cells may be missing.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Build a table from column names and raw cell values.
    ///
    /// Rows shorter than the header are padded with missing cells; extra
    /// cells are dropped.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Table { columns, rows }
    }

    /// Load a CSV file whose first row is the header.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            CareerLensError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {e}", path.display()),
            ))
        })?;
        Self::from_csv_reader(file)
    }

    /// Parse CSV data from any reader.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() {
            return Err(CareerLensError::schema("CSV header is empty"));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(parse_cell).collect());
        }

        Ok(Self::new(columns, rows))
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column with exactly this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of the first column whose name matches ignoring ASCII case and
    /// surrounding whitespace.
    pub fn column_index_ignore_case(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.trim().eq_ignore_ascii_case(name))
    }

    /// Whether a column with exactly this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell value, `None` when missing.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    /// Iterate over records.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Infer whether a column holds numbers or free text.
    pub fn column_kind(&self, column: usize) -> ColumnKind {
        let textual = self
            .rows
            .iter()
            .filter_map(|r| r.get(column).and_then(|c| c.as_deref()))
            .any(|value| value.trim().parse::<f64>().is_err());
        if textual {
            ColumnKind::Textual
        } else {
            ColumnKind::Numeric
        }
    }

    /// Comma-separated column names for error messages.
    pub fn describe_columns(&self) -> String {
        format!("[{}]", self.columns.join(", "))
    }
}

fn parse_cell(raw: &str) -> Option<String> {
    if NULL_MARKERS.contains(&raw.trim()) {
        None
    } else {
        Some(raw.to_string())
    }
}
