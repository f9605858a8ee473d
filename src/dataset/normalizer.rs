//! Schema normalizer: arbitrary tables to `(text, label)` rows.

use tracing::{debug, info};

use crate::dataset::TrainingRow;
use crate::dataset::preset::{LABEL_CANDIDATES, SchemaPreset, default_presets};
use crate::dataset::table::{ColumnKind, Table};
use crate::error::{CareerLensError, Result};

/// The columns chosen for a table and how they were chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    /// Name of the matched preset, `None` for explicit or generic detection.
    pub preset: Option<String>,
    /// Text column names, in concatenation order.
    pub text_columns: Vec<String>,
    /// Label column name.
    pub label_column: String,
    text_indices: Vec<usize>,
    label_index: usize,
    split_semicolons: bool,
}

/// Maps tables onto [`TrainingRow`]s using presets, then a generic detector.
#[derive(Debug, Clone)]
pub struct SchemaNormalizer {
    presets: Vec<SchemaPreset>,
}

impl Default for SchemaNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaNormalizer {
    /// Create a normalizer with the built-in presets.
    pub fn new() -> Self {
        Self::with_presets(default_presets())
    }

    /// Create a normalizer with a custom preset list (checked in order).
    pub fn with_presets(presets: Vec<SchemaPreset>) -> Self {
        SchemaNormalizer { presets }
    }

    pub fn presets(&self) -> &[SchemaPreset] {
        &self.presets
    }

    /// Normalize a table into training rows.
    ///
    /// Explicit `text_columns` / `label_column` take precedence over presets
    /// and detection. Fails with a schema error naming the table's columns
    /// when no usable text or label column can be determined.
    pub fn normalize(
        &self,
        table: &Table,
        text_columns: Option<&[String]>,
        label_column: Option<&str>,
    ) -> Result<Vec<TrainingRow>> {
        let selection = self.select_columns(table, text_columns, label_column)?;
        Ok(self.build_rows(table, &selection))
    }

    /// Decide which columns feed the text and the label.
    pub fn select_columns(
        &self,
        table: &Table,
        text_columns: Option<&[String]>,
        label_column: Option<&str>,
    ) -> Result<ColumnSelection> {
        if text_columns.is_none() && label_column.is_none() {
            for preset in &self.presets {
                if let Some(m) = preset.resolve(table) {
                    debug!(preset = %preset.name, "dataset matches preset");
                    return Ok(self.selection(
                        table,
                        Some(preset.name.clone()),
                        m.text_columns,
                        m.label_column,
                        preset.split_semicolons,
                    ));
                }
            }
        }

        let label_index = match label_column {
            Some(name) => table.column_index(name).ok_or_else(|| {
                CareerLensError::schema(format!(
                    "label column '{name}' not found. Columns: {}",
                    table.describe_columns()
                ))
            })?,
            None => detect_label_column(table).ok_or_else(|| {
                CareerLensError::schema(format!(
                    "could not detect a label column; pass one explicitly. Columns: {}",
                    table.describe_columns()
                ))
            })?,
        };

        let text_indices = match text_columns {
            Some(names) => names
                .iter()
                .map(|name| {
                    table.column_index(name).ok_or_else(|| {
                        CareerLensError::schema(format!(
                            "text column '{name}' not found. Columns: {}",
                            table.describe_columns()
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => detect_text_columns(table, label_index),
        };

        if text_indices.is_empty() {
            return Err(CareerLensError::schema(format!(
                "could not detect text columns; pass them explicitly. Columns: {}",
                table.describe_columns()
            )));
        }

        Ok(self.selection(table, None, text_indices, label_index, false))
    }

    /// Build one row per record. Records with a missing or blank label are
    /// dropped; blank text becomes the `unknown` sentinel.
    pub fn build_rows(&self, table: &Table, selection: &ColumnSelection) -> Vec<TrainingRow> {
        let rows: Vec<TrainingRow> = table
            .rows()
            .filter_map(|record| {
                let label = record.get(selection.label_index)?.as_deref()?;
                let text = selection
                    .text_indices
                    .iter()
                    .filter_map(|&idx| record.get(idx).and_then(|c| c.as_deref()))
                    .map(|value| {
                        if selection.split_semicolons {
                            value.replace(';', " ")
                        } else {
                            value.to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                TrainingRow::new(&text, label)
            })
            .collect();

        info!(
            rows = rows.len(),
            dropped = table.len() - rows.len(),
            label = %selection.label_column,
            text = ?selection.text_columns,
            "normalized dataset"
        );
        rows
    }

    fn selection(
        &self,
        table: &Table,
        preset: Option<String>,
        text_indices: Vec<usize>,
        label_index: usize,
        split_semicolons: bool,
    ) -> ColumnSelection {
        let columns = table.columns();
        ColumnSelection {
            preset,
            text_columns: text_indices.iter().map(|&i| columns[i].clone()).collect(),
            label_column: columns[label_index].clone(),
            text_indices,
            label_index,
            split_semicolons,
        }
    }
}

/// First candidate name present wins; otherwise the last column when the
/// table has at least two.
fn detect_label_column(table: &Table) -> Option<usize> {
    LABEL_CANDIDATES
        .iter()
        .find_map(|candidate| table.column_index_ignore_case(candidate))
        .or_else(|| {
            let width = table.columns().len();
            (width >= 2).then(|| width - 1)
        })
}

/// Textual non-label columns, or every non-label column if none is textual.
fn detect_text_columns(table: &Table, label_index: usize) -> Vec<usize> {
    let others: Vec<usize> = (0..table.columns().len())
        .filter(|&idx| idx != label_index)
        .collect();
    let textual: Vec<usize> = others
        .iter()
        .copied()
        .filter(|&idx| table.column_kind(idx) == ColumnKind::Textual)
        .collect();
    if textual.is_empty() { others } else { textual }
}
