//! Declarative descriptors for recognized dataset shapes.
//!
//! Presets are checked in order before the generic column detector. New
//! dataset shapes are supported by appending to [`default_presets`].

use crate::dataset::table::Table;

/// How a preset picks its text columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextColumns {
    /// The listed columns that exist in the table, in list order.
    Listed(Vec<String>),
    /// Every column except the listed ones, in table order.
    AllExcept(Vec<String>),
}

/// A recognized dataset shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPreset {
    /// Name reported in logs and command output.
    pub name: String,
    /// Columns that must all be present (exact names) for the preset to apply.
    pub required_columns: Vec<String>,
    /// Text column selection.
    pub text_columns: TextColumns,
    /// Label column name.
    pub label_column: String,
    /// Replace `;` with spaces in text values (multi-valued cells).
    pub split_semicolons: bool,
}

/// Column indices a preset resolves to on a concrete table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetMatch {
    pub text_columns: Vec<usize>,
    pub label_column: usize,
}

impl SchemaPreset {
    pub fn new<S: Into<String>>(
        name: S,
        required_columns: &[&str],
        text_columns: TextColumns,
        label_column: &str,
    ) -> Self {
        SchemaPreset {
            name: name.into(),
            required_columns: required_columns.iter().map(|c| c.to_string()).collect(),
            text_columns,
            label_column: label_column.to_string(),
            split_semicolons: false,
        }
    }

    /// Replace `;` with spaces when building row text.
    pub fn with_split_semicolons(mut self, split: bool) -> Self {
        self.split_semicolons = split;
        self
    }

    /// Resolve against a table. `None` when a required column is missing or
    /// no text column survives selection.
    pub fn resolve(&self, table: &Table) -> Option<PresetMatch> {
        if !self.required_columns.iter().all(|c| table.has_column(c)) {
            return None;
        }
        let label_column = table.column_index(&self.label_column)?;

        let text_columns: Vec<usize> = match &self.text_columns {
            TextColumns::Listed(names) => names
                .iter()
                .filter_map(|name| table.column_index(name))
                .collect(),
            TextColumns::AllExcept(excluded) => table
                .columns()
                .iter()
                .enumerate()
                .filter(|(_, name)| !excluded.contains(*name))
                .map(|(idx, _)| idx)
                .collect(),
        };

        if text_columns.is_empty() {
            return None;
        }

        Some(PresetMatch {
            text_columns,
            label_column,
        })
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// The built-in presets, in precedence order.
pub fn default_presets() -> Vec<SchemaPreset> {
    vec![
        SchemaPreset::new(
            "text_label",
            &["text", "label"],
            TextColumns::Listed(names(&["text"])),
            "label",
        ),
        SchemaPreset::new(
            "job_role_salary_location",
            &["job_role"],
            TextColumns::AllExcept(names(&["job_role", "salary_range", "location"])),
            "job_role",
        )
        .with_split_semicolons(true),
        SchemaPreset::new(
            "education_skills_interests",
            &["Recommended_Career"],
            TextColumns::Listed(names(&["Education", "Skills", "Interests"])),
            "Recommended_Career",
        )
        .with_split_semicolons(true),
    ]
}

/// Label column candidates for the generic detector, highest priority first.
/// Matched ignoring case.
pub const LABEL_CANDIDATES: &[&str] = &[
    "job_role",
    "career_path",
    "career",
    "recommended_career",
    "label",
    "target",
    "domain",
    "role",
    "category",
    "intent",
];
