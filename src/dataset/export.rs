//! Write normalized rows back out as a two-column CSV.

use std::fs;
use std::path::Path;

use csv::Writer;

use crate::dataset::TrainingRow;
use crate::error::Result;

/// Write `text,label` rows to `path`, creating parent directories.
///
/// The file is readable by the `text_label` preset, so a prepared dataset
/// trains without further column hints.
pub fn write_training_csv<P: AsRef<Path>>(rows: &[TrainingRow], path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{SchemaNormalizer, Table};
    use tempfile::TempDir;

    #[test]
    fn test_prepared_csv_round_trips_through_preset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("dataset.csv");
        let rows = vec![
            TrainingRow::new("Python, SQL", "Data Scientist").unwrap(),
            TrainingRow::new("patient care", "Nurse").unwrap(),
        ];

        write_training_csv(&rows, &path).unwrap();

        let table = Table::from_csv_path(&path).unwrap();
        assert_eq!(table.columns(), &["text", "label"]);
        let normalizer = SchemaNormalizer::new();
        let selection = normalizer.select_columns(&table, None, None).unwrap();
        assert_eq!(selection.preset.as_deref(), Some("text_label"));
        assert_eq!(normalizer.build_rows(&table, &selection), rows);
    }
}
