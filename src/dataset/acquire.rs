//! Dataset acquisition through the `kaggle` command-line tool.
//!
//! The fetcher downloads and unzips a dataset archive into a working
//! directory, then copies the first CSV it finds to the requested path.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{CareerLensError, Result};

/// Downloads datasets with an external CLI.
#[derive(Debug, Clone)]
pub struct DatasetFetcher {
    program: String,
}

impl Default for DatasetFetcher {
    fn default() -> Self {
        Self::new("kaggle")
    }
}

impl DatasetFetcher {
    /// Use `program` as the download tool.
    pub fn new<S: Into<String>>(program: S) -> Self {
        DatasetFetcher {
            program: program.into(),
        }
    }

    /// Check that the download tool can be executed.
    pub fn check_available(&self) -> Result<()> {
        let status = Command::new(&self.program)
            .arg("--version")
            .output()
            .map_err(|e| {
                CareerLensError::acquisition(format!(
                    "{} CLI not available ({e}); install it and configure credentials",
                    self.program
                ))
            })?
            .status;
        if !status.success() {
            return Err(CareerLensError::acquisition(format!(
                "{} --version exited with {status}",
                self.program
            )));
        }
        Ok(())
    }

    /// Download `dataset` (optionally a single `file` from it) into
    /// `download_dir`, then copy the first CSV found to `out`.
    pub fn fetch(
        &self,
        dataset: &str,
        file: Option<&str>,
        download_dir: &Path,
        out: &Path,
    ) -> Result<PathBuf> {
        self.check_available()?;
        fs::create_dir_all(download_dir)?;

        let mut command = Command::new(&self.program);
        command
            .args(["datasets", "download", dataset, "-p"])
            .arg(download_dir)
            .arg("--unzip");
        if let Some(file) = file {
            command.args(["-f", file]);
        }

        info!(program = %self.program, dataset, "downloading dataset");
        let output = command.output()?;
        if !output.status.success() {
            return Err(CareerLensError::acquisition(format!(
                "download failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let found = find_first_csv(download_dir)?.ok_or_else(|| {
            CareerLensError::acquisition(format!(
                "no CSV file found in {}",
                download_dir.display()
            ))
        })?;
        info!(csv = %found.display(), "found CSV");

        copy_to(&found, out)?;
        Ok(out.to_path_buf())
    }
}

/// Find a CSV in `dir`: top-level files first, then subdirectories
/// recursively. Entries are visited in name order.
pub fn find_first_csv(dir: &Path) -> Result<Option<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    if let Some(csv) = entries.iter().find(|p| p.is_file() && is_csv(p)) {
        return Ok(Some(csv.clone()));
    }
    for sub in entries.iter().filter(|p| p.is_dir()) {
        if let Some(csv) = find_first_csv(sub)? {
            return Ok(Some(csv));
        }
    }
    debug!(dir = %dir.display(), "no CSV in directory");
    Ok(None)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

fn copy_to(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    if to.exists() && fs::canonicalize(from)? == fs::canonicalize(to)? {
        debug!(path = %to.display(), "CSV already in place");
        return Ok(());
    }
    fs::copy(from, to)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_first_csv_prefers_top_level() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("a_nested")).unwrap();
        fs::write(dir.path().join("a_nested").join("inner.csv"), "x\n").unwrap();
        fs::write(dir.path().join("readme.txt"), "hi").unwrap();
        fs::write(dir.path().join("z_top.CSV"), "x\n").unwrap();

        let found = find_first_csv(dir.path()).unwrap().unwrap();
        assert_eq!(found.file_name().unwrap(), "z_top.CSV");
    }

    #[test]
    fn test_find_first_csv_recurses() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("archive").join("data");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("careers.csv"), "x\n").unwrap();

        let found = find_first_csv(dir.path()).unwrap().unwrap();
        assert!(found.ends_with("archive/data/careers.csv"));
    }

    #[test]
    fn test_find_first_csv_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        assert!(find_first_csv(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_copy_onto_itself_keeps_content() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("dataset.csv");
        fs::write(&target, "text,label\npython,Data Scientist\n").unwrap();
        fs::write(dir.path().join("zz_downloaded.csv"), "x\n").unwrap();

        let found = find_first_csv(&dir.path().join(".")).unwrap().unwrap();
        assert_ne!(found, target);
        copy_to(&found, &target).unwrap();

        let content = fs::read_to_string(&target).unwrap();
        assert_eq!(content, "text,label\npython,Data Scientist\n");
    }

    #[test]
    fn test_copy_to_creates_parent() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("raw.csv");
        fs::write(&from, "a\n").unwrap();
        let to = dir.path().join("out").join("dataset.csv");

        copy_to(&from, &to).unwrap();
        assert_eq!(fs::read_to_string(&to).unwrap(), "a\n");
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let fetcher = DatasetFetcher::new("careerlens-no-such-tool");
        let err = fetcher.check_available().unwrap_err();
        assert!(matches!(err, CareerLensError::Acquisition(_)));
    }
}
