//! Artifact blob storage.
//!
//! Every fitted component is persisted as an independent `bincode` blob.
//! Writes overwrite the target in place; parent directories are created as
//! needed.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{CareerLensError, Result};

/// Serialize `value` to `path`.
pub fn write_blob<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, value)?;
    writer.flush()?;
    debug!(path = %path.display(), "wrote artifact");
    Ok(())
}

/// Deserialize a value previously written with [`write_blob`].
pub fn read_blob<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CareerLensError::artifact_missing(path.display().to_string()));
    }

    let reader = BufReader::new(File::open(path)?);
    let value = bincode::deserialize_from(reader).map_err(|e| {
        CareerLensError::serialization(format!("{}: {e}", path.display()))
    })?;
    Ok(value)
}
