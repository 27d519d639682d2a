//! Output directory housekeeping for command-line runs.

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

const OUTPUT_DIR_TIMESTAMP: &str = "%Y%m%d%H%M%S";

/// Default output directory: the project path suffixed with the run timestamp.
pub fn default_output_dir<P: AsRef<Path>>(project_dir: P, generation_time: NaiveDateTime) -> PathBuf {
    let mut name = project_dir.as_ref().components().as_path().as_os_str().to_os_string();
    name.push(format!("-{}", generation_time.format(OUTPUT_DIR_TIMESTAMP)));
    PathBuf::from(name)
}

/// Ensures the output directory is safe to write to.
///
/// An existing directory is an error unless `force` is set, in which case it
/// is moved to `<dir>.old`, replacing any previous `.old` directory.
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and force is false
pub fn prepare_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if !output_dir.exists() {
        return Ok(output_dir.to_path_buf());
    }
    if !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }

    let mut old_name = output_dir.as_os_str().to_os_string();
    old_name.push(".old");
    let old_dir = PathBuf::from(old_name);
    if old_dir.exists() {
        fs::remove_dir_all(&old_dir)
            .map_err(|source| Error::WriteError { path: old_dir.clone(), source })?;
    }
    fs::rename(output_dir, &old_dir)
        .map_err(|source| Error::WriteError { path: output_dir.to_path_buf(), source })?;
    info!("Moved existing output directory to {}", old_dir.display());
    Ok(output_dir.to_path_buf())
}
