//! Staged writes for the files produced by one `convert` run.
//!
//! Every output is first written in full to a hidden sibling file. Nothing
//! replaces a real output until [`StagedOutputs::commit`], so a failure while
//! rendering or writing one output leaves the previous set untouched.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::CliError;

/// Suffix of the hidden staging file written next to each output.
const STAGING_SUFFIX: &str = "diasql-staged";

#[derive(Debug)]
struct Staged {
    staging: PathBuf,
    target: PathBuf,
}

/// Outputs written to staging files and waiting to be renamed into place.
#[derive(Debug, Default)]
pub struct StagedOutputs {
    staged: Vec<Staged>,
}

impl StagedOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `data` to the staging file of `target`.
    pub fn stage(&mut self, target: &Path, data: &[u8]) -> Result<(), CliError> {
        let staging = staging_path(target)?;
        if let Some(parent) = target.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Registered before writing so a partial staging file is still removed.
        self.staged.push(Staged {
            staging: staging.clone(),
            target: target.to_path_buf(),
        });
        let mut file = File::create(&staging)?;
        file.write_all(data)?;
        file.sync_all()?;
        Ok(())
    }

    pub fn stage_json<T: Serialize>(&mut self, target: &Path, value: &T) -> Result<(), CliError> {
        let data = serde_json::to_vec_pretty(value)?;
        self.stage(target, &data)
    }

    /// Rename every staged file onto its target, in staging order.
    pub fn commit(mut self) -> Result<Vec<PathBuf>, CliError> {
        let mut pending = std::mem::take(&mut self.staged).into_iter();
        let mut written = Vec::with_capacity(pending.len());
        let mut parents = BTreeSet::new();

        while let Some(entry) = pending.next() {
            if let Err(err) = fs::rename(&entry.staging, &entry.target) {
                // Drop cleans up the staging files that were not renamed.
                self.staged = std::iter::once(entry).chain(pending).collect();
                return Err(err.into());
            }
            if let Some(parent) = entry.target.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                parents.insert(parent.to_path_buf());
            }
            written.push(entry.target);
        }

        for parent in parents {
            sync_dir(&parent)?;
        }
        Ok(written)
    }
}

impl Drop for StagedOutputs {
    fn drop(&mut self) {
        for entry in &self.staged {
            if let Err(err) = fs::remove_file(&entry.staging) {
                tracing::debug!(path = %entry.staging.display(), error = %err, "staging file not removed");
            }
        }
    }
}

/// `dir/.name.diasql-staged` for `dir/name`.
fn staging_path(target: &Path) -> Result<PathBuf, CliError> {
    let file_name = target
        .file_name()
        .ok_or_else(|| CliError::OutputPath(target.to_path_buf()))?;
    Ok(target.with_file_name(format!(
        ".{}.{STAGING_SUFFIX}",
        file_name.to_string_lossy()
    )))
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> std::io::Result<()> {
    File::open(path)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
