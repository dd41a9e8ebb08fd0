//! Persistence of the action-value table.
//!
//! A table is saved under a logical name as two artifacts:
//!
//! * `<name>.bin`, a bincode snapshot that reloads the table exactly, and
//! * `<name>.csv`, a human-readable export with the header `state,action,q_value`.
//!
//! Only the snapshot is ever read back.
mod export;
mod snapshot;

use crate::{
    error::{Cause, Result, TabularError},
    Action, QTable, State,
};
use log::{info, warn};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Extension of the snapshot artifact.
pub const SNAPSHOT_EXT: &str = "bin";

/// Extension of the tabular export artifact.
pub const CSV_EXT: &str = "csv";

/// Paths of the artifacts written by [`QLearn::save_table`](crate::QLearn::save_table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifacts {
    /// Path of the snapshot.
    pub snapshot: PathBuf,

    /// Path of the CSV export.
    pub csv: PathBuf,
}

/// Outcome of [`QLearn::load_table`](crate::QLearn::load_table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The snapshot was read and its entries were merged into the table.
    Merged {
        /// Path of the snapshot.
        path: PathBuf,
        /// Number of entries in the snapshot.
        n_entries: usize,
    },

    /// No snapshot exists under the given name. The table is unchanged.
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },
}

impl LoadOutcome {
    /// Returns `true` if entries were merged.
    pub fn is_merged(&self) -> bool {
        matches!(self, LoadOutcome::Merged { .. })
    }
}

/// Appends `.<ext>` to the logical name.
///
/// `Path::with_extension` is not used since it would replace a dotted suffix of the name.
pub(crate) fn artifact_path(name: &Path, ext: &str) -> PathBuf {
    let mut s = OsString::from(name.as_os_str());
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

pub(crate) fn write_error<E: Into<Cause>>(path: &Path) -> impl FnOnce(E) -> TabularError + '_ {
    move |e| TabularError::Write {
        path: path.to_owned(),
        source: e.into(),
    }
}

pub(crate) fn load_error<E: Into<Cause>>(path: &Path) -> impl FnOnce(E) -> TabularError + '_ {
    move |e| TabularError::Load {
        path: path.to_owned(),
        source: e.into(),
    }
}

/// Writes both artifacts of `table` under `name`.
///
/// The export is attempted even if the snapshot fails. If any artifact fails,
/// the first error is returned after both attempts.
pub(crate) fn save<S: State, A: Action>(table: &QTable<S, A>, name: &Path) -> Result<SavedArtifacts> {
    let snapshot_path = artifact_path(name, SNAPSHOT_EXT);
    let csv_path = artifact_path(name, CSV_EXT);

    let snapshot = snapshot::write(table, &snapshot_path);
    match &snapshot {
        Ok(()) => info!("Wrote to file: {}", snapshot_path.display()),
        Err(e) => warn!("{}", e),
    }

    let export = export::write(table, &csv_path);
    match &export {
        Ok(()) => info!("Wrote to file: {}", csv_path.display()),
        Err(e) => warn!("{}", e),
    }

    snapshot.and(export)?;
    Ok(SavedArtifacts {
        snapshot: snapshot_path,
        csv: csv_path,
    })
}

/// Merges the snapshot saved under `name` into `table`.
///
/// `table` is modified only after the snapshot has been decoded completely.
pub(crate) fn load_into<S: State, A: Action>(
    table: &mut QTable<S, A>,
    name: &Path,
) -> Result<LoadOutcome> {
    let path = artifact_path(name, SNAPSHOT_EXT);
    if !path.exists() {
        warn!("File {} not found", path.display());
        return Ok(LoadOutcome::NotFound { path });
    }

    let loaded = snapshot::read(&path).map_err(|e| {
        warn!("{}", e);
        e
    })?;
    let n_entries = table.merge(loaded);
    info!("Loaded file: {} ({} entries)", path.display(), n_entries);

    Ok(LoadOutcome::Merged { path, n_entries })
}
