//! CSV export of the table.
use super::write_error;
use crate::{error::Result, Action, QTable, State};
use csv::WriterBuilder;
use std::path::Path;

/// Column names of the export.
pub(super) const HEADER: [&str; 3] = ["state", "action", "q_value"];

pub(super) fn write<S: State, A: Action>(table: &QTable<S, A>, path: &Path) -> Result<()> {
    // The header is written by hand so that an empty table still gets one.
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(write_error(path))?;
    wtr.write_record(&HEADER).map_err(write_error(path))?;
    for ((state, action), q) in table.iter() {
        wtr.serialize((state.flat_string(), action.to_string(), *q))
            .map_err(write_error(path))?;
    }
    wtr.flush().map_err(write_error(path))?;
    Ok(())
}
