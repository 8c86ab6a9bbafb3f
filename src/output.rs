//! CSV output and the repository list input.

use std::path::Path;

use csv::{ReaderBuilder, Writer as CsvWriter};
use log::{debug, info};
use serde::Deserialize;

use crate::error::{RampError, Result};
use crate::table::Table;

/// Writes `table` with a header row, replacing any existing file.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let output_err = |source| RampError::Output {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = CsvWriter::from_path(path).map_err(output_err)?;
    writer.write_record(table.columns()).map_err(output_err)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(output_err)?;
    }
    writer.flush()?;
    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

#[derive(Deserialize, Debug)]
struct RepositoryInfo {
    repository_id: String,
}

/// Repository identifiers from the `repository_id` column, sorted and
/// de-duplicated.
pub fn read_repository_ids(path: &Path) -> Result<Vec<String>> {
    let info_err = |source| RampError::RepositoryInfo {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new().from_path(path).map_err(info_err)?;
    let mut ids = Vec::new();
    for record in reader.deserialize::<RepositoryInfo>() {
        ids.push(record.map_err(info_err)?.repository_id);
    }
    ids.sort();
    ids.dedup();
    debug!("Read {} repository ids from {}", ids.len(), path.display());
    Ok(ids)
}
