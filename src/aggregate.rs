//! Row collection across many monthly archives.
//!
//! Archives are read strictly one after another; each decoded table is
//! reduced (filtered or summarized) before the next archive is opened, so
//! peak memory stays around one archive's decompressed size.

use std::path::Path;

use log::{error, info};

use crate::archive::read_archive;
use crate::error::{RampError, Result};
use crate::filter::filter_repository;
use crate::memory_usage::trace_memory_usage;
use crate::schema::DataKind;
use crate::table::Table;

/// Reads each archive in order and hands its table to `reduce`, collecting
/// the reduced tables. A failing archive, whether it fails to decode or to
/// reduce, aborts the whole run for `kind`.
pub fn map_archives<P, F>(kind: DataKind, archives: &[P], mut reduce: F) -> Result<Vec<Table>>
where
    P: AsRef<Path>,
    F: FnMut(Table, &Path) -> Result<Table>,
{
    let mut parts = Vec::with_capacity(archives.len());
    for (n, archive) in archives.iter().enumerate() {
        let path = archive.as_ref();
        info!(
            "[{}/{}] Reading {} ({:?} era) archive {}",
            n + 1,
            archives.len(),
            kind,
            kind.era(),
            path.display()
        );
        let table = read_archive(path).map_err(|source| {
            error!("Aborting {} aggregation at {}: {}", kind, path.display(), source);
            RampError::Archive { kind, source }
        })?;
        let reduced = reduce(table, path).map_err(|source| {
            error!("Aborting {} aggregation at {}: {}", kind, path.display(), source);
            RampError::Reduce {
                kind,
                path: path.to_path_buf(),
                source: Box::new(source),
            }
        })?;
        parts.push(reduced);
        trace_memory_usage(&format!("after {}", path.display()));
    }
    Ok(parts)
}

/// All rows for `repository_id` across `archives`, with exactly `columns`.
///
/// Archives carrying extra columns are projected down; an archive lacking one
/// of `columns` is a schema mismatch. No archives yields an empty table.
pub fn collect_repository_rows<P: AsRef<Path>>(
    kind: DataKind,
    repository_id: &str,
    columns: &[String],
    archives: &[P],
) -> Result<Table> {
    let parts = map_archives(kind, archives, |table, path| {
        let subset = filter_repository(&table, repository_id)?;
        Ok(subset.project(columns, &format!("{} archive {}", kind, path.display()))?)
    })?;
    let table = Table::concat(columns.to_vec(), parts, &kind.to_string())?;
    info!(
        "Collected {} {} rows for repository {} from {} archives",
        table.len(),
        kind,
        repository_id,
        archives.len()
    );
    Ok(table)
}
