//! Reading monthly ZIP extracts.
//!
//! Each archive holds one CSV member with a header row. The archive file
//! handle lives only for the duration of [`read_archive`].

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::debug;
use zip::ZipArchive;

use crate::error::ArchiveError;
use crate::table::{Table, Value};

/// Opens `path`, decodes member 0 as CSV, and infers a type per column.
pub fn read_archive<P: AsRef<Path>>(path: P) -> Result<Table, ArchiveError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ArchiveError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|source| ArchiveError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    if archive.is_empty() {
        return Err(ArchiveError::Empty {
            path: path.to_path_buf(),
        });
    }
    let member = archive.by_index(0).map_err(|source| ArchiveError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Reading member '{}' of {}", member.name(), path.display());

    let csv_err = |source| ArchiveError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(member);
    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    let records = reader
        .records()
        .collect::<Result<Vec<StringRecord>, _>>()
        .map_err(csv_err)?;

    let table = infer_table(columns, &records);
    debug!(
        "Decoded {} rows x {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Int,
    Float,
    Text,
}

fn column_type(records: &[StringRecord], idx: usize) -> ColumnType {
    let mut kind = ColumnType::Int;
    for field in records.iter().filter_map(|r| r.get(idx)) {
        if field.is_empty() {
            continue;
        }
        if kind == ColumnType::Int && field.parse::<i64>().is_err() {
            kind = ColumnType::Float;
        }
        if kind == ColumnType::Float && field.parse::<f64>().is_err() {
            return ColumnType::Text;
        }
    }
    kind
}

fn infer_table(columns: Vec<String>, records: &[StringRecord]) -> Table {
    let types: Vec<ColumnType> = (0..columns.len())
        .map(|idx| column_type(records, idx))
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            types
                .iter()
                .enumerate()
                .map(|(idx, ty)| match record.get(idx) {
                    None | Some("") => Value::Null,
                    Some(field) => match ty {
                        ColumnType::Int => field.parse().map(Value::Int).unwrap_or(Value::Null),
                        ColumnType::Float => {
                            field.parse().map(Value::Float).unwrap_or(Value::Null)
                        }
                        ColumnType::Text => Value::Text(field.to_string()),
                    },
                })
                .collect()
        })
        .collect();
    Table::from_rows(columns, rows)
}
