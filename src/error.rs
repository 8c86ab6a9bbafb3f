use std::path::PathBuf;

use thiserror::Error;

use crate::schema::DataKind;

/// Failure to turn one archive into a table.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to open archive {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt archive {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("archive {} contains no members", path.display())]
    Empty { path: PathBuf },

    #[error("malformed CSV in archive {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ArchiveError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ArchiveError::Open { path, .. }
            | ArchiveError::Corrupt { path, .. }
            | ArchiveError::Empty { path }
            | ArchiveError::Csv { path, .. } => path,
        }
    }
}

/// A table lacks columns another table or the caller requires.
#[derive(Debug, Error)]
#[error("{context}: missing column(s) {}", missing.join(", "))]
pub struct SchemaMismatchError {
    pub context: String,
    pub missing: Vec<String>,
}

#[derive(Debug, Error)]
pub enum RampError {
    #[error("{kind} data: {source}")]
    Archive {
        kind: DataKind,
        #[source]
        source: ArchiveError,
    },

    #[error("{kind} data, archive {}: {source}", path.display())]
    Reduce {
        kind: DataKind,
        path: PathBuf,
        #[source]
        source: Box<RampError>,
    },

    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatchError),

    #[error("column `{0}` not found")]
    MissingColumn(String),

    #[error("column `{column}` holds non-numeric value `{value}`")]
    NonNumericMeasure { column: String, value: String },

    #[error("invalid archive pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read repository list {}: {source}", path.display())]
    RepositoryInfo {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = RampError> = std::result::Result<T, E>;
