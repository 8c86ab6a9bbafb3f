//! Locating the monthly archives of each data kind.

use std::collections::HashMap;
use std::path::PathBuf;

use glob::glob;
use log::{info, warn};

use crate::config::RampConfig;
use crate::error::{RampError, Result};
use crate::schema::DataKind;

pub trait ArchiveLocator {
    /// Archive paths for `kind`, in processing order.
    fn locate(&self, kind: DataKind) -> Result<Vec<PathBuf>>;
}

/// Expands the configured glob pattern of each kind.
#[derive(Debug, Clone)]
pub struct GlobLocator {
    config: RampConfig,
}

impl GlobLocator {
    pub fn new(config: RampConfig) -> Self {
        Self { config }
    }
}

impl ArchiveLocator for GlobLocator {
    fn locate(&self, kind: DataKind) -> Result<Vec<PathBuf>> {
        let pattern = self.config.pattern_for(kind);
        info!("Searching for {} archives matching pattern: {}", kind, pattern);

        let paths: Vec<PathBuf> = glob(&pattern)
            .map_err(|source| RampError::Pattern {
                pattern: pattern.clone(),
                source,
            })?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Skipping unreadable path while globbing {}: {}", pattern, e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();

        if paths.is_empty() {
            warn!("No {} archives found matching the pattern: {}", kind, pattern);
        } else {
            info!("Found {} {} archives.", paths.len(), kind);
        }
        Ok(paths)
    }
}

/// Explicit per-kind archive lists.
#[derive(Debug, Clone, Default)]
pub struct FixedLocator {
    archives: HashMap<DataKind, Vec<PathBuf>>,
}

impl FixedLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: DataKind, archives: Vec<PathBuf>) -> Self {
        self.archives.insert(kind, archives);
        self
    }
}

impl ArchiveLocator for FixedLocator {
    fn locate(&self, kind: DataKind) -> Result<Vec<PathBuf>> {
        Ok(self.archives.get(&kind).cloned().unwrap_or_default())
    }
}
