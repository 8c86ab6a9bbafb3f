//! Per-repository and global click summaries.
//!
//! Per-repository runs pull the repository's rows out of every v1 and v2
//! archive, reconcile the eras per data kind, and optionally sum clicks by
//! day. Global runs never build full tables: each archive is summed on its
//! own and only the small per-archive sums are kept.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::{info, warn};

use crate::aggregate::{collect_repository_rows, map_archives};
use crate::config::{RampConfig, GLOBAL_AI_FILE, GLOBAL_PC_FILE};
use crate::discovery::ArchiveLocator;
use crate::error::Result;
use crate::memory_usage::log_memory_usage;
use crate::output::{read_repository_ids, write_table};
use crate::reconcile::reconcile_eras;
use crate::schema::{DataKind, CLICKS, COUNTRY_DEVICE_KEYS, PAGE_CLICK_KEYS};
use crate::summarize::{summarize, summarize_for_repository, KeyOrder};
use crate::table::Table;

/// Page-click and access-info (country/device) tables produced together.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickTables {
    pub page_clicks: Table,
    pub access_info: Table,
}

pub struct RampWorkflow<L> {
    locator: L,
}

impl<L: ArchiveLocator> RampWorkflow<L> {
    pub fn new(locator: L) -> Self {
        Self { locator }
    }

    fn collect(&self, kind: DataKind, repository_id: &str) -> Result<Table> {
        let archives = self.locator.locate(kind)?;
        collect_repository_rows(kind, repository_id, &kind.column_names(), &archives)
    }

    /// Full reconciled page-click and country/device tables for one repository.
    pub fn process_repo(&self, repository_id: &str) -> Result<ClickTables> {
        info!("Collecting RAMP data for repository {}", repository_id);
        let v1 = self.collect(DataKind::All, repository_id)?;
        let v2_pc = self.collect(DataKind::PageClick, repository_id)?;
        let v2_ai = self.collect(DataKind::CountryDevice, repository_id)?;

        if v1.is_empty() && v2_pc.is_empty() && v2_ai.is_empty() {
            warn!("Repository {} has no rows in any archive", repository_id);
        }

        let page_clicks = reconcile_eras(v1.clone(), v2_pc)?;
        let access_info = reconcile_eras(v1, v2_ai)?;
        Ok(ClickTables {
            page_clicks,
            access_info,
        })
    }

    /// Daily clicksums for one repository: by date for page clicks, by
    /// date/country/device for access info. Keys come out sorted.
    pub fn process_repo_day_clicks(&self, repository_id: &str) -> Result<ClickTables> {
        let full = self.process_repo(repository_id)?;
        Ok(ClickTables {
            page_clicks: summarize_for_repository(
                &full.page_clicks,
                &PAGE_CLICK_KEYS,
                CLICKS,
                repository_id,
                KeyOrder::Sorted,
            )?,
            access_info: summarize_for_repository(
                &full.access_info,
                &COUNTRY_DEVICE_KEYS,
                CLICKS,
                repository_id,
                KeyOrder::Sorted,
            )?,
        })
    }

    /// Global daily clicksums over every located archive.
    pub fn global_daily_clicks(&self) -> Result<ClickTables> {
        let v1 = self.locator.locate(DataKind::All)?;
        let pc = self.locator.locate(DataKind::PageClick)?;
        let ai = self.locator.locate(DataKind::CountryDevice)?;
        process_global_daily_clicks(&v1, &pc, &ai)
    }
}

/// Page-click clicksums by date for one archive's table.
pub fn daily_pc_clicks(table: &Table) -> Result<Table> {
    summarize(table, &PAGE_CLICK_KEYS, CLICKS, KeyOrder::Sorted)
}

/// Access-info clicksums by date, country and device for one archive's table.
pub fn daily_ai_clicks(table: &Table) -> Result<Table> {
    summarize(table, &COUNTRY_DEVICE_KEYS, CLICKS, KeyOrder::Sorted)
}

/// Repository-agnostic daily clicksums.
///
/// Page-click sums run over the v1 archives followed by the v2 page-click
/// archives; access-info sums over the v1 archives followed by the v2
/// country/device archives. Per-archive sums are concatenated once, then
/// folded so a date present in several archives yields a single row.
pub fn process_global_daily_clicks<P: AsRef<Path>>(
    v1_archives: &[P],
    pc_archives: &[P],
    ai_archives: &[P],
) -> Result<ClickTables> {
    let page_clicks = global_sums(
        v1_archives,
        DataKind::PageClick,
        pc_archives,
        &PAGE_CLICK_KEYS,
        daily_pc_clicks,
    )?;
    log_memory_usage("after global page-click sums");

    let access_info = global_sums(
        v1_archives,
        DataKind::CountryDevice,
        ai_archives,
        &COUNTRY_DEVICE_KEYS,
        daily_ai_clicks,
    )?;
    log_memory_usage("after global access-info sums");

    Ok(ClickTables {
        page_clicks,
        access_info,
    })
}

fn global_sums<P: AsRef<Path>>(
    v1_archives: &[P],
    v2_kind: DataKind,
    v2_archives: &[P],
    keys: &[&str],
    per_archive: fn(&Table) -> Result<Table>,
) -> Result<Table> {
    let mut parts = map_archives(DataKind::All, v1_archives, |table, _| per_archive(&table))?;
    parts.extend(map_archives(v2_kind, v2_archives, |table, _| {
        per_archive(&table)
    })?);

    let mut columns: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    columns.push(CLICKS.to_string());
    let per_archive_sums = Table::concat(columns, parts, &format!("global {}", v2_kind))?;
    let folded = summarize(&per_archive_sums, keys, CLICKS, KeyOrder::FirstSeen)?;
    info!(
        "Global {} sums: {} rows from {} archives",
        v2_kind,
        folded.len(),
        v1_archives.len() + v2_archives.len()
    );
    Ok(folded)
}

/// Writes the two global daily summaries under the output directory.
pub fn run_global<L: ArchiveLocator>(
    workflow: &RampWorkflow<L>,
    config: &RampConfig,
) -> Result<ClickTables> {
    let daily = workflow.global_daily_clicks()?;
    create_dir_all(&config.output_dir)?;
    write_table(&config.global_output(GLOBAL_PC_FILE), &daily.page_clicks)?;
    write_table(&config.global_output(GLOBAL_AI_FILE), &daily.access_info)?;
    Ok(daily)
}

/// Daily summaries for every repository in the repository list, in sorted
/// order. Returns the number of repositories processed.
pub fn run_per_repository<L: ArchiveLocator>(
    workflow: &RampWorkflow<L>,
    config: &RampConfig,
    progress: &ProgressBar,
) -> Result<usize> {
    let ids = read_repository_ids(&config.repository_info)?;
    info!(
        "Processing {} repositories listed in {}",
        ids.len(),
        config.repository_info.display()
    );
    create_dir_all(config.daily_output_dir())?;
    progress.set_length(ids.len() as u64);

    for id in &ids {
        progress.set_message(format!("Repository: {}", id));
        write_repository(workflow, config, id, false)?;
        progress.inc(1);
    }
    log_memory_usage("after all repositories");
    Ok(ids.len())
}

/// Writes one repository's tables; daily summaries unless `full` is set.
/// Returns the paths written.
pub fn write_repository<L: ArchiveLocator>(
    workflow: &RampWorkflow<L>,
    config: &RampConfig,
    repository_id: &str,
    full: bool,
) -> Result<[PathBuf; 2]> {
    let (tables, pc_tag, ai_tag) = if full {
        (workflow.process_repo(repository_id)?, "pc_data", "ai_data")
    } else {
        (
            workflow.process_repo_day_clicks(repository_id)?,
            "pc_daily_clicks",
            "ai_daily_clicks",
        )
    };
    create_dir_all(config.daily_output_dir())?;
    let pc_path = config.repository_output(repository_id, pc_tag);
    let ai_path = config.repository_output(repository_id, ai_tag);
    write_table(&pc_path, &tables.page_clicks)?;
    write_table(&ai_path, &tables.access_info)?;
    Ok([pc_path, ai_path])
}
