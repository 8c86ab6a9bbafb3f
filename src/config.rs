use std::path::{Path, PathBuf};

use crate::schema::DataKind;

pub const GLOBAL_PC_FILE: &str = "RAMP_complete_daily_pc_clicks.csv";
pub const GLOBAL_AI_FILE: &str = "RAMP_complete_daily_ai_clicks.csv";
pub const REPOSITORY_INFO_FILE: &str = "RAMP_repository_info.csv";

/// Where extracts are found and where summaries are written.
///
/// Patterns are glob expressions relative to `data_root`.
#[derive(Debug, Clone)]
pub struct RampConfig {
    pub data_root: PathBuf,
    pub v1_pattern: String,
    pub page_click_pattern: String,
    pub country_device_pattern: String,
    pub output_dir: PathBuf,
    /// Per-repository output directory, relative to `output_dir`.
    pub daily_dir: PathBuf,
    pub repository_info: PathBuf,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("./ramp_zipped"),
            v1_pattern: format!("*/*{}", DataKind::All.file_suffix()),
            page_click_pattern: format!("*/*{}", DataKind::PageClick.file_suffix()),
            country_device_pattern: format!("*/*{}", DataKind::CountryDevice.file_suffix()),
            output_dir: PathBuf::from("."),
            daily_dir: PathBuf::from("daily_clicks"),
            repository_info: PathBuf::from(REPOSITORY_INFO_FILE),
        }
    }
}

impl RampConfig {
    /// Full glob pattern for one data kind.
    pub fn pattern_for(&self, kind: DataKind) -> String {
        let relative = match kind {
            DataKind::All => &self.v1_pattern,
            DataKind::PageClick => &self.page_click_pattern,
            DataKind::CountryDevice => &self.country_device_pattern,
        };
        self.data_root.join(relative).to_string_lossy().into_owned()
    }

    pub fn global_output(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    pub fn daily_output_dir(&self) -> PathBuf {
        self.output_dir.join(&self.daily_dir)
    }

    /// `<dir>/<repo>_RAMP_<tag>.csv` under the per-repository directory.
    pub fn repository_output(&self, repository_id: &str, tag: &str) -> PathBuf {
        repository_file(&self.daily_output_dir(), repository_id, tag)
    }
}

pub fn repository_file(dir: &Path, repository_id: &str, tag: &str) -> PathBuf {
    dir.join(format!("{}_RAMP_{}.csv", repository_id, tag))
}
