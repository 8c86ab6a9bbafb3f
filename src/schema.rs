//! Data kinds and the fixed column lists of each RAMP extract.
//!
//! Extracts harvested before 2018-08-19 ("v1") combine page-click and
//! country/device columns in one file. Later extracts ("v2") split them into
//! two files whose columns are each a strict subset of the v1 columns.

use std::fmt;

pub const DATE: &str = "date";
pub const CLICKS: &str = "clicks";
pub const COUNTRY: &str = "country";
pub const DEVICE: &str = "device";
pub const REPOSITORY_ID: &str = "repository_id";

static ALL_COLUMNS: [&str; 11] = [
    "citableContent",
    "clickThrough",
    CLICKS,
    COUNTRY,
    DATE,
    DEVICE,
    "impressions",
    "index",
    "position",
    "url",
    REPOSITORY_ID,
];

static PAGE_CLICK_COLUMNS: [&str; 9] = [
    "citableContent",
    "clickThrough",
    CLICKS,
    DATE,
    "impressions",
    "index",
    "position",
    "url",
    REPOSITORY_ID,
];

static COUNTRY_DEVICE_COLUMNS: [&str; 9] = [
    "clickThrough",
    CLICKS,
    COUNTRY,
    DATE,
    DEVICE,
    "impressions",
    "index",
    "position",
    REPOSITORY_ID,
];

/// Grouping keys for page-click daily sums.
pub static PAGE_CLICK_KEYS: [&str; 1] = [DATE];

/// Grouping keys for access-info (country/device) daily sums.
pub static COUNTRY_DEVICE_KEYS: [&str; 3] = [DATE, COUNTRY, DEVICE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Era {
    V1,
    V2,
}

/// The three kinds of monthly extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// v1 combined extract (`*all.zip`).
    All,
    /// v2 page-click extract (`*all_page-clicks.zip`).
    PageClick,
    /// v2 country/device extract (`*all_country-device-info.zip`).
    CountryDevice,
}

impl DataKind {
    pub fn era(self) -> Era {
        match self {
            DataKind::All => Era::V1,
            DataKind::PageClick | DataKind::CountryDevice => Era::V2,
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            DataKind::All => &ALL_COLUMNS,
            DataKind::PageClick => &PAGE_CLICK_COLUMNS,
            DataKind::CountryDevice => &COUNTRY_DEVICE_COLUMNS,
        }
    }

    pub fn column_names(self) -> Vec<String> {
        self.columns().iter().map(|c| c.to_string()).collect()
    }

    /// Archive file name suffix used by the extract producer.
    pub fn file_suffix(self) -> &'static str {
        match self {
            DataKind::All => "all.zip",
            DataKind::PageClick => "all_page-clicks.zip",
            DataKind::CountryDevice => "all_country-device-info.zip",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataKind::All => "v1 combined",
            DataKind::PageClick => "v2 page-click",
            DataKind::CountryDevice => "v2 country-device",
        };
        f.write_str(name)
    }
}
