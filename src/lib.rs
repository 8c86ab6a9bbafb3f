//! Daily clicksums over RAMP monthly analytics extracts.
//!
//! Extracts arrive as one ZIP per month and data kind, each holding a single
//! CSV. The crate reads them one at a time, pulls out a repository's rows or
//! sums them globally, reconciles the v1 and v2 column sets, and writes
//! per-repository and global daily summaries as CSV.

pub mod aggregate;
pub mod archive;
pub mod config;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod memory_usage;
pub mod output;
pub mod reconcile;
pub mod schema;
pub mod summarize;
pub mod table;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use config::RampConfig;
pub use discovery::{ArchiveLocator, FixedLocator, GlobLocator};
pub use error::{ArchiveError, RampError, SchemaMismatchError};
pub use schema::DataKind;
pub use table::{Table, Value};
pub use workflow::{process_global_daily_clicks, ClickTables, RampWorkflow};
