use crate::error::Result;
use crate::schema::REPOSITORY_ID;
use crate::table::Table;

/// Rows of `table` belonging to `repository_id`, in their original order.
///
/// Returns an empty table with the same columns when nothing matches. Fails
/// only when the table has no `repository_id` column.
pub fn filter_repository(table: &Table, repository_id: &str) -> Result<Table> {
    let idx = table.column_index(REPOSITORY_ID)?;
    Ok(table.filter_rows(|row| row[idx].matches_str(repository_id)))
}
