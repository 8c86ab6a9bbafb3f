use log::debug;

use crate::error::SchemaMismatchError;
use crate::table::Table;

/// Joins a v1 table and a v2 table of the same data kind.
///
/// The result has the v2 columns; v1 rows are projected onto them and come
/// first, followed by the v2 rows. Fails when v2 has a column v1 lacks.
pub fn reconcile_eras(v1: Table, v2: Table) -> Result<Table, SchemaMismatchError> {
    let columns = v2.columns().to_vec();
    let (v1_rows, v2_rows) = (v1.len(), v2.len());
    let v1 = v1.project(&columns, "v1/v2 reconciliation")?;
    let combined = Table::concat(columns, [v1, v2], "v1/v2 reconciliation")?;
    debug!(
        "Reconciled {} v1 rows with {} v2 rows into {} columns",
        v1_rows,
        v2_rows,
        combined.columns().len()
    );
    Ok(combined)
}
