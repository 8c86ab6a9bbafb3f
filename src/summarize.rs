//! Grouped clicksums.
//!
//! A summary has one row per distinct key tuple with the measure summed over
//! every input row sharing that tuple. Output columns are the key columns
//! followed by the measure, plus `repository_id` for per-repository variants.

use std::collections::HashMap;

use crate::error::{RampError, Result};
use crate::schema::REPOSITORY_ID;
use crate::table::{Table, Value};

/// Order in which distinct key tuples are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
    /// Order of first appearance in the input.
    #[default]
    FirstSeen,
    /// Ascending by key values, column by column.
    Sorted,
}

#[derive(Debug, Clone, Copy)]
enum Sum {
    Int(i64),
    Float(f64),
}

impl Sum {
    fn add(self, value: &Value, column: &str) -> Result<Sum> {
        Ok(match (self, value) {
            (s, Value::Null) => s,
            (Sum::Int(a), Value::Int(b)) => a
                .checked_add(*b)
                .map_or(Sum::Float(a as f64 + *b as f64), Sum::Int),
            (Sum::Int(a), Value::Float(b)) => Sum::Float(a as f64 + b),
            (Sum::Float(a), Value::Int(b)) => Sum::Float(a + *b as f64),
            (Sum::Float(a), Value::Float(b)) => Sum::Float(a + b),
            (_, Value::Text(t)) => {
                return Err(RampError::NonNumericMeasure {
                    column: column.to_string(),
                    value: t.clone(),
                })
            }
        })
    }

    fn into_value(self) -> Value {
        match self {
            Sum::Int(i) => Value::Int(i),
            Sum::Float(x) => Value::Float(x),
        }
    }
}

/// Sums `measure` over every distinct combination of `keys` in `table`.
///
/// Rows with a null key cell group together under that null. Zero input rows
/// give zero output rows.
pub fn summarize(table: &Table, keys: &[&str], measure: &str, order: KeyOrder) -> Result<Table> {
    let key_idx = keys
        .iter()
        .map(|k| table.column_index(k))
        .collect::<Result<Vec<_>>>()?;
    let measure_idx = table.column_index(measure)?;

    let mut slots: HashMap<Vec<String>, usize> = HashMap::new();
    let mut groups: Vec<(Vec<Value>, Sum)> = Vec::new();
    for row in table.rows() {
        let fingerprint: Vec<String> = key_idx.iter().map(|&i| group_text(&row[i])).collect();
        let slot = match slots.get(&fingerprint) {
            Some(&slot) => slot,
            None => {
                let key_values = key_idx.iter().map(|&i| row[i].clone()).collect();
                groups.push((key_values, Sum::Int(0)));
                slots.insert(fingerprint, groups.len() - 1);
                groups.len() - 1
            }
        };
        let entry = &mut groups[slot];
        entry.1 = entry.1.add(&row[measure_idx], measure)?;
    }

    if order == KeyOrder::Sorted {
        groups.sort_by(|(a, _), (b, _)| {
            a.iter()
                .zip(b)
                .map(|(x, y)| x.sort_cmp(y))
                .find(|o| o.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    let mut columns: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    columns.push(measure.to_string());
    let rows = groups
        .into_iter()
        .map(|(mut key, sum)| {
            key.push(sum.into_value());
            key
        })
        .collect();
    Ok(Table::from_rows(columns, rows))
}

/// [`summarize`] with `repository_id` appended to every output row.
pub fn summarize_for_repository(
    table: &Table,
    keys: &[&str],
    measure: &str,
    repository_id: &str,
    order: KeyOrder,
) -> Result<Table> {
    Ok(summarize(table, keys, measure, order)?
        .with_constant_column(REPOSITORY_ID, Value::from(repository_id)))
}

// Nulls get a marker no CSV cell can produce, so they never merge with text.
fn group_text(value: &Value) -> String {
    match value {
        Value::Null => "\u{0}null".to_string(),
        other => other.to_string(),
    }
}
