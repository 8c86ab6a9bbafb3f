//! In-memory record sets.
//!
//! A [`Table`] is an ordered list of column names plus rows of [`Value`]s in
//! the same order. Tables are built once per archive, transformed, and dropped
//! after they are folded into a summary or written out.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{RampError, SchemaMismatchError};

/// One CSV cell after type inference.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// True when the cell's text form equals `s`.
    pub fn matches_str(&self, s: &str) -> bool {
        match self {
            Value::Text(t) => t == s,
            Value::Null => false,
            other => other.to_string() == s,
        }
    }

    /// Ordering used for sorted group output: nulls, then numbers, then text.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Null => 0,
                Value::Int(_) | Value::Float(_) => 1,
                Value::Text(_) => 2,
            }
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).total_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.total_cmp(&(*b as f64)),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// An empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Rows must each have one value per column.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, RampError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| RampError::MissingColumn(name.to_string()))
    }

    /// All values of one column, in row order.
    pub fn column_values<'a>(
        &'a self,
        name: &str,
    ) -> Result<impl Iterator<Item = &'a Value> + 'a, RampError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// A new table holding the rows for which `keep` returns true.
    pub fn filter_rows(&self, mut keep: impl FnMut(&[Value]) -> bool) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }

    /// Reorders and narrows the table to `columns`. Fails when any requested
    /// column is absent.
    pub fn project(self, columns: &[String], context: &str) -> Result<Table, SchemaMismatchError> {
        if self.columns == columns {
            return Ok(self);
        }
        let mut indices = Vec::with_capacity(columns.len());
        let mut missing = Vec::new();
        for column in columns {
            match self.columns.iter().position(|c| c == column) {
                Some(i) => indices.push(i),
                None => missing.push(column.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(SchemaMismatchError {
                context: context.to_string(),
                missing,
            });
        }
        let rows = self
            .rows
            .into_iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Table {
            columns: columns.to_vec(),
            rows,
        })
    }

    /// Concatenates `parts` row-wise in order, in one pass. Every part is
    /// projected to `columns` first.
    pub fn concat(
        columns: Vec<String>,
        parts: impl IntoIterator<Item = Table>,
        context: &str,
    ) -> Result<Table, SchemaMismatchError> {
        let parts = parts
            .into_iter()
            .map(|part| part.project(&columns, context))
            .collect::<Result<Vec<_>, _>>()?;
        let total = parts.iter().map(Table::len).sum();
        let mut rows = Vec::with_capacity(total);
        for part in parts {
            rows.extend(part.rows);
        }
        Ok(Table { columns, rows })
    }

    /// Adds a column holding `value` on every row.
    pub fn with_constant_column(mut self, name: &str, value: Value) -> Table {
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(value.clone());
        }
        self
    }
}
