use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// An ordered table of raw records. The contract with loaders is column
/// presence, not a fixed schema: each row is a JSON object and cells may be
/// numbers, strings or null.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DataTable {
    rows: Vec<Map<String, Value>>,
}

impl DataTable {
    pub fn new(rows: Vec<Map<String, Value>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Resolve the first candidate spelling present in the table header.
    pub fn resolve_column(&self, candidates: &[&str]) -> Result<String> {
        let first = self
            .rows
            .first()
            .ok_or_else(|| CoreError::Data("cannot resolve a column on an empty table".into()))?;
        candidates
            .iter()
            .find(|name| first.contains_key(**name))
            .map(|name| name.to_string())
            .ok_or_else(|| {
                CoreError::NotFound(format!("none of the columns {:?} present", candidates))
            })
    }

    /// Drop rows where any of the named columns is absent, null, NaN or an
    /// empty string. Mirrors a dataframe `dropna(subset=...)`.
    pub fn drop_missing(&self, columns: &[&str]) -> DataTable {
        let rows = self
            .rows
            .iter()
            .filter(|row| columns.iter().all(|col| !cell_missing(row.get(*col))))
            .cloned()
            .collect();
        DataTable { rows }
    }

    pub fn select(&self, indices: &[usize]) -> DataTable {
        let rows = indices
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();
        DataTable { rows }
    }

    /// Numeric view of a column; errors on the first non-numeric cell.
    pub fn column_f64(&self, column: &str) -> Result<Vec<f64>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                cell_f64(row.get(column)).ok_or_else(|| {
                    CoreError::Data(format!("row {}: column {:?} is not numeric", i, column))
                })
            })
            .collect()
    }
}

fn cell_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => {
            let s = s.trim();
            s.is_empty() || s.eq_ignore_ascii_case("nan")
        }
        Some(Value::Number(n)) => n.as_f64().map(f64::is_nan).unwrap_or(false),
        Some(_) => false,
    }
}

/// Coerce a cell to f64, accepting numeric strings.
pub fn cell_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Text view of a cell; numbers are rendered, null is absent.
pub fn cell_str(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
