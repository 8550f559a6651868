use std::path::PathBuf;

use async_trait::async_trait;
use chemtune_core::{CoreError, DataTable, DatasetLoader, Result};
use serde_json::{Map, Number, Value};

/// Loads a table from a CSV file. Numeric cells become JSON numbers, empty
/// cells become null, everything else stays a string.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read(&self) -> Result<DataTable> {
        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| CoreError::Data(format!("{}: {}", self.path.display(), e)))?;
        let headers = reader
            .headers()
            .map_err(|e| CoreError::Data(format!("{}: {}", self.path.display(), e)))?
            .clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record
                .map_err(|e| CoreError::Data(format!("{}: {}", self.path.display(), e)))?;
            let mut row = Map::new();
            for (header, field) in headers.iter().zip(record.iter()) {
                row.insert(header.to_string(), parse_cell(field));
            }
            rows.push(row);
        }

        tracing::debug!(path = %self.path.display(), rows = rows.len(), "loaded csv table");
        Ok(DataTable::new(rows))
    }
}

#[async_trait]
impl DatasetLoader for CsvLoader {
    async fn load(&self) -> Result<DataTable> {
        self.read()
    }
}

fn parse_cell(field: &str) -> Value {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        if let Some(n) = Number::from_f64(v) {
            return Value::Number(n);
        }
    }
    Value::String(field.to_string())
}

/// In-memory loader, mainly for tests and pre-built tables.
#[derive(Debug, Clone)]
pub struct StaticLoader {
    table: DataTable,
}

impl StaticLoader {
    pub fn new(table: DataTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl DatasetLoader for StaticLoader {
    async fn load(&self) -> Result<DataTable> {
        Ok(self.table.clone())
    }
}
