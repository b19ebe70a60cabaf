use crate::models::{Cell, RawRow, RawTable};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading the survey export
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Dataset must be a JSON array of row objects")]
    NotAnArray,

    #[error("Row {0} is not a JSON object")]
    RowNotObject(usize),
}

/// Read a records-oriented JSON export (`[{"Name": ..., "Age": ...}, ...]`)
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<RawTable, DatasetError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = parse_dataset(&contents)?;
    tracing::info!(
        "Loaded {} rows with {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

/// Parse the JSON text of a dataset
///
/// A column belongs to the schema as soon as one row carries it; rows without
/// the key get a missing cell for it.
pub fn parse_dataset(contents: &str) -> Result<RawTable, DatasetError> {
    let value: Value = serde_json::from_str(contents)?;
    let rows = match value {
        Value::Array(rows) => rows,
        _ => return Err(DatasetError::NotAnArray),
    };

    let mut columns: Vec<String> = Vec::new();
    let mut table_rows: Vec<RawRow> = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let object = row.as_object().ok_or(DatasetError::RowNotObject(idx))?;

        let mut raw = RawRow::with_capacity(object.len());
        for (key, value) in object {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
            raw.insert(key.clone(), Cell::from_json(value));
        }
        table_rows.push(raw);
    }

    Ok(RawTable::new(columns, table_rows))
}
