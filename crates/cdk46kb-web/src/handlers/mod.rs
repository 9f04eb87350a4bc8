//! HTTP handlers for all API routes.

pub mod root;
pub mod stats;
pub mod network;
pub mod centrality;
pub mod organic;
pub mod subtype;
pub mod search;
pub mod mindmap;

use std::path::Path;

use cdk46kb_common::{ApiError, Table};
use serde_json::Value;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn missing(path: &Path) -> ApiError {
    ApiError::NotFound(format!("file not found: {}", file_name(path)))
}

/// Read a CSV data file as strings; missing cells are "".
pub(crate) async fn read_table(path: &Path) -> Result<Table, ApiError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(missing(path)),
        Err(e) => return Err(ApiError::Internal(format!("cannot read {}: {}", file_name(path), e))),
    };
    Table::from_reader(bytes.as_slice())
        .map_err(|e| ApiError::Internal(format!("cannot parse {}: {}", file_name(path), e)))
}

/// Read and parse a JSON data file.
pub(crate) async fn read_json(path: &Path) -> Result<Value, ApiError> {
    let text = read_text(path).await?;
    serde_json::from_str(&text)
        .map_err(|e| ApiError::Internal(format!("{} is not valid JSON: {}", file_name(path), e)))
}

pub(crate) async fn read_text(path: &Path) -> Result<String, ApiError> {
    match tokio::fs::read_to_string(path).await {
        Ok(t) => Ok(t),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(missing(path)),
        Err(e) => Err(ApiError::Internal(format!("cannot read {}: {}", file_name(path), e))),
    }
}

/// Sorted stems of the files in `dir` with extension `ext`.
pub(crate) async fn file_stems(dir: &Path, ext: &str) -> Result<Vec<String>, ApiError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(format!("folder not found: {}", file_name(dir))));
        }
        Err(e) => return Err(ApiError::Internal(format!("cannot list {}: {}", file_name(dir), e))),
    };

    let mut stems = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    {
        let path = entry.path();
        if path.extension().is_some_and(|x| x == ext) {
            if let Some(stem) = path.file_stem() {
                stems.push(stem.to_string_lossy().into_owned());
            }
        }
    }
    stems.sort();
    Ok(stems)
}

/// Rows of a table as a JSON array of objects.
pub(crate) fn records(table: &Table) -> Value {
    Value::Array(table.records().into_iter().map(Value::Object).collect())
}
