//! CSV loader that turns rows into typed input records.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::catalog::Activity;
use crate::error::{EfmatchError, Result};
use crate::schema;

use super::columns::ColumnConfig;
use super::source::{InputRecord, LoadedRow, LoadedTable, SourceMetadata, SourceRow};

/// Loads CSV input for the pipeline.
///
/// Loading is all-or-nothing: the first row that fails validation aborts
/// the load, since a missing column is a configuration problem that would
/// affect every row.
pub struct Loader;

impl Loader {
    /// Load a CSV file.
    pub fn load(path: impl AsRef<Path>, columns: &ColumnConfig) -> Result<LoadedTable> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| EfmatchError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| EfmatchError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Self::load_bytes(path.to_path_buf(), &contents, columns)
    }

    /// Load CSV from any reader, e.g. stdin.
    pub fn load_reader(mut reader: impl Read, columns: &ColumnConfig) -> Result<LoadedTable> {
        let path = PathBuf::from("-");
        let mut contents = Vec::new();
        reader
            .read_to_end(&mut contents)
            .map_err(|e| EfmatchError::Io {
                path: path.clone(),
                source: e,
            })?;

        Self::load_bytes(path, &contents, columns)
    }

    fn load_bytes(path: PathBuf, contents: &[u8], columns: &ColumnConfig) -> Result<LoadedTable> {
        let (headers, rows) = parse_rows(contents, columns)?;

        let metadata = SourceMetadata::new(path, contents, rows.len(), headers.len());
        info!(
            file = %metadata.file,
            rows = metadata.row_count,
            columns = metadata.column_count,
            hash = %metadata.hash,
            "loaded input"
        );

        Ok(LoadedTable {
            headers,
            rows,
            columns: columns.clone(),
            metadata,
        })
    }
}

/// Parse CSV bytes into headers and loaded rows.
fn parse_rows(bytes: &[u8], columns: &ColumnConfig) -> Result<(Vec<String>, Vec<LoadedRow>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(EfmatchError::EmptyData("No header row found".to_string()));
    }

    let mut seen = IndexSet::new();
    if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
        return Err(EfmatchError::Config(format!(
            "duplicate column '{}' in header",
            dup
        )));
    }

    let required = columns.required_fields();
    let mut rows = Vec::new();

    // Parse everything first so a malformed file yields no rows at all.
    let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

    for (idx, record) in records.iter().enumerate() {
        let row = idx + 1;

        // Short rows are caught as missing fields; long rows would lose data.
        if record.len() > headers.len() {
            return Err(EfmatchError::Validation {
                row,
                reason: format!(
                    "expected {} fields, found {}",
                    headers.len(),
                    record.len()
                ),
            });
        }

        let raw: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), Value::String(v.to_string())))
            .collect();

        let validated = schema::validate(&Value::Object(raw), &required).map_err(|e| {
            EfmatchError::Validation {
                row,
                reason: e.to_string(),
            }
        })?;

        let record_fields = build_record(row, &validated, columns)?;

        let mut source: SourceRow = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        for (field, value) in &validated {
            source.insert(field.clone(), value.trim().to_string());
        }

        rows.push(LoadedRow {
            source,
            record: record_fields,
        });
    }

    Ok((headers, rows))
}

/// Build the typed record for a validated row.
fn build_record(
    row: usize,
    validated: &indexmap::IndexMap<String, String>,
    columns: &ColumnConfig,
) -> Result<InputRecord> {
    let field = |column: &str| validated.get(column).and_then(|v| non_blank(v));

    let name = field(&columns.name).ok_or_else(|| EfmatchError::Validation {
        row,
        reason: "name must not be blank".to_string(),
    })?;

    let region = columns.region.as_deref().and_then(field);

    let activity = match columns.activity {
        Some(ref cols) => match (field(&cols.value), field(&cols.unit)) {
            (Some(value), Some(unit)) => Some(Activity::new(value, unit)),
            (None, None) => None,
            (value, unit) => {
                warn!(
                    row,
                    has_value = value.is_some(),
                    has_unit = unit.is_some(),
                    "incomplete activity, skipping estimate"
                );
                None
            }
        },
        None => None,
    };

    Ok(InputRecord {
        name,
        region,
        activity,
    })
}

/// Trim `value`, mapping blank to `None`.
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
