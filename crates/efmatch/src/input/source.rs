//! Loaded input: typed records, source rows and file metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::catalog::Activity;

use super::columns::ColumnConfig;

/// The original field→value mapping of one CSV row, in header order.
pub type SourceRow = IndexMap<String, String>;

/// Typed view of one data row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Label to resolve, trimmed and never blank.
    pub name: String,

    /// Region filter; `None` when not configured or blank.
    pub region: Option<String>,

    /// Activity amount; `None` unless both value and unit are present.
    pub activity: Option<Activity>,
}

/// A data row as loaded: the source fields plus the typed record.
#[derive(Debug, Clone)]
pub struct LoadedRow {
    pub source: SourceRow,
    pub record: InputRecord,
}

/// Metadata about the loaded input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file ("-" for a stream).
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the input was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for input that has been loaded.
    pub fn new(path: PathBuf, contents: &[u8], row_count: usize, column_count: usize) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        Self {
            file,
            path,
            hash,
            size_bytes: contents.len() as u64,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Every data row of an input file, in file order.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    /// Column headers, as in the file.
    pub headers: Vec<String>,
    /// Loaded rows.
    pub rows: Vec<LoadedRow>,
    /// Columns the rows were loaded with.
    pub columns: ColumnConfig,
    /// Provenance of the input.
    pub metadata: SourceMetadata,
}

impl LoadedTable {
    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_hash_and_name() {
        let meta = SourceMetadata::new(PathBuf::from("/tmp/labels.csv"), b"name\nSteel\n", 1, 1);

        assert_eq!(meta.file, "labels.csv");
        assert_eq!(meta.size_bytes, 11);
        assert!(meta.hash.starts_with("sha256:"));
        assert_eq!(meta.hash.len(), "sha256:".len() + 64);
    }

    #[test]
    fn test_metadata_hash_is_deterministic() {
        let a = SourceMetadata::new(PathBuf::from("a.csv"), b"x", 0, 1);
        let b = SourceMetadata::new(PathBuf::from("b.csv"), b"x", 0, 1);
        assert_eq!(a.hash, b.hash);
    }
}
