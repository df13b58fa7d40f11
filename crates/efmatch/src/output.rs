//! Per-row result aggregation and CSV output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::Candidate;
use crate::error::{EfmatchError, Result};
use crate::input::SourceRow;
use crate::matching;

/// Column holding the joined candidate names.
pub const EMISSION_FACTORS_COLUMN: &str = "emission_factors";

/// Column holding the estimate, present when activity columns are configured.
pub const EMISSIONS_COLUMN: &str = "emissions";

/// Column holding the row-local error.
pub const ERROR_COLUMN: &str = "error";

/// How processing of one row ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Lookup succeeded; the estimate was skipped or succeeded.
    Resolved {
        candidates: Vec<Candidate>,
        emissions: Option<String>,
    },
    /// Lookup failed.
    ResolutionFailed(String),
    /// Lookup succeeded but the estimate failed.
    EstimateFailed(String),
}

/// One output row: the source fields plus resolution results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub source: SourceRow,
    pub emission_factors: String,
    pub emissions: Option<String>,
    pub error: String,
}

impl OutputRecord {
    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Lookup succeeded but found nothing.
    pub fn is_not_found(&self) -> bool {
        !self.is_error() && self.emission_factors.is_empty()
    }

    /// Value for an output column.
    ///
    /// Without `include_emissions`, an `emissions` column is a plain source
    /// column and is echoed as read.
    fn field(&self, column: &str, include_emissions: bool) -> &str {
        match column {
            EMISSION_FACTORS_COLUMN => &self.emission_factors,
            EMISSIONS_COLUMN if include_emissions => self.emissions.as_deref().unwrap_or(""),
            ERROR_COLUMN => &self.error,
            _ => self.source.get(column).map(|s| s.as_str()).unwrap_or(""),
        }
    }
}

/// Merge a source row with its outcome.
///
/// A failed estimate discards the lookup results: the row becomes an error
/// row, never a partial success.
pub fn aggregate(source: SourceRow, outcome: RowOutcome) -> OutputRecord {
    match outcome {
        RowOutcome::Resolved {
            candidates,
            emissions,
        } => OutputRecord {
            source,
            emission_factors: matching::join_names(&candidates),
            emissions,
            error: String::new(),
        },
        RowOutcome::ResolutionFailed(reason) | RowOutcome::EstimateFailed(reason) => {
            OutputRecord {
                source,
                emission_factors: String::new(),
                emissions: None,
                error: reason,
            }
        }
    }
}

/// Output rows in input order, with the input header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Input column headers.
    pub headers: Vec<String>,
    /// Whether the `emissions` column is written.
    pub include_emissions: bool,
    pub records: Vec<OutputRecord>,
}

impl ResultSet {
    pub fn new(headers: Vec<String>, include_emissions: bool) -> Self {
        Self {
            headers,
            include_emissions,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: OutputRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputRecord> {
        self.records.iter()
    }

    /// Output header: the input columns followed by the result columns.
    ///
    /// A result column that already exists in the input keeps its position.
    pub fn output_headers(&self) -> Vec<String> {
        let mut headers = self.headers.clone();
        let mut extra = vec![EMISSION_FACTORS_COLUMN];
        if self.include_emissions {
            extra.push(EMISSIONS_COLUMN);
        }
        extra.push(ERROR_COLUMN);

        for column in extra {
            if !headers.iter().any(|h| h == column) {
                headers.push(column.to_string());
            }
        }
        headers
    }
}

/// Serializes result sets as CSV with every field quoted.
pub struct OutputWriter;

impl OutputWriter {
    /// Write `results` to a file.
    pub fn write_path(results: &ResultSet, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| EfmatchError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::write_to(results, BufWriter::new(file), path.to_path_buf())
    }

    /// Write `results` to any writer, e.g. stdout.
    pub fn write(results: &ResultSet, writer: impl Write) -> Result<()> {
        Self::write_to(results, writer, PathBuf::from("-"))
    }

    fn write_to(results: &ResultSet, writer: impl Write, path: PathBuf) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(writer);

        let headers = results.output_headers();
        csv_writer.write_record(&headers)?;

        for record in results.iter() {
            csv_writer.write_record(
                headers
                    .iter()
                    .map(|h| record.field(h, results.include_emissions)),
            )?;
        }

        csv_writer
            .flush()
            .map_err(|e| EfmatchError::Io { path, source: e })
    }
}
