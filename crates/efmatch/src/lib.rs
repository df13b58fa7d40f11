//! efmatch: match client-supplied labels to emission factors.
//!
//! A CSV of names (with optional region and activity columns) is resolved
//! row by row against an emission factor catalog. Each row gets the names of
//! the matching factors and, when an activity amount is given, an emissions
//! estimate from the best match. A failure on one row is recorded in that
//! row's `error` column and never aborts the batch.
//!
//! # Example
//!
//! ```no_run
//! use efmatch::{ClimatiqClient, ColumnConfig, Loader, Pipeline, PipelineConfig};
//!
//! let columns = ColumnConfig::new("name").with_region("region");
//! let table = Loader::load("labels.csv", &columns).unwrap();
//!
//! let pipeline = Pipeline::new(ClimatiqClient::from_env().unwrap(), PipelineConfig::default());
//! let results = pipeline.run(&table);
//!
//! println!("Rows: {}", results.len());
//! ```

pub mod catalog;
pub mod error;
pub mod input;
pub mod matching;
pub mod output;
pub mod resolver;
pub mod schema;

mod pipeline;

pub use crate::pipeline::{Pipeline, PipelineConfig, RunSummary};
pub use catalog::{
    Activity, Candidate, CatalogError, ClimatiqClient, EmissionCatalog, EmissionFactor, Estimate,
    MockCatalog, SearchQuery,
};
pub use error::{EfmatchError, Result};
pub use input::{
    ActivityColumns, ColumnConfig, InputRecord, LoadedRow, LoadedTable, Loader, SourceMetadata,
    SourceRow,
};
pub use output::{OutputRecord, OutputWriter, ResultSet, RowOutcome};
pub use resolver::{RegionFallback, Resolver, ResolverPolicy};
