//! Row-by-row resolution pipeline.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::EmissionCatalog;
use crate::input::{LoadedRow, LoadedTable};
use crate::matching;
use crate::output::{self, OutputRecord, ResultSet, RowOutcome};
use crate::resolver::{Resolver, ResolverPolicy};

/// Configuration for a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Search constraints for lookups.
    pub policy: ResolverPolicy,
    /// Log a progress line per row.
    pub verbose: bool,
}

/// Counts of row outcomes for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_rows: usize,
    /// Rows with at least one match.
    pub resolved: usize,
    /// Rows whose lookup found nothing.
    pub not_found: usize,
    /// Rows with an estimate.
    pub estimated: usize,
    /// Rows with a row-local error.
    pub errors: usize,
}

impl RunSummary {
    /// Tally the outcomes in `results`.
    pub fn from_results(results: &ResultSet) -> Self {
        let mut summary = Self {
            total_rows: results.len(),
            ..Default::default()
        };

        for record in results.iter() {
            if record.is_error() {
                summary.errors += 1;
            } else if record.is_not_found() {
                summary.not_found += 1;
            } else {
                summary.resolved += 1;
            }
            if record.emissions.is_some() {
                summary.estimated += 1;
            }
        }

        summary
    }
}

/// Resolves loaded rows against a catalog, one row at a time.
pub struct Pipeline {
    catalog: Arc<dyn EmissionCatalog>,
    resolver: Resolver,
    verbose: bool,
}

impl Pipeline {
    /// Create a pipeline over `catalog`.
    pub fn new(catalog: impl EmissionCatalog + 'static, config: PipelineConfig) -> Self {
        Self::with_shared(Arc::new(catalog), config)
    }

    /// Create a pipeline over a catalog shared with the caller.
    pub fn with_shared(catalog: Arc<dyn EmissionCatalog>, config: PipelineConfig) -> Self {
        Self {
            catalog,
            resolver: Resolver::new(config.policy),
            verbose: config.verbose,
        }
    }

    /// Process every row of `table` in order.
    ///
    /// Never fails: each row's failure is captured in its output record, and
    /// the result has exactly one record per input row.
    pub fn run(&self, table: &LoadedTable) -> ResultSet {
        let mut results = ResultSet::new(table.headers.clone(), table.columns.has_activity());

        info!(
            catalog = self.catalog.name(),
            rows = table.row_count(),
            "resolving rows"
        );

        for (idx, row) in table.rows.iter().enumerate() {
            let record = self.process_row(row);
            if self.verbose {
                log_row(idx + 1, row, &record);
            }
            results.push(record);
        }

        results
    }

    /// Resolve, deduplicate and estimate a single row.
    pub fn process_row(&self, row: &LoadedRow) -> OutputRecord {
        output::aggregate(row.source.clone(), self.outcome(row))
    }

    fn outcome(&self, row: &LoadedRow) -> RowOutcome {
        let candidates = match self.resolver.resolve(self.catalog.as_ref(), &row.record) {
            Ok(candidates) => matching::dedup(candidates),
            Err(e) => return RowOutcome::ResolutionFailed(e.to_string()),
        };

        match matching::estimate_best(
            self.catalog.as_ref(),
            &candidates,
            row.record.activity.as_ref(),
        ) {
            Ok(estimate) => RowOutcome::Resolved {
                candidates,
                emissions: estimate.map(|e| e.to_string()),
            },
            Err(e) => RowOutcome::EstimateFailed(e.to_string()),
        }
    }
}

fn log_row(row: usize, input: &LoadedRow, record: &OutputRecord) {
    let name = input.record.name.as_str();
    if record.is_error() {
        info!(row, name, error = %record.error, "row failed");
    } else if record.is_not_found() {
        info!(row, name, "no emission factors found");
    } else {
        info!(
            row,
            name,
            factors = %record.emission_factors,
            emissions = record.emissions.as_deref().unwrap_or("-"),
            "row resolved"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, EmissionFactor, Estimate, MockCatalog};
    use crate::input::{ColumnConfig, Loader};

    fn table(data: &str, columns: &ColumnConfig) -> LoadedTable {
        Loader::load_reader(data.as_bytes(), columns).unwrap()
    }

    #[test]
    fn test_row_errors_do_not_abort_batch() {
        let catalog = MockCatalog::new()
            .with_search_error("Glass", CatalogError::Request("connection reset".to_string()))
            .with_factors("Steel", vec![EmissionFactor::new("ef-1", "Steel")]);
        let pipeline = Pipeline::new(catalog, PipelineConfig::default());

        let results = pipeline.run(&table("name\nGlass\nSteel\n", &ColumnConfig::default()));

        assert_eq!(results.len(), 2);
        assert_eq!(
            results.records[0].error,
            "request failed: connection reset"
        );
        assert_eq!(results.records[1].emission_factors, "Steel");
    }

    #[test]
    fn test_duplicates_collapsed_before_estimate() {
        let catalog = MockCatalog::new()
            .with_factors(
                "Steel",
                vec![
                    EmissionFactor::new("ef-1", "Steel"),
                    EmissionFactor::new("ef-1", "Steel"),
                    EmissionFactor::new("ef-2", "Iron"),
                ],
            )
            .with_estimate("ef-1", Estimate::new(3.0, "kg"));
        let pipeline = Pipeline::new(catalog, PipelineConfig::default());
        let columns = ColumnConfig::default().with_activity("amount", "unit");

        let results = pipeline.run(&table("name,amount,unit\nSteel,10,kg\n", &columns));

        let record = &results.records[0];
        assert_eq!(record.emission_factors, "Steel; Iron");
        assert_eq!(record.emissions.as_deref(), Some("3 kg"));
        assert!(results.include_emissions);
    }

    #[test]
    fn test_summary_counts() {
        let catalog = MockCatalog::new()
            .with_factors("Steel", vec![EmissionFactor::new("ef-1", "Steel")])
            .with_search_error("Glass", CatalogError::Request("down".to_string()));
        let pipeline = Pipeline::new(
            catalog,
            PipelineConfig {
                verbose: true,
                ..Default::default()
            },
        );

        let results = pipeline.run(&table(
            "name\nSteel\nGlass\nUnobtainium\n",
            &ColumnConfig::default(),
        ));

        assert_eq!(
            RunSummary::from_results(&results),
            RunSummary {
                total_rows: 3,
                resolved: 1,
                not_found: 1,
                estimated: 0,
                errors: 1,
            }
        );
    }
}
