//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use efmatch::{ColumnConfig, Result};

/// efmatch: match CSV labels to emission factors
#[derive(Parser)]
#[command(name = "efmatch")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (per-row progress)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve every row of a CSV file against the emission factor catalog
    Resolve {
        /// Path to the input CSV ("-" for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the result CSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        columns: ColumnArgs,

        /// JSON file with search sources, years and region fallbacks
        #[arg(long, value_name = "POLICY_FILE")]
        policy: Option<PathBuf>,

        /// Catalog API key (default: CLIMATIQ_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Catalog data version (e.g. "^21")
        #[arg(long)]
        data_version: Option<String>,
    },

    /// Validate a CSV file against the column configuration without resolving
    Check {
        /// Path to the input CSV ("-" for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        columns: ColumnArgs,
    },
}

/// Column name overrides shared by all commands.
#[derive(Args, Clone, Debug)]
pub struct ColumnArgs {
    /// Column holding the label to resolve
    #[arg(long, default_value = "name")]
    pub name_column: String,

    /// Column holding the region filter
    #[arg(long)]
    pub region_column: Option<String>,

    /// Column holding the activity amount (requires --activity-unit-column)
    #[arg(long)]
    pub activity_value_column: Option<String>,

    /// Column holding the activity unit (requires --activity-value-column)
    #[arg(long)]
    pub activity_unit_column: Option<String>,
}

impl ColumnArgs {
    /// Build the column configuration, rejecting half-specified activity columns.
    pub fn to_config(&self) -> Result<ColumnConfig> {
        ColumnConfig::from_parts(
            self.name_column.clone(),
            self.region_column.clone(),
            self.activity_value_column.clone(),
            self.activity_unit_column.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve_with_columns() {
        let cli = Cli::parse_from([
            "efmatch",
            "resolve",
            "labels.csv",
            "--region-column",
            "country",
            "--activity-value-column",
            "spend",
            "--activity-unit-column",
            "currency",
            "-v",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Resolve { file, columns, .. } => {
                assert_eq!(file, PathBuf::from("labels.csv"));
                let config = columns.to_config().unwrap();
                assert_eq!(config.region.as_deref(), Some("country"));
                assert!(config.has_activity());
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_half_activity_pair_rejected() {
        let cli = Cli::parse_from([
            "efmatch",
            "check",
            "labels.csv",
            "--activity-value-column",
            "spend",
        ]);

        match cli.command {
            Commands::Check { columns, .. } => assert!(columns.to_config().is_err()),
            _ => panic!("expected check"),
        }
    }
}
