//! Resolve command - match every row against the catalog and write results.

use std::io;
use std::path::{Path, PathBuf};

use colored::Colorize;
use efmatch::{ClimatiqClient, OutputWriter, Pipeline, PipelineConfig, ResolverPolicy, RunSummary};

use crate::cli::ColumnArgs;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    columns: ColumnArgs,
    policy: Option<PathBuf>,
    api_key: Option<String>,
    data_version: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Everything that can abort the run is checked before any row is resolved.
    if file != Path::new("-") && !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let columns = columns.to_config()?;

    let policy = match policy {
        Some(ref path) => ResolverPolicy::load(path)?,
        None => ResolverPolicy::default(),
    };

    let mut client = match api_key {
        Some(key) => ClimatiqClient::new(key)?,
        None => ClimatiqClient::from_env()?,
    };
    if let Some(version) = data_version {
        client = client.with_data_version(version);
    }

    let table = super::load_input(&file, &columns)?;

    eprintln!(
        "{} {} row(s) from {}",
        "Resolving".cyan().bold(),
        table.row_count().to_string().white().bold(),
        file.display().to_string().white()
    );

    if verbose {
        eprintln!("  {} {}", "input:".dimmed(), table.metadata.hash);
        eprintln!("  {} {}", "sources:".dimmed(), policy.sources.join(", "));
    }

    let pipeline = Pipeline::new(client, PipelineConfig { policy, verbose });
    let results = pipeline.run(&table);

    match output {
        Some(ref path) => OutputWriter::write_path(&results, path)?,
        None => OutputWriter::write(&results, io::stdout().lock())?,
    }

    let summary = RunSummary::from_results(&results);
    print_summary(&summary, output.as_deref());

    Ok(())
}

fn print_summary(summary: &RunSummary, output: Option<&Path>) {
    eprintln!();
    eprintln!(
        "{} {} row(s): {} resolved, {} not found, {} error(s)",
        "Done:".green().bold(),
        summary.total_rows.to_string().white().bold(),
        summary.resolved.to_string().green(),
        summary.not_found.to_string().yellow(),
        summary.errors.to_string().red()
    );

    if summary.estimated > 0 {
        eprintln!(
            "  {} row(s) with emissions estimates",
            summary.estimated.to_string().white()
        );
    }

    if let Some(path) = output {
        eprintln!(
            "{} {}",
            "Saved to".green().bold(),
            path.display().to_string().white()
        );
    }
}
