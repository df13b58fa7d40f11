//! Check command - validate input and column configuration offline.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::cli::ColumnArgs;

pub fn run(
    file: PathBuf,
    columns: ColumnArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if file != Path::new("-") && !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let columns = columns.to_config()?;
    let table = super::load_input(&file, &columns)?;

    let with_region = table.rows.iter().filter(|r| r.record.region.is_some()).count();
    let with_activity = table
        .rows
        .iter()
        .filter(|r| r.record.activity.is_some())
        .count();

    println!(
        "{} {} ({} rows, {} columns)",
        "Valid".green().bold(),
        file.display().to_string().white(),
        table.row_count().to_string().white().bold(),
        table.metadata.column_count
    );

    if columns.region.is_some() {
        println!("  {} row(s) with a region", with_region.to_string().cyan());
    }
    if columns.has_activity() {
        println!(
            "  {} row(s) with an activity amount",
            with_activity.to_string().cyan()
        );
    }

    if verbose {
        println!();
        println!("{}", "Rows:".yellow().bold());
        for (idx, row) in table.rows.iter().enumerate() {
            println!(
                "  {:>4}  {:30} {}",
                idx + 1,
                row.record.name,
                row.record.region.as_deref().unwrap_or("-").dimmed()
            );
        }
        println!();
        println!("{} {}", "Hash:".dimmed(), table.metadata.hash);
    }

    Ok(())
}
