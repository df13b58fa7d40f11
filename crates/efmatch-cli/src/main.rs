//! efmatch CLI - match CSV labels to emission factors.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use logging::LogConfig;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(&LogConfig::from_verbose(cli.verbose)) {
        eprintln!("Error: failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Resolve {
            file,
            output,
            columns,
            policy,
            api_key,
            data_version,
        } => commands::resolve::run(
            file,
            output,
            columns,
            policy,
            api_key,
            data_version,
            cli.verbose,
        ),

        Commands::Check { file, columns } => commands::check::run(file, columns, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
