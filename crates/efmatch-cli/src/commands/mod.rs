//! CLI command implementations.

pub mod check;
pub mod resolve;

use std::io;
use std::path::Path;

use efmatch::{ColumnConfig, LoadedTable, Loader, Result};

/// Load `file`, reading stdin when it is "-".
fn load_input(file: &Path, columns: &ColumnConfig) -> Result<LoadedTable> {
    if file == Path::new("-") {
        Loader::load_reader(io::stdin().lock(), columns)
    } else {
        Loader::load(file, columns)
    }
}
