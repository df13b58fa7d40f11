//! Input loading: column selection, validation and typed records.

mod columns;
mod loader;
mod source;

pub use columns::{ActivityColumns, ColumnConfig};
pub use loader::Loader;
pub use source::{InputRecord, LoadedRow, LoadedTable, SourceMetadata, SourceRow};
