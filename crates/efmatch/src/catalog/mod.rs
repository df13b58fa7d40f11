//! Emission factor catalog integration.
//!
//! The catalog offers two operations: searching for factors that match a
//! label, and estimating emissions for an activity amount against one
//! factor. The pipeline only sees the [`EmissionCatalog`] trait.
//!
//! # Implementations
//!
//! - **Climatiq** - the hosted catalog API (requires `CLIMATIQ_API_KEY`)
//! - **Mock** - scripted in-memory responses for tests and offline runs

mod climatiq;
mod mock;
mod provider;

pub use climatiq::ClimatiqClient;
pub use mock::MockCatalog;
pub use provider::{
    Activity, Candidate, CatalogError, EmissionCatalog, EmissionFactor, Estimate, SearchQuery,
};
