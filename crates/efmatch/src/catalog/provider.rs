//! Catalog trait and the types that cross it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A full emission factor record as returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    /// Catalog identifier, used for estimates.
    pub id: String,

    /// Human-readable factor name.
    pub name: String,

    /// Data source the factor was published by.
    #[serde(default)]
    pub source: Option<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<u16>,

    /// Region code or name the factor applies to.
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    /// Kind of activity the factor expects (money, weight, ...).
    #[serde(default)]
    pub unit_type: Option<String>,
}

impl EmissionFactor {
    /// Create a factor with only an id and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source: None,
            year: None,
            region: None,
            category: None,
            unit_type: None,
        }
    }

    /// Set the data source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the publication year.
    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    /// Project the factor down to the fields the pipeline uses.
    pub fn to_candidate(&self) -> Candidate {
        Candidate {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// An (id, name) projection of a matching emission factor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An activity amount supplied by the client, e.g. `100` `USD`.
///
/// Both parts are kept as the client wrote them; interpretation is up to
/// the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub value: String,
    pub unit: String,
}

impl Activity {
    pub fn new(value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
        }
    }
}

/// Parameters of a catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text label to search for.
    pub query: String,

    /// Region filter, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Data sources to restrict the search to.
    pub sources: Vec<String>,

    /// Publication years to restrict the search to.
    pub years: Vec<u16>,

    /// Maximum number of results to return.
    pub result_limit: usize,
}

/// Result of an emissions estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Estimated CO2-equivalent amount.
    pub co2e: f64,

    /// Unit of `co2e` (e.g. "kg").
    pub co2e_unit: String,
}

impl Estimate {
    pub fn new(co2e: f64, co2e_unit: impl Into<String>) -> Self {
        Self {
            co2e,
            co2e_unit: co2e_unit.into(),
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.co2e, self.co2e_unit)
    }
}

/// A failed catalog call. Scoped to the row that made it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// The request could not be sent or no response arrived.
    #[error("request failed: {0}")]
    Request(String),

    /// The catalog answered with an error status.
    #[error("catalog error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not what the catalog documents.
    #[error("invalid catalog response: {0}")]
    Decode(String),

    /// The activity unit is not one the catalog can estimate with.
    #[error("unsupported activity unit '{0}'")]
    UnsupportedUnit(String),

    /// The activity value is not a finite number.
    #[error("activity value '{0}' is not a number")]
    InvalidQuantity(String),
}

/// Trait for emission factor catalogs.
///
/// Implementations must be thread-safe (Send + Sync) so a pipeline can be
/// shared. Neither operation retries; a failure is reported as-is.
pub trait EmissionCatalog: Send + Sync {
    /// Search for factors matching `query`, best match first.
    fn search(&self, query: &SearchQuery) -> Result<Vec<EmissionFactor>, CatalogError>;

    /// Estimate emissions for `activity` using the factor `factor_id`.
    fn estimate(&self, factor_id: &str, activity: &Activity) -> Result<Estimate, CatalogError>;

    /// Get the name of this catalog (for logging/debugging).
    fn name(&self) -> &str;
}
