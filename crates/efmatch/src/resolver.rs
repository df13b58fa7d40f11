//! Turns an input record into catalog candidates.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{Candidate, CatalogError, EmissionCatalog, SearchQuery};
use crate::error::{EfmatchError, Result};
use crate::input::InputRecord;

/// Extra data sources to search when a record's region matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionFallback {
    /// Region name, matched case-insensitively.
    pub region: String,

    /// Sources added to the search for this region.
    pub sources: Vec<String>,
}

/// Search constraints applied to every lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverPolicy {
    /// Sources always searched.
    pub sources: Vec<String>,

    /// Publication years to accept.
    pub years: Vec<u16>,

    /// Maximum number of results per lookup.
    pub result_limit: usize,

    /// Region-specific source additions.
    pub region_fallbacks: Vec<RegionFallback>,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            sources: vec!["EXIOBASE".to_string()],
            years: vec![2019, 2020, 2021],
            result_limit: 10,
            region_fallbacks: vec![RegionFallback {
                region: "United States of America".to_string(),
                sources: vec!["USEEIO".to_string()],
            }],
        }
    }
}

impl ResolverPolicy {
    /// Load a policy from a JSON file. Omitted fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| EfmatchError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let policy: ResolverPolicy = serde_json::from_reader(BufReader::new(file))?;
        policy.check()?;
        Ok(policy)
    }

    /// Reject policies that cannot produce a meaningful search.
    pub fn check(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(EfmatchError::Config(
                "resolver policy must name at least one source".to_string(),
            ));
        }
        if self.result_limit == 0 {
            return Err(EfmatchError::Config(
                "resolver policy result_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Sources to search for `region`: the base set plus any fallback.
    pub fn sources_for(&self, region: Option<&str>) -> Vec<String> {
        let mut sources = self.sources.clone();

        let Some(region) = region else {
            return sources;
        };
        let region = region.to_lowercase();

        for fallback in &self.region_fallbacks {
            if fallback.region.to_lowercase() == region {
                for source in &fallback.sources {
                    if !sources.contains(source) {
                        sources.push(source.clone());
                    }
                }
            }
        }

        sources
    }
}

/// Resolves records against a catalog.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    policy: ResolverPolicy,
}

impl Resolver {
    pub fn new(policy: ResolverPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ResolverPolicy {
        &self.policy
    }

    /// Build the catalog query for `record`.
    pub fn query_for(&self, record: &InputRecord) -> SearchQuery {
        SearchQuery {
            query: record.name.clone(),
            region: record.region.clone(),
            sources: self.policy.sources_for(record.region.as_deref()),
            years: self.policy.years.clone(),
            result_limit: self.policy.result_limit,
        }
    }

    /// Look up candidates for `record`, in catalog rank order.
    pub fn resolve(
        &self,
        catalog: &dyn EmissionCatalog,
        record: &InputRecord,
    ) -> std::result::Result<Vec<Candidate>, CatalogError> {
        let query = self.query_for(record);
        let factors = catalog.search(&query)?;
        Ok(factors.iter().map(|f| f.to_candidate()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EmissionFactor, MockCatalog};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn policy_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn record(name: &str, region: Option<&str>) -> InputRecord {
        InputRecord {
            name: name.to_string(),
            region: region.map(|s| s.to_string()),
            activity: None,
        }
    }

    #[test]
    fn test_query_without_region() {
        let resolver = Resolver::default();
        let query = resolver.query_for(&record("Steel", None));

        assert_eq!(query.query, "Steel");
        assert_eq!(query.region, None);
        assert_eq!(query.sources, vec!["EXIOBASE"]);
        assert_eq!(query.years, vec![2019, 2020, 2021]);
        assert_eq!(query.result_limit, 10);
    }

    #[test]
    fn test_region_fallback_is_case_insensitive() {
        let resolver = Resolver::default();
        let query = resolver.query_for(&record("Steel", Some("united STATES of america")));

        assert_eq!(query.sources, vec!["EXIOBASE", "USEEIO"]);
        assert_eq!(query.region.as_deref(), Some("united STATES of america"));
    }

    #[test]
    fn test_other_region_has_no_fallback() {
        let resolver = Resolver::default();
        let query = resolver.query_for(&record("Steel", Some("France")));
        assert_eq!(query.sources, vec!["EXIOBASE"]);
    }

    #[test]
    fn test_fallback_does_not_duplicate_sources() {
        let policy = ResolverPolicy {
            sources: vec!["EXIOBASE".to_string(), "ADEME".to_string()],
            region_fallbacks: vec![RegionFallback {
                region: "France".to_string(),
                sources: vec!["ADEME".to_string(), "CITEPA".to_string()],
            }],
            ..Default::default()
        };

        assert_eq!(
            policy.sources_for(Some("france")),
            vec!["EXIOBASE", "ADEME", "CITEPA"]
        );
    }

    #[test]
    fn test_resolve_keeps_catalog_order() {
        let catalog = MockCatalog::new().with_factors(
            "Steel",
            vec![
                EmissionFactor::new("b", "Steel products"),
                EmissionFactor::new("a", "Basic iron and steel"),
            ],
        );

        let candidates = Resolver::default()
            .resolve(&catalog, &record("Steel", None))
            .unwrap();

        assert_eq!(
            candidates,
            vec![
                Candidate::new("b", "Steel products"),
                Candidate::new("a", "Basic iron and steel"),
            ]
        );
    }

    #[test]
    fn test_resolve_propagates_error() {
        let catalog = MockCatalog::new().with_search_error(
            "Steel",
            CatalogError::Api {
                status: 401,
                message: "invalid key".to_string(),
            },
        );

        let err = Resolver::default()
            .resolve(&catalog, &record("Steel", None))
            .unwrap_err();
        assert_eq!(err.to_string(), "catalog error (401): invalid key");
    }

    #[test]
    fn test_policy_partial_json_keeps_defaults() {
        let policy: ResolverPolicy = serde_json::from_str(r#"{"years": [2022]}"#).unwrap();

        assert_eq!(policy.years, vec![2022]);
        assert_eq!(policy.sources, vec!["EXIOBASE"]);
        assert_eq!(policy.region_fallbacks.len(), 1);
    }

    #[test]
    fn test_policy_check() {
        let policy = ResolverPolicy {
            result_limit: 0,
            ..Default::default()
        };
        assert!(policy.check().is_err());

        let policy = ResolverPolicy {
            sources: vec![],
            ..Default::default()
        };
        assert!(policy.check().is_err());
        assert!(ResolverPolicy::default().check().is_ok());
    }

    #[test]
    fn test_policy_load_from_file() {
        let file = policy_file(
            r#"{"sources": ["EXIOBASE"], "region_fallbacks": [{"region": "France", "sources": ["ADEME"]}]}"#,
        );

        let policy = ResolverPolicy::load(file.path()).unwrap();

        assert_eq!(policy.sources_for(Some("FRANCE")), vec!["EXIOBASE", "ADEME"]);
        assert_eq!(
            policy.sources_for(Some("United States of America")),
            vec!["EXIOBASE"]
        );
        assert_eq!(policy.result_limit, 10);
    }

    #[test]
    fn test_policy_load_runs_check() {
        let file = policy_file(r#"{"result_limit": 0}"#);

        let err = ResolverPolicy::load(file.path()).unwrap_err();
        assert!(matches!(err, EfmatchError::Config(_)));
    }

    #[test]
    fn test_policy_load_errors() {
        let err = ResolverPolicy::load("/nonexistent/policy.json").unwrap_err();
        assert!(matches!(err, EfmatchError::Io { .. }));

        let file = policy_file("{ not json");
        let err = ResolverPolicy::load(file.path()).unwrap_err();
        assert!(matches!(err, EfmatchError::Json(_)));
    }
}
