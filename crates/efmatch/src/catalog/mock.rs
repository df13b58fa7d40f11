//! In-memory catalog with scripted responses.

use std::collections::HashMap;
use std::sync::Mutex;

use super::provider::{
    Activity, CatalogError, EmissionCatalog, EmissionFactor, Estimate, SearchQuery,
};

/// Catalog that answers from scripted responses and records every call.
///
/// Searches are keyed by the lowercased query text; an unscripted query
/// finds nothing. Estimates are keyed by factor id; an unscripted id fails
/// with a 404.
#[derive(Default)]
pub struct MockCatalog {
    searches: HashMap<String, Result<Vec<EmissionFactor>, CatalogError>>,
    estimates: HashMap<String, Result<Estimate, CatalogError>>,
    search_log: Mutex<Vec<SearchQuery>>,
    estimate_log: Mutex<Vec<(String, Activity)>>,
}

impl MockCatalog {
    /// Create a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer searches for `query` with `factors`.
    pub fn with_factors(mut self, query: &str, factors: Vec<EmissionFactor>) -> Self {
        self.searches.insert(query.to_lowercase(), Ok(factors));
        self
    }

    /// Fail searches for `query` with `error`.
    pub fn with_search_error(mut self, query: &str, error: CatalogError) -> Self {
        self.searches.insert(query.to_lowercase(), Err(error));
        self
    }

    /// Answer estimates against `factor_id` with `estimate`.
    pub fn with_estimate(mut self, factor_id: &str, estimate: Estimate) -> Self {
        self.estimates.insert(factor_id.to_string(), Ok(estimate));
        self
    }

    /// Fail estimates against `factor_id` with `error`.
    pub fn with_estimate_error(mut self, factor_id: &str, error: CatalogError) -> Self {
        self.estimates.insert(factor_id.to_string(), Err(error));
        self
    }

    /// Every search received so far, in call order.
    pub fn searches(&self) -> Vec<SearchQuery> {
        self.search_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Every estimate received so far as (factor id, activity).
    pub fn estimates(&self) -> Vec<(String, Activity)> {
        self.estimate_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl EmissionCatalog for MockCatalog {
    fn search(&self, query: &SearchQuery) -> Result<Vec<EmissionFactor>, CatalogError> {
        self.search_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.clone());

        let mut results = self
            .searches
            .get(&query.query.to_lowercase())
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))?;
        results.truncate(query.result_limit);
        Ok(results)
    }

    fn estimate(&self, factor_id: &str, activity: &Activity) -> Result<Estimate, CatalogError> {
        self.estimate_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((factor_id.to_string(), activity.clone()));

        self.estimates
            .get(factor_id)
            .cloned()
            .unwrap_or_else(|| {
                Err(CatalogError::Api {
                    status: 404,
                    message: format!("emission factor '{}' not found", factor_id),
                })
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(text: &str, limit: usize) -> SearchQuery {
        SearchQuery {
            query: text.to_string(),
            region: None,
            sources: vec![],
            years: vec![],
            result_limit: limit,
        }
    }

    #[test]
    fn test_mock_search_is_case_insensitive() {
        let catalog =
            MockCatalog::new().with_factors("Steel", vec![EmissionFactor::new("ef-1", "Steel")]);

        let results = catalog.search(&query("STEEL", 10)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(catalog.searches().len(), 1);
    }

    #[test]
    fn test_mock_search_respects_limit() {
        let factors = (0..5)
            .map(|i| EmissionFactor::new(format!("ef-{}", i), "Steel"))
            .collect();
        let catalog = MockCatalog::new().with_factors("steel", factors);

        assert_eq!(catalog.search(&query("steel", 2)).unwrap().len(), 2);
    }

    #[test]
    fn test_mock_unscripted_search_is_empty() {
        let catalog = MockCatalog::new();
        assert!(catalog.search(&query("anything", 10)).unwrap().is_empty());
    }

    #[test]
    fn test_mock_unscripted_estimate_fails() {
        let catalog = MockCatalog::new();
        let err = catalog
            .estimate("ef-9", &Activity::new("1", "kg"))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "catalog error (404): emission factor 'ef-9' not found"
        );
        assert_eq!(catalog.estimates()[0].0, "ef-9");
    }
}
