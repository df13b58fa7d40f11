//! Candidate deduplication and best-match estimation.

use indexmap::IndexSet;

use crate::catalog::{Activity, Candidate, CatalogError, EmissionCatalog, Estimate};

/// Collapse candidates to unique (id, name) pairs, first occurrence wins.
pub fn dedup(candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates
        .into_iter()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Estimate emissions for `activity` against the best candidate.
///
/// The best candidate is the first one; catalog rank is not re-scored.
/// Returns `Ok(None)` without calling the catalog when there is no activity
/// or no candidate.
pub fn estimate_best(
    catalog: &dyn EmissionCatalog,
    candidates: &[Candidate],
    activity: Option<&Activity>,
) -> Result<Option<Estimate>, CatalogError> {
    let (Some(activity), Some(best)) = (activity, candidates.first()) else {
        return Ok(None);
    };

    catalog.estimate(&best.id, activity).map(Some)
}

/// Join candidate names for the `emission_factors` column.
pub fn join_names(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
