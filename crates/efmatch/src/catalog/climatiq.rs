//! Climatiq API catalog implementation.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{EfmatchError, Result};

use super::provider::{
    Activity, CatalogError, EmissionCatalog, EmissionFactor, Estimate, SearchQuery,
};

/// Default API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.climatiq.io";

/// Default data version selector.
const DEFAULT_DATA_VERSION: &str = "^21";

/// Units the estimate endpoint accepts, keyed by lowercase alias.
///
/// Each entry is (alias, parameter name, canonical unit).
const UNITS: &[(&str, &str, &str)] = &[
    // Money
    ("usd", "money", "usd"),
    ("eur", "money", "eur"),
    ("gbp", "money", "gbp"),
    ("cad", "money", "cad"),
    ("aud", "money", "aud"),
    ("chf", "money", "chf"),
    ("jpy", "money", "jpy"),
    ("cny", "money", "cny"),
    ("sek", "money", "sek"),
    ("nok", "money", "nok"),
    ("dkk", "money", "dkk"),
    ("inr", "money", "inr"),
    ("brl", "money", "brl"),
    // Weight
    ("g", "weight", "g"),
    ("kg", "weight", "kg"),
    ("t", "weight", "t"),
    ("tonne", "weight", "t"),
    ("lb", "weight", "lb"),
    ("ton", "weight", "ton"),
    // Energy
    ("wh", "energy", "Wh"),
    ("kwh", "energy", "kWh"),
    ("mwh", "energy", "MWh"),
    ("gwh", "energy", "GWh"),
    ("mj", "energy", "MJ"),
    ("gj", "energy", "GJ"),
    ("tj", "energy", "TJ"),
    ("btu", "energy", "BTU"),
    ("therm", "energy", "therm"),
    // Distance
    ("m", "distance", "m"),
    ("km", "distance", "km"),
    ("mi", "distance", "mi"),
    ("nmi", "distance", "nmi"),
    ("ft", "distance", "ft"),
    // Volume
    ("ml", "volume", "ml"),
    ("l", "volume", "l"),
    ("m3", "volume", "m3"),
    ("gallon_us", "volume", "gallon_us"),
    ("gallons_us", "volume", "gallons_us"),
];

/// Climatiq catalog client.
pub struct ClimatiqClient {
    client: Client,
    api_key: String,
    base_url: String,
    data_version: String,
}

impl ClimatiqClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| EfmatchError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(EfmatchError::MissingCredential(
                "Climatiq API key is empty".to_string(),
            ));
        }

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            data_version: DEFAULT_DATA_VERSION.to_string(),
        })
    }

    /// Create from environment variables.
    ///
    /// `CLIMATIQ_API_KEY` is required; `CLIMATIQ_BASE_URL` overrides the
    /// endpoint.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("CLIMATIQ_API_KEY").map_err(|_| {
            EfmatchError::MissingCredential(
                "CLIMATIQ_API_KEY environment variable not set".to_string(),
            )
        })?;

        let client = Self::new(api_key)?;
        Ok(match std::env::var("CLIMATIQ_BASE_URL") {
            Ok(url) => client.with_base_url(url),
            Err(_) => client,
        })
    }

    /// Point the client at a different endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Select a data version (e.g. "^21").
    pub fn with_data_version(mut self, data_version: impl Into<String>) -> Self {
        self.data_version = data_version.into();
        self
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> std::result::Result<HeaderMap, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| CatalogError::Request(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }

    /// Query string parameters for a search.
    fn search_params(&self, query: &SearchQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", query.query.clone()),
            ("data_version", self.data_version.clone()),
        ];
        if !query.sources.is_empty() {
            params.push(("source", query.sources.join(",")));
        }
        if !query.years.is_empty() {
            let years: Vec<String> = query.years.iter().map(|y| y.to_string()).collect();
            params.push(("year", years.join(",")));
        }
        if let Some(ref region) = query.region {
            params.push(("region", region.clone()));
        }
        params.push(("results_per_page", query.result_limit.to_string()));
        params
    }

    /// Request body for an estimate.
    fn estimate_body(
        &self,
        factor_id: &str,
        activity: &Activity,
    ) -> std::result::Result<Value, CatalogError> {
        let unit = activity.unit.trim();
        let (parameter, canonical) = classify_unit(unit)
            .ok_or_else(|| CatalogError::UnsupportedUnit(unit.to_string()))?;

        let amount = activity
            .value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CatalogError::InvalidQuantity(activity.value.clone()))?;

        let mut parameters = Map::new();
        parameters.insert(parameter.to_string(), json!(amount));
        parameters.insert(format!("{}_unit", parameter), json!(canonical));

        Ok(json!({
            "emission_factor": {
                "id": factor_id,
                "data_version": self.data_version
            },
            "parameters": parameters
        }))
    }

    /// Send a request and decode a successful JSON response.
    fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<T, CatalogError> {
        let response = request
            .headers(self.build_headers()?)
            .send()
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        response
            .json()
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

impl EmissionCatalog for ClimatiqClient {
    fn search(
        &self,
        query: &SearchQuery,
    ) -> std::result::Result<Vec<EmissionFactor>, CatalogError> {
        let url = format!("{}/data/v1/search", self.base_url);
        debug!(query = %query.query, region = ?query.region, "catalog search");

        let request = self.client.get(&url).query(&self.search_params(query));
        let response: SearchResponse = self.send(request)?;
        Ok(response.results)
    }

    fn estimate(
        &self,
        factor_id: &str,
        activity: &Activity,
    ) -> std::result::Result<Estimate, CatalogError> {
        let url = format!("{}/data/v1/estimate", self.base_url);
        let body = self.estimate_body(factor_id, activity)?;
        debug!(factor_id, "catalog estimate");

        let request = self.client.post(&url).json(&body);
        let response: EstimateResponse = self.send(request)?;
        Ok(Estimate::new(response.co2e, response.co2e_unit))
    }

    fn name(&self) -> &str {
        "climatiq"
    }
}

/// Look up the estimate parameter and canonical unit for a unit alias.
fn classify_unit(unit: &str) -> Option<(&'static str, &'static str)> {
    let lower = unit.to_lowercase();
    UNITS
        .iter()
        .find(|(alias, _, _)| *alias == lower)
        .map(|(_, parameter, canonical)| (*parameter, *canonical))
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            message: Some(message),
            ..
        }) => message,
        Ok(ErrorResponse {
            error: Some(error), ..
        }) => error,
        _ if body.trim().is_empty() => "no error details".to_string(),
        _ => body.trim().to_string(),
    }
}

/// Search endpoint response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<EmissionFactor>,
}

/// Estimate endpoint response.
#[derive(Debug, Deserialize)]
struct EstimateResponse {
    co2e: f64,
    co2e_unit: String,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}
