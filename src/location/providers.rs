//! Geocoding providers: OpenStreetMap Nominatim and a disabled stand-in.

use super::types::LocationError;
use crate::config::Config;
use crate::geo::GeoPoint;
use serde::Deserialize;
use std::time::Duration;

/// Forward geocoding: free-form query → candidate points, best first.
///
/// "Nothing matched" is `Err(LocationError::NotFound)`; an empty `Ok` list
/// is accepted and treated the same way by the resolver.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, query: &str, limit: usize) -> Result<Vec<GeoPoint>, LocationError>;
}

// ─── Nominatim provider ─────────────────────────────────────────

pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = "ProvincePolygons/0.3 (province-polygon-engine)";

#[derive(Deserialize, Debug, Clone)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimResult {
    fn to_point(&self) -> Result<GeoPoint, LocationError> {
        let lat: f64 = self
            .lat
            .parse()
            .map_err(|_| LocationError::InvalidResponse(format!("bad latitude '{}'", self.lat)))?;
        let lon: f64 = self
            .lon
            .parse()
            .map_err(|_| LocationError::InvalidResponse(format!("bad longitude '{}'", self.lon)))?;
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(LocationError::InvalidResponse(format!("latitude out of range: {}", self.lat)));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(LocationError::InvalidResponse(format!("longitude out of range: {}", self.lon)));
        }
        Ok(GeoPoint::new(lat, lon))
    }
}

/// Parsed search response → points. An empty array is `NotFound`.
fn points_from(query: &str, results: &[NominatimResult]) -> Result<Vec<GeoPoint>, LocationError> {
    match results.first() {
        Some(first) => log::debug!(
            "nominatim '{}' -> {}",
            query,
            first.display_name.as_deref().unwrap_or("(unnamed)")
        ),
        None => return Err(LocationError::NotFound(query.to_string())),
    }
    results.iter().map(NominatimResult::to_point).collect()
}

/// Blocking Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    endpoint: String,
    user_agent: String,
    timeout: Duration,
}

impl NominatimGeocoder {
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            user_agent: user_agent.to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.geocoder_url,
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new(NOMINATIM_SEARCH_URL, DEFAULT_USER_AGENT, Duration::from_secs(5))
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str, limit: usize) -> Result<Vec<GeoPoint>, LocationError> {
        let response = ureq::get(&self.endpoint)
            .set("User-Agent", &self.user_agent)
            .timeout(self.timeout)
            .query("q", query)
            .query("format", "json")
            .query("limit", &limit.max(1).to_string())
            .query("addressdetails", "0")
            .call()
            .map_err(|e| LocationError::Network(e.to_string()))?;

        let results: Vec<NominatimResult> = response
            .into_json()
            .map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

        points_from(query, &results)
    }
}

// ─── Offline stand-in ───────────────────────────────────────────

/// A geocoder that always fails, forcing the built-in fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeocoder;

impl Geocoder for DisabledGeocoder {
    fn geocode(&self, _query: &str, _limit: usize) -> Result<Vec<GeoPoint>, LocationError> {
        Err(LocationError::Network("geocoding disabled".into()))
    }
}
