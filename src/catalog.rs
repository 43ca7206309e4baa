//! Static province → capital → fallback coordinate catalog.
//!
//! The catalog is built once and never mutated. Lookups fail closed:
//! an unknown key yields `None`, never a panic.

use crate::geo::GeoPoint;
use serde::Serialize;
use std::collections::HashMap;

// ─── Built-in dataset ───────────────────────────────────────────

struct BuiltinProvince {
    name: &'static str,
    capital: &'static str,
    lat: f64,
    lon: f64,
}

/// Region and country appended to every geocoding query.
pub const SANTA_CRUZ_REGION: &str = "Santa Cruz";
pub const SANTA_CRUZ_COUNTRY: &str = "Bolivia";

/// The 15 provinces of the Santa Cruz department, in dropdown order.
/// Coordinates are approximate capital positions used when geocoding fails.
const SANTA_CRUZ_PROVINCES: &[BuiltinProvince] = &[
    BuiltinProvince { name: "Andrés Ibáñez", capital: "Santa Cruz de la Sierra", lat: -17.7833, lon: -63.1821 },
    BuiltinProvince { name: "Warnes", capital: "Warnes", lat: -17.5089, lon: -63.1659 },
    BuiltinProvince { name: "Ichilo", capital: "Buena Vista", lat: -17.4613, lon: -63.6621 },
    BuiltinProvince { name: "Sara", capital: "Portachuelo", lat: -17.3548, lon: -63.3923 },
    BuiltinProvince { name: "Obispo Santistevan", capital: "Montero", lat: -17.3390, lon: -63.2556 },
    BuiltinProvince { name: "Ñuflo de Chávez", capital: "Concepción", lat: -16.1400, lon: -62.0300 },
    BuiltinProvince { name: "Velasco", capital: "San Ignacio de Velasco", lat: -16.3700, lon: -60.9600 },
    BuiltinProvince { name: "Ángel Sandoval", capital: "San Matías", lat: -16.3667, lon: -58.4000 },
    BuiltinProvince { name: "Germán Busch", capital: "Puerto Suárez", lat: -18.9500, lon: -57.8000 },
    BuiltinProvince { name: "Chiquitos", capital: "San José de Chiquitos", lat: -17.8500, lon: -60.7500 },
    BuiltinProvince { name: "Guarayos", capital: "Ascensión de Guarayos", lat: -15.9333, lon: -63.2333 },
    BuiltinProvince { name: "Cordillera", capital: "Lagunillas", lat: -19.4333, lon: -63.6667 },
    BuiltinProvince { name: "Florida", capital: "Samaipata", lat: -18.1767, lon: -63.8789 },
    BuiltinProvince { name: "Vallegrande", capital: "Vallegrande", lat: -18.4896, lon: -64.1061 },
    BuiltinProvince { name: "Manuel María Caballero", capital: "Comarapa", lat: -17.9000, lon: -64.5333 },
];

/// A catalog row for listing (CLI `--list`, `GET /api/catalog`).
#[derive(Debug, Clone, Serialize)]
pub struct ProvinceInfo {
    pub province: String,
    pub capital: Option<String>,
    pub fallback: Option<GeoPoint>,
}

/// Immutable lookup tables for one region.
#[derive(Debug, Clone)]
pub struct Catalog {
    region: String,
    country: String,
    provinces: Vec<String>,
    capitals: HashMap<String, String>,
    fallbacks: HashMap<String, GeoPoint>,
}

impl Catalog {
    /// The reference catalog: Santa Cruz department, Bolivia.
    pub fn santa_cruz() -> Self {
        Self {
            region: SANTA_CRUZ_REGION.to_string(),
            country: SANTA_CRUZ_COUNTRY.to_string(),
            provinces: SANTA_CRUZ_PROVINCES.iter().map(|p| p.name.to_string()).collect(),
            capitals: SANTA_CRUZ_PROVINCES
                .iter()
                .map(|p| (p.name.to_string(), p.capital.to_string()))
                .collect(),
            fallbacks: SANTA_CRUZ_PROVINCES
                .iter()
                .map(|p| (p.capital.to_string(), GeoPoint::new(p.lat, p.lon)))
                .collect(),
        }
    }

    /// Build a catalog from explicit tables. Provinces keep the given order.
    /// Nothing forces `capitals` or `fallbacks` to be complete.
    pub fn from_tables(
        region: &str,
        country: &str,
        provinces: &[&str],
        capitals: &[(&str, &str)],
        fallbacks: &[(&str, GeoPoint)],
    ) -> Self {
        Self {
            region: region.to_string(),
            country: country.to_string(),
            provinces: provinces.iter().map(|p| p.to_string()).collect(),
            capitals: capitals
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
            fallbacks: fallbacks.iter().map(|(c, pt)| (c.to_string(), *pt)).collect(),
        }
    }

    /// Replace the region/country used to qualify geocoding queries.
    pub fn with_place(mut self, region: &str, country: &str) -> Self {
        self.region = region.to_string();
        self.country = country.to_string();
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Every known province, in catalog order.
    pub fn provinces(&self) -> &[String] {
        &self.provinces
    }

    pub fn capital_of(&self, province: &str) -> Option<&str> {
        self.capitals.get(province).map(String::as_str)
    }

    pub fn fallback_of(&self, capital: &str) -> Option<GeoPoint> {
        self.fallbacks.get(capital).copied()
    }

    /// Map user input to the catalog's spelling of a province.
    ///
    /// Exact match first, then a case- and accent-insensitive match,
    /// so "andres ibanez" finds "Andrés Ibáñez".
    pub fn canonical_province(&self, name: &str) -> Option<&str> {
        let trimmed = name.trim();
        if let Some(p) = self.provinces.iter().find(|p| p.as_str() == trimmed) {
            return Some(p.as_str());
        }
        let wanted = normalize_name(trimmed);
        self.provinces
            .iter()
            .find(|p| normalize_name(p) == wanted)
            .map(String::as_str)
    }

    /// Capitals referenced by the province table that lack a fallback point.
    /// Empty for a complete catalog.
    pub fn missing_fallbacks(&self) -> Vec<&str> {
        self.provinces
            .iter()
            .filter_map(|p| self.capital_of(p))
            .filter(|c| !self.fallbacks.contains_key(*c))
            .collect()
    }

    pub fn entries(&self) -> Vec<ProvinceInfo> {
        self.provinces
            .iter()
            .map(|p| {
                let capital = self.capital_of(p);
                ProvinceInfo {
                    province: p.clone(),
                    capital: capital.map(str::to_string),
                    fallback: capital.and_then(|c| self.fallback_of(c)),
                }
            })
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::santa_cruz()
    }
}

/// Lowercase, strip Spanish diacritics, collapse whitespace.
pub fn normalize_name(s: &str) -> String {
    s.to_lowercase()
        .replace('á', "a")
        .replace('é', "e")
        .replace('í', "i")
        .replace('ó', "o")
        .replace('ú', "u")
        .replace('ü', "u")
        .replace('ñ', "n")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
