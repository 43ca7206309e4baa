//! Core types for the location subsystem.

use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a capital was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationSource {
    Geocoder,
    Fallback,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geocoder => write!(f, "Geocoder"),
            Self::Fallback => write!(f, "Built-in"),
        }
    }
}

/// A capital resolved to a point, with provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPoint {
    pub capital: String,
    pub point: GeoPoint,
    pub source: LocationSource,
}

/// Geocoder failures. These never cross the resolver boundary; they only
/// decide whether the fallback table is consulted.
#[derive(Debug)]
pub enum LocationError {
    Network(String),
    NotFound(String),
    InvalidResponse(String),
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::NotFound(q) => write!(f, "Location not found: '{}'", q),
            Self::InvalidResponse(msg) => write!(f, "Invalid API response: {}", msg),
        }
    }
}

impl std::error::Error for LocationError {}
