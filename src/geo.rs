//! Geographic point value type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// GeoJSON position order: `[lon, lat]`.
    pub fn to_position(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_coords(self.lat, self.lon))
    }
}

/// Format coordinates with hemisphere suffixes, e.g. "17.7833°S, 63.1821°W".
pub fn format_coords(lat: f64, lon: f64) -> String {
    let lat_dir = if lat >= 0.0 { 'N' } else { 'S' };
    let lon_dir = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", lat.abs(), lat_dir, lon.abs(), lon_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coords_southern_western() {
        assert_eq!(format_coords(-17.7833, -63.1821), "17.7833°S, 63.1821°W");
    }

    #[test]
    fn test_format_coords_northern_eastern() {
        assert_eq!(format_coords(59.3293, 18.0686), "59.3293°N, 18.0686°E");
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(GeoPoint::new(-17.5089, -63.1659), GeoPoint::new(-17.5089, -63.1659));
        assert_ne!(GeoPoint::new(-17.5089, -63.1659), GeoPoint::new(-17.5089, -63.1658));
    }

    #[test]
    fn test_position_is_lon_lat() {
        assert_eq!(GeoPoint::new(1.0, 2.0).to_position(), [2.0, 1.0]);
    }
}
