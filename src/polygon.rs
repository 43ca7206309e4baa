//! Star-shaped polygon ordering around the centroid.
//!
//! Points are sorted by the angle `atan2(Δlon, Δlat)` measured from the
//! arithmetic centroid. The argument order (longitude delta first) is fixed;
//! swapping it flips the winding. This is not a convex hull: it only
//! reorders the given points, and strongly concave sets can still
//! self-intersect.

use crate::geo::GeoPoint;
use crate::session::SelectionError;
use serde::Serialize;

/// Fewest vertices that make a polygon.
pub const MIN_VERTICES: usize = 3;

/// Arithmetic mean of latitudes and longitudes. `None` for an empty slice.
///
/// Summed in a fixed coordinate order, so any permutation of the same
/// points yields a bit-identical centroid.
pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }
    let mut canonical = points.to_vec();
    canonical.sort_by(|a, b| a.lat.total_cmp(&b.lat).then(a.lon.total_cmp(&b.lon)));
    let (sx, sy) = canonical
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.lat, sy + p.lon));
    let n = points.len() as f64;
    Some(GeoPoint::new(sx / n, sy / n))
}

/// Reorder `points` by angle around their centroid, ascending.
///
/// Equal angles keep their input order. The input is not modified.
/// Meaningful only for `MIN_VERTICES` or more points; go through
/// [`Polygon::from_points`] to get that check.
pub fn order_by_centroid_angle(points: &[GeoPoint]) -> Vec<GeoPoint> {
    let Some(c) = centroid(points) else {
        return Vec::new();
    };
    let mut keyed: Vec<(f64, GeoPoint)> = points
        .iter()
        .map(|p| ((p.lon - c.lon).atan2(p.lat - c.lat), *p))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// A closed ring of at least three vertices; the last connects to the first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    vertices: Vec<GeoPoint>,
}

impl Polygon {
    /// Order `points` into a ring, or fail with `InsufficientPoints`.
    pub fn from_points(points: &[GeoPoint]) -> Result<Self, SelectionError> {
        if points.len() < MIN_VERTICES {
            return Err(SelectionError::InsufficientPoints { have: points.len() });
        }
        Ok(Self {
            vertices: order_by_centroid_angle(points),
        })
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges `(v[i], v[i+1])`, including the closing edge back to `v[0]`.
    pub fn edges(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Vertices with the first repeated at the end (GeoJSON ring form).
    pub fn closed_ring(&self) -> Vec<GeoPoint> {
        let mut ring = self.vertices.clone();
        if let Some(first) = self.vertices.first() {
            ring.push(*first);
        }
        ring
    }

    /// True when no two non-adjacent edges properly cross.
    pub fn is_simple(&self) -> bool {
        let edges: Vec<_> = self.edges().collect();
        let n = edges.len();
        for i in 0..n {
            for j in (i + 2)..n {
                // first and last edge share vertex 0
                if i == 0 && j == n - 1 {
                    continue;
                }
                let (a1, a2) = edges[i];
                let (b1, b2) = edges[j];
                if segments_cross(a1, a2, b1, b2) {
                    return false;
                }
            }
        }
        true
    }
}

fn orient(a: GeoPoint, b: GeoPoint, c: GeoPoint) -> f64 {
    (b.lat - a.lat) * (c.lon - a.lon) - (b.lon - a.lon) * (c.lat - a.lat)
}

/// Proper crossing of segments `a1a2` and `b1b2` (touching does not count).
pub fn segments_cross(a1: GeoPoint, a2: GeoPoint, b1: GeoPoint, b2: GeoPoint) -> bool {
    let d1 = orient(a1, a2, b1);
    let d2 = orient(a1, a2, b2);
    let d3 = orient(b1, b2, a1);
    let d4 = orient(b1, b2, a2);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}
