//! Province selection state machine.
//!
//! Per province: `Available → Selected` or `Available → Rejected`. Both are
//! terminal until [`SelectionSession::reset`]. A rejected province (no
//! capital, or capital unlocatable) leaves the available list so the UI
//! cannot retry it forever.

use crate::catalog::Catalog;
use crate::geo::GeoPoint;
use crate::location::{LocationResolver, LocationSource};
use crate::polygon::Polygon;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Why an action did nothing. None of these end the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// The name matches no catalog province.
    UnknownProvince(String),
    /// Already selected or rejected earlier in this session.
    DuplicateSelection(String),
    SelectionExhausted,
    CapitalNotFound(String),
    LocationUnresolvable { province: String, capital: String },
    InsufficientPoints { have: usize },
}

impl SelectionError {
    /// Stable machine-readable name, used in API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownProvince(_) => "unknown_province",
            Self::DuplicateSelection(_) => "duplicate_selection",
            Self::SelectionExhausted => "selection_exhausted",
            Self::CapitalNotFound(_) => "capital_not_found",
            Self::LocationUnresolvable { .. } => "location_unresolvable",
            Self::InsufficientPoints { .. } => "insufficient_points",
        }
    }
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProvince(name) => write!(f, "Unknown province '{}'", name),
            Self::DuplicateSelection(p) => write!(f, "{} was already added", p),
            Self::SelectionExhausted => write!(f, "No more provinces available"),
            Self::CapitalNotFound(p) => write!(f, "No capital found for {}", p),
            Self::LocationUnresolvable { capital, .. } => write!(f, "Could not locate {}", capital),
            Self::InsufficientPoints { have } => write!(
                f,
                "Add at least 3 provinces to form a polygon (have {})",
                have
            ),
        }
    }
}

impl std::error::Error for SelectionError {}

/// Lifecycle state of one province within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvinceState {
    Available,
    Selected,
    Rejected,
}

/// A successful `add`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub province: String,
    pub capital: String,
    pub point: GeoPoint,
    pub source: LocationSource,
    /// Provinces still selectable after this one.
    pub remaining: usize,
}

impl Selection {
    /// True when this addition consumed the last available province.
    pub fn all_added(&self) -> bool {
        self.remaining == 0
    }
}

/// Mutable selection state for one user session.
///
/// Not safe for concurrent mutation; callers serialise access
/// (`&mut self` here, a `Mutex` in the server).
pub struct SelectionSession {
    resolver: LocationResolver,
    selected: HashSet<String>,
    /// Province for each entry of `points`, same index.
    order: Vec<String>,
    points: Vec<GeoPoint>,
    available: Vec<String>,
}

impl SelectionSession {
    pub fn new(resolver: LocationResolver) -> Self {
        let available = resolver.catalog().provinces().to_vec();
        Self {
            resolver,
            selected: HashSet::new(),
            order: Vec::new(),
            points: Vec::new(),
            available,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.resolver.catalog()
    }

    /// Resolved points in the order provinces were added.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Selected provinces in the order they were added.
    pub fn selected(&self) -> &[String] {
        &self.order
    }

    /// Provinces still selectable, in catalog order.
    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn is_exhausted(&self) -> bool {
        self.available.is_empty()
    }

    /// `None` for a name the catalog does not know.
    pub fn state_of(&self, province: &str) -> Option<ProvinceState> {
        let province = self.catalog().canonical_province(province)?;
        Some(if self.selected.contains(province) {
            ProvinceState::Selected
        } else if self.available.iter().any(|p| p == province) {
            ProvinceState::Available
        } else {
            ProvinceState::Rejected
        })
    }

    /// Add a province: resolve its capital and record the point.
    pub fn add(&mut self, name: &str) -> Result<Selection, SelectionError> {
        if self.available.is_empty() {
            return Err(SelectionError::SelectionExhausted);
        }

        let province = self
            .catalog()
            .canonical_province(name)
            .map(str::to_string)
            .ok_or_else(|| SelectionError::UnknownProvince(name.trim().to_string()))?;

        if !self.available.contains(&province) {
            self.remove_available(&province);
            return Err(SelectionError::DuplicateSelection(province));
        }

        let Some(capital) = self.catalog().capital_of(&province).map(str::to_string) else {
            log::warn!("rejecting {}: no capital in catalog", province);
            self.remove_available(&province);
            return Err(SelectionError::CapitalNotFound(province));
        };

        let Some(resolved) = self.resolver.resolve(&capital) else {
            log::warn!("rejecting {}: {} could not be located", province, capital);
            self.remove_available(&province);
            return Err(SelectionError::LocationUnresolvable { province, capital });
        };

        self.points.push(resolved.point);
        self.order.push(province.clone());
        self.selected.insert(province.clone());
        self.remove_available(&province);

        log::info!(
            "added {} ({}) at {} via {}; {} remaining",
            province,
            capital,
            resolved.point,
            resolved.source,
            self.available.len()
        );

        Ok(Selection {
            province,
            capital,
            point: resolved.point,
            source: resolved.source,
            remaining: self.available.len(),
        })
    }

    /// Order the current points into a polygon.
    pub fn polygon(&self) -> Result<Polygon, SelectionError> {
        Polygon::from_points(&self.points)
    }

    /// Back to the initial state: nothing selected, every province available.
    pub fn reset(&mut self) {
        self.selected.clear();
        self.order.clear();
        self.points.clear();
        self.available = self.resolver.catalog().provinces().to_vec();
        log::info!("session reset; {} provinces available", self.available.len());
    }

    fn remove_available(&mut self, province: &str) {
        self.available.retain(|p| p != province);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{Geocoder, LocationError};
    use std::sync::Arc;

    fn offline_session() -> SelectionSession {
        SelectionSession::new(LocationResolver::offline(Arc::new(Catalog::santa_cruz())))
    }

    /// Two provinces: "Lost" has no capital, "Hidden" has a capital with no fallback.
    fn broken_session() -> SelectionSession {
        let catalog = Catalog::from_tables(
            "Santa Cruz",
            "Bolivia",
            &["Warnes", "Lost", "Hidden"],
            &[("Warnes", "Warnes"), ("Hidden", "Nowhere")],
            &[("Warnes", GeoPoint::new(-17.5089, -63.1659))],
        );
        SelectionSession::new(LocationResolver::offline(Arc::new(catalog)))
    }

    struct FixedGeocoder(GeoPoint);

    impl Geocoder for FixedGeocoder {
        fn geocode(&self, _query: &str, _limit: usize) -> Result<Vec<GeoPoint>, LocationError> {
            Ok(vec![self.0])
        }
    }

    #[test]
    fn test_add_uses_fallback_offline() {
        let mut session = offline_session();
        let sel = session.add("Andrés Ibáñez").unwrap();
        assert_eq!(sel.capital, "Santa Cruz de la Sierra");
        assert_eq!(sel.point, GeoPoint::new(-17.7833, -63.1821));
        assert_eq!(sel.source, LocationSource::Fallback);
        assert_eq!(sel.remaining, 14);
        assert_eq!(session.points(), &[GeoPoint::new(-17.7833, -63.1821)]);
    }

    #[test]
    fn test_add_uses_geocoder_when_online() {
        let remote = GeoPoint::new(-17.5, -63.2);
        let resolver = LocationResolver::new(
            Arc::new(Catalog::santa_cruz()),
            Box::new(FixedGeocoder(remote)),
        );
        let mut session = SelectionSession::new(resolver);
        let sel = session.add("Warnes").unwrap();
        assert_eq!(sel.point, remote);
        assert_eq!(sel.source, LocationSource::Geocoder);
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut session = offline_session();
        session.add("Warnes").unwrap();
        let second = session.add("Warnes");
        assert_eq!(second, Err(SelectionError::DuplicateSelection("Warnes".into())));
        assert_eq!(session.points().len(), 1);
        assert_eq!(session.available().len(), 14);
    }

    #[test]
    fn test_accent_insensitive_duplicate() {
        let mut session = offline_session();
        session.add("Ñuflo de Chávez").unwrap();
        assert_eq!(
            session.add("nuflo de chavez"),
            Err(SelectionError::DuplicateSelection("Ñuflo de Chávez".into()))
        );
    }

    #[test]
    fn test_unknown_province() {
        let mut session = offline_session();
        assert_eq!(
            session.add("  Atlantis "),
            Err(SelectionError::UnknownProvince("Atlantis".into()))
        );
        assert_eq!(session.available().len(), 15);
    }

    #[test]
    fn test_exhaustion() {
        let mut session = offline_session();
        let provinces = session.catalog().provinces().to_vec();
        let mut last = None;
        for p in &provinces {
            last = Some(session.add(p).unwrap());
        }
        assert!(last.unwrap().all_added());
        assert!(session.is_exhausted());
        assert_eq!(session.points().len(), 15);
        assert_eq!(session.add("Warnes"), Err(SelectionError::SelectionExhausted));
        assert_eq!(session.add("Atlantis"), Err(SelectionError::SelectionExhausted));
    }

    #[test]
    fn test_missing_capital_rejects_province() {
        let mut session = broken_session();
        assert_eq!(session.add("Lost"), Err(SelectionError::CapitalNotFound("Lost".into())));
        assert_eq!(session.state_of("Lost"), Some(ProvinceState::Rejected));
        assert!(!session.available().contains(&"Lost".to_string()));
        // retrying a rejected province reports a duplicate
        assert_eq!(session.add("Lost"), Err(SelectionError::DuplicateSelection("Lost".into())));
    }

    #[test]
    fn test_unlocatable_capital_rejects_province() {
        let mut session = broken_session();
        assert_eq!(
            session.add("Hidden"),
            Err(SelectionError::LocationUnresolvable {
                province: "Hidden".into(),
                capital: "Nowhere".into(),
            })
        );
        assert_eq!(session.state_of("Hidden"), Some(ProvinceState::Rejected));
        assert!(session.points().is_empty());
    }

    #[test]
    fn test_rejection_counts_toward_exhaustion() {
        let mut session = broken_session();
        let _ = session.add("Lost");
        let _ = session.add("Hidden");
        let sel = session.add("Warnes").unwrap();
        assert!(sel.all_added());
        assert_eq!(session.add("Warnes"), Err(SelectionError::SelectionExhausted));
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut session = broken_session();
        let _ = session.add("Lost");
        session.add("Warnes").unwrap();
        session.reset();
        assert_eq!(session.available(), &["Warnes", "Lost", "Hidden"]);
        assert!(session.points().is_empty());
        assert!(session.selected().is_empty());
        assert_eq!(session.state_of("Warnes"), Some(ProvinceState::Available));
        assert_eq!(session.state_of("Lost"), Some(ProvinceState::Available));
    }

    #[test]
    fn test_available_keeps_catalog_order() {
        let mut session = offline_session();
        session.add("Sara").unwrap();
        let expected: Vec<String> = Catalog::santa_cruz()
            .provinces()
            .iter()
            .filter(|p| p.as_str() != "Sara")
            .cloned()
            .collect();
        assert_eq!(session.available(), expected.as_slice());
    }

    #[test]
    fn test_selected_tracks_add_order() {
        let mut session = offline_session();
        session.add("Florida").unwrap();
        session.add("Warnes").unwrap();
        assert_eq!(session.selected(), &["Florida", "Warnes"]);
        assert_eq!(session.points()[0], GeoPoint::new(-18.1767, -63.8789));
    }

    #[test]
    fn test_polygon_requires_three_points() {
        let mut session = offline_session();
        assert_eq!(session.polygon(), Err(SelectionError::InsufficientPoints { have: 0 }));
        session.add("Warnes").unwrap();
        session.add("Sara").unwrap();
        assert_eq!(session.polygon(), Err(SelectionError::InsufficientPoints { have: 2 }));
        session.add("Velasco").unwrap();
        assert_eq!(session.polygon().unwrap().len(), 3);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(SelectionError::SelectionExhausted.to_string(), "No more provinces available");
        assert_eq!(
            SelectionError::DuplicateSelection("Sara".into()).to_string(),
            "Sara was already added"
        );
        assert_eq!(SelectionError::InsufficientPoints { have: 1 }.kind(), "insufficient_points");
    }
}
