use province_polygons::catalog::Catalog;
use province_polygons::controller::{MapController, Notice};
use province_polygons::geo::GeoPoint;
use province_polygons::location::{Geocoder, LocationError, LocationResolver, LocationSource};
use province_polygons::map::GeoJsonSurface;
use province_polygons::session::{SelectionError, SelectionSession};
use std::sync::Arc;

/// Answers with nothing, as a geocoder with no coverage would.
struct EmptyGeocoder;

impl Geocoder for EmptyGeocoder {
    fn geocode(&self, _query: &str, _limit: usize) -> Result<Vec<GeoPoint>, LocationError> {
        Ok(Vec::new())
    }
}

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::santa_cruz())
}

#[test]
fn test_andres_ibanez_offline_end_to_end() {
    let mut session = SelectionSession::new(LocationResolver::offline(catalog()));
    let sel = session.add("Andrés Ibáñez").unwrap();
    assert_eq!(sel.capital, "Santa Cruz de la Sierra");
    assert_eq!(sel.source, LocationSource::Fallback);
    assert_eq!(session.points(), &[GeoPoint::new(-17.7833, -63.1821)]);
}

#[test]
fn test_empty_geocoder_still_resolves_every_province() {
    let resolver = LocationResolver::new(catalog(), Box::new(EmptyGeocoder));
    let mut session = SelectionSession::new(resolver);
    let provinces = session.catalog().provinces().to_vec();
    for p in &provinces {
        session.add(p).unwrap();
    }
    assert_eq!(session.points().len(), 15);
    assert!(session.available().is_empty());
    assert_eq!(session.add(&provinces[0]), Err(SelectionError::SelectionExhausted));

    session.reset();
    assert_eq!(session.available(), catalog().provinces());
    assert!(session.points().is_empty());
    assert!(session.selected().is_empty());
}

#[test]
fn test_full_region_polygon_geojson() {
    let mut controller = MapController::new(
        SelectionSession::new(LocationResolver::offline(catalog())),
        GeoJsonSurface::new(),
    );
    controller.on_map_ready();

    assert!(matches!(
        controller.generate_polygon(),
        Err(SelectionError::InsufficientPoints { have: 0 })
    ));

    for p in ["Germán Busch", "Cordillera", "Guarayos", "Manuel María Caballero", "Velasco"] {
        controller.add_selected(p).unwrap();
    }
    let Notice::PolygonDrawn { vertices } = controller.generate_polygon().unwrap() else {
        panic!("expected a polygon");
    };
    assert_eq!(vertices.len(), 5);

    let geojson = controller.surface().to_geojson();
    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 6);
    assert_eq!(features[5]["geometry"]["type"], "Polygon");
    assert_eq!(features[0]["properties"]["title"], "Puerto Suárez (Germán Busch)");
    assert_eq!(geojson["camera"]["zoom"], 6.8f32 as f64);
}
