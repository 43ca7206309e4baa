//! Location resolver — orchestrates the fallback chain.
//!
//! Flow:  geocoder ("<capital>, <region>, <country>", first hit) → catalog fallback → None
//!
//! Geocoder errors are swallowed here. Callers only see presence or
//! absence, so "not found" and "service unreachable" look the same.

use super::providers::{DisabledGeocoder, Geocoder};
use super::types::{LocationError, LocationSource, ResolvedPoint};
use crate::catalog::Catalog;
use std::sync::Arc;

/// The location resolver with its two-tier pipeline.
pub struct LocationResolver {
    catalog: Arc<Catalog>,
    geocoder: Box<dyn Geocoder>,
}

impl LocationResolver {
    pub fn new(catalog: Arc<Catalog>, geocoder: Box<dyn Geocoder>) -> Self {
        Self { catalog, geocoder }
    }

    /// A resolver that never touches the network.
    pub fn offline(catalog: Arc<Catalog>) -> Self {
        Self::new(catalog, Box::new(DisabledGeocoder))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The geocoding query for a capital, qualified by region and country.
    pub fn query_for(&self, capital: &str) -> String {
        format!("{}, {}, {}", capital, self.catalog.region(), self.catalog.country())
    }

    /// Resolve a capital to a point, or `None` if it cannot be located.
    pub fn resolve(&self, capital: &str) -> Option<ResolvedPoint> {
        let query = self.query_for(capital);
        match self.geocoder.geocode(&query, 1) {
            Ok(hits) if !hits.is_empty() => {
                return Some(ResolvedPoint {
                    capital: capital.to_string(),
                    point: hits[0],
                    source: LocationSource::Geocoder,
                });
            }
            Ok(_) | Err(LocationError::NotFound(_)) => {
                log::debug!("geocoder: no results for '{}'", query)
            }
            Err(e) => log::debug!("geocoder failed for '{}': {}", query, e),
        }

        match self.catalog.fallback_of(capital) {
            Some(point) => Some(ResolvedPoint {
                capital: capital.to_string(),
                point,
                source: LocationSource::Fallback,
            }),
            None => {
                log::debug!("no fallback coordinate for '{}'", capital);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use std::sync::Mutex;

    enum Reply {
        Hits(Vec<GeoPoint>),
        Missing,
        Fail,
    }

    struct StubGeocoder {
        reply: Reply,
        queries: Arc<Mutex<Vec<String>>>,
    }

    impl Geocoder for StubGeocoder {
        fn geocode(&self, query: &str, _limit: usize) -> Result<Vec<GeoPoint>, LocationError> {
            self.queries.lock().unwrap().push(query.to_string());
            match &self.reply {
                Reply::Hits(h) => Ok(h.clone()),
                Reply::Missing => Err(LocationError::NotFound(query.to_string())),
                Reply::Fail => Err(LocationError::Network("connection refused".into())),
            }
        }
    }

    fn resolver_with(reply: Reply) -> (LocationResolver, Arc<Mutex<Vec<String>>>) {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let geocoder = StubGeocoder {
            reply,
            queries: Arc::clone(&queries),
        };
        let resolver = LocationResolver::new(Arc::new(Catalog::santa_cruz()), Box::new(geocoder));
        (resolver, queries)
    }

    #[test]
    fn test_remote_hit_wins() {
        let remote = GeoPoint::new(-17.70, -63.10);
        let (resolver, _) = resolver_with(Reply::Hits(vec![remote, GeoPoint::new(0.0, 0.0)]));
        let r = resolver.resolve("Santa Cruz de la Sierra").unwrap();
        assert_eq!(r.point, remote);
        assert_eq!(r.source, LocationSource::Geocoder);
    }

    #[test]
    fn test_query_format() {
        let (resolver, queries) = resolver_with(Reply::Hits(vec![]));
        resolver.resolve("Montero");
        assert_eq!(queries.lock().unwrap().as_slice(), ["Montero, Santa Cruz, Bolivia"]);
    }

    #[test]
    fn test_empty_result_falls_back() {
        let (resolver, _) = resolver_with(Reply::Hits(vec![]));
        let r = resolver.resolve("Comarapa").unwrap();
        assert_eq!(r.point, GeoPoint::new(-17.9, -64.5333));
        assert_eq!(r.source, LocationSource::Fallback);
    }

    #[test]
    fn test_failure_falls_back() {
        let (resolver, _) = resolver_with(Reply::Fail);
        let r = resolver.resolve("Santa Cruz de la Sierra").unwrap();
        assert_eq!(r.point, GeoPoint::new(-17.7833, -63.1821));
        assert_eq!(r.source, LocationSource::Fallback);
    }

    #[test]
    fn test_every_known_capital_resolves_when_geocoder_fails() {
        let (resolver, _) = resolver_with(Reply::Fail);
        let catalog = Catalog::santa_cruz();
        for p in catalog.provinces() {
            let capital = catalog.capital_of(p).unwrap();
            let r = resolver.resolve(capital).unwrap();
            assert_eq!(Some(r.point), catalog.fallback_of(capital));
        }
    }

    #[test]
    fn test_unknown_capital_without_remote_is_absent() {
        let (resolver, _) = resolver_with(Reply::Fail);
        assert!(resolver.resolve("Atlantis").is_none());
    }

    #[test]
    fn test_not_found_falls_back() {
        let (resolver, queries) = resolver_with(Reply::Missing);
        let r = resolver.resolve("Warnes").unwrap();
        assert_eq!(r.point, GeoPoint::new(-17.5089, -63.1659));
        assert_eq!(r.source, LocationSource::Fallback);
        assert_eq!(queries.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_offline_constructor() {
        let resolver = LocationResolver::offline(Arc::new(Catalog::santa_cruz()));
        assert_eq!(resolver.resolve("Samaipata").unwrap().point, GeoPoint::new(-18.1767, -63.8789));
    }
}
