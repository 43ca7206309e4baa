//! Capital → coordinate resolution.
//!
//! A remote geocoder is tried first; any failure or empty answer falls
//! back to the catalog's built-in coordinate.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{DisabledGeocoder, Geocoder, NominatimGeocoder};
pub use resolver::LocationResolver;
pub use types::{LocationError, LocationSource, ResolvedPoint};
