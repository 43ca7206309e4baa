//! Province polygons: pick provinces of a region, resolve each to its
//! capital's coordinates, and connect the chosen points into a polygon.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod geo;
pub mod location;
pub mod logging;
pub mod map;
pub mod polygon;
pub mod server;
pub mod session;

pub use catalog::Catalog;
pub use controller::{MapController, Notice};
pub use geo::GeoPoint;
pub use polygon::{order_by_centroid_angle, Polygon};
pub use session::{Selection, SelectionError, SelectionSession};
