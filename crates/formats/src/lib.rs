pub mod zones_geojson;

pub use zones_geojson::*;
