//! IO module for format-specific reading and writing operations.
//!
//! - `geojson` - GeoJSON documents for parent parcels and subdivision sets,
//!   plus serde adapters that store `geo` geometries as GeoJSON geometry objects

pub mod geojson;
