//! Planar geometry primitives used to validate parcel subdivisions.
//!
//! Coordinates are `(longitude, latitude)` pairs treated as flat `(x, y)`;
//! no datum or projection correction is applied anywhere in this crate.
//! Every function is pure and deterministic.

pub mod area;
pub mod error;
pub mod locate;
pub mod overlap;
pub mod raw;
pub mod ring;

pub use area::{multi_polygon_area, polygon_area, ring_area};
pub use error::GeometryError;
pub use locate::{locate, point_in_ring, point_in_ring_interior, Location};
pub use overlap::{covered_by, interiors_overlap, ring_contained_in, rings_overlap};
pub use raw::{to_multi_polygon, Position, RawGeometry};
pub use ring::{normalize_multi_polygon, normalize_ring, outer_rings, shells};
