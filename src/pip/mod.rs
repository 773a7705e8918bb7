//! Point-in-Polygon (PIP) country lookup.
//!
//! Resolves a map coordinate to the smallest enclosing country feature
//! using an R-tree over feature bounding boxes and ray casting.

pub mod geometry;
mod handle;
mod index;
mod resolver;

pub use handle::{error_chain, BorderHandle, BorderState};
pub use index::{CountrySpatialIndex, IndexedCountry};
pub use resolver::{resolve, PointResolver, Resolution};
