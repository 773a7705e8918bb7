//! Gazetteer - country border lookup for map clicks
//!
//! This library provides the border dataset loader, the point-to-country
//! resolver and the shared types used by the `serve` and `lookup` binaries.

pub mod borders;
pub mod config;
pub mod error;
pub mod models;
pub mod pip;

pub use borders::{BorderDataset, CodeOverrides, DatasetSource};
pub use error::{BorderError, FeatureGeometryError};
pub use models::{BorderGeometry, Coordinate, CountryFeature, CountrySummary};
pub use pip::{BorderHandle, PointResolver, Resolution};
