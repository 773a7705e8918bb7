//! Point resolver: map a clicked coordinate to its country.

use std::sync::Arc;

use geo_types::Coord;
use tracing::debug;

use super::geometry::feature_contains;
use super::index::CountrySpatialIndex;
use crate::models::{Coordinate, CountryFeature};
use crate::BorderDataset;

/// Outcome of resolving one coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// Most specific enclosing feature
    Match(&'a CountryFeature),
    /// No polygon contains the point, e.g. an ocean click
    NoMatch,
    /// The dataset has not been loaded
    NotReady,
}

impl<'a> Resolution<'a> {
    pub fn feature(&self) -> Option<&'a CountryFeature> {
        match *self {
            Resolution::Match(feature) => Some(feature),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&'a str> {
        self.feature().map(|f| f.code.as_str())
    }
}

/// Point-in-polygon resolver over an immutable dataset.
///
/// Candidates are tried smallest bounding box first so that enclaves and
/// small neighbours win over the larger feature around them. This is an
/// approximation of true polygon nesting, not an exact containment order.
pub struct PointResolver {
    dataset: Arc<BorderDataset>,
    index: CountrySpatialIndex,
}

impl PointResolver {
    pub fn new(dataset: Arc<BorderDataset>) -> Self {
        let index = CountrySpatialIndex::build(&dataset);
        Self { dataset, index }
    }

    pub fn dataset(&self) -> &Arc<BorderDataset> {
        &self.dataset
    }

    /// Number of features that can be matched
    pub fn matchable(&self) -> usize {
        self.index.len()
    }

    /// Resolve a coordinate to the smallest enclosing feature
    pub fn resolve(&self, coord: Coordinate) -> Resolution<'_> {
        let point: Coord<f64> = coord.into();

        for candidate in self.index.candidates(coord) {
            let Some(feature) = self.dataset.get(candidate.ordinal) else {
                continue;
            };

            match feature_contains(feature, point) {
                Ok(true) => {
                    debug!(
                        "Resolved ({}, {}) to {} ({})",
                        coord.lng, coord.lat, feature.code, feature.name
                    );
                    return Resolution::Match(feature);
                }
                Ok(false) => {}
                Err(e) => debug!("Skipping feature during resolution: {}", e),
            }
        }

        debug!("No country at ({}, {})", coord.lng, coord.lat);
        Resolution::NoMatch
    }
}

/// Resolve against an optional resolver; `None` means the dataset is not loaded yet.
pub fn resolve(resolver: Option<&PointResolver>, coord: Coordinate) -> Resolution<'_> {
    match resolver {
        Some(resolver) => resolver.resolve(coord),
        None => {
            debug!(
                "Border dataset not ready, ignoring ({}, {})",
                coord.lng, coord.lat
            );
            Resolution::NotReady
        }
    }
}
