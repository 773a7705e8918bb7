//! Spatial index for fast country candidate lookups.

use rayon::prelude::*;
use rstar::{RTree, RTreeObject, AABB};
use tracing::{info, warn};

use super::geometry::{bbox_area, bounding_rect};
use crate::error::FeatureGeometryError;
use crate::models::{Coordinate, CountryFeature};
use crate::BorderDataset;

/// Matchable feature keyed by its bounding box
#[derive(Debug, Clone)]
pub struct IndexedCountry {
    /// Position of the feature in the dataset
    pub ordinal: usize,
    /// Bounding-box area in square degrees
    pub area: f64,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedCountry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedCountry {
    fn new(feature: &CountryFeature) -> Result<Self, FeatureGeometryError> {
        let rect = bounding_rect(&feature.geometry).ok_or_else(|| {
            FeatureGeometryError::NoCoordinates {
                ordinal: feature.ordinal,
                code: feature.code.clone(),
            }
        })?;

        Ok(Self {
            ordinal: feature.ordinal,
            area: bbox_area(&rect),
            envelope: AABB::from_corners(
                [rect.min().x, rect.min().y],
                [rect.max().x, rect.max().y],
            ),
        })
    }
}

/// R-tree over the assigned features of a dataset.
///
/// Sentinel-coded features stay in the dataset but are never indexed.
pub struct CountrySpatialIndex {
    tree: RTree<IndexedCountry>,
}

impl CountrySpatialIndex {
    /// Build spatial index from a border dataset
    pub fn build(dataset: &BorderDataset) -> Self {
        info!("Building spatial index for {} features...", dataset.len());

        let results: Vec<Result<IndexedCountry, FeatureGeometryError>> = dataset
            .features()
            .par_iter()
            .filter(|f| f.is_assigned())
            .map(IndexedCountry::new)
            .collect();

        let mut indexed = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(entry) => indexed.push(entry),
                Err(e) => warn!("Excluding feature from index: {}", e),
            }
        }

        let unassigned = dataset.iter().filter(|f| !f.is_assigned()).count();
        let tree = RTree::bulk_load(indexed);

        info!(
            "Spatial index built with {} entries ({} unassigned features excluded)",
            tree.size(),
            unassigned
        );

        Self { tree }
    }

    /// Features whose bounding box contains the point, smallest area first.
    ///
    /// Equal areas keep dataset order.
    pub fn candidates(&self, coord: Coordinate) -> Vec<&IndexedCountry> {
        let query_envelope = AABB::from_point([coord.lng, coord.lat]);

        let mut candidates: Vec<&IndexedCountry> = self
            .tree
            .locate_in_envelope_intersecting(&query_envelope)
            .collect();

        candidates.sort_by(|a, b| {
            a.area
                .total_cmp(&b.area)
                .then_with(|| a.ordinal.cmp(&b.ordinal))
        });

        candidates
    }

    /// Get total number of indexed features
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
