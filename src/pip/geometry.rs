//! Ray-casting containment and bounding boxes for border geometries.

use geo::CoordsIter;
use geo_types::{Coord, LineString, Rect};

use crate::error::FeatureGeometryError;
use crate::models::{BorderGeometry, CountryFeature};

/// Whether `point` lies inside `ring` by crossing parity.
///
/// Edges run from vertex `j = i - 1 (mod n)` to `i`. An edge crosses the
/// horizontal ray when exactly one endpoint is strictly above the point and
/// the edge's x-intersection is strictly less than the point's longitude.
/// A point on a left edge is therefore outside and one on a right edge is
/// inside. Rings with fewer than three vertices never contain anything.
pub fn ring_contains(ring: &LineString<f64>, point: Coord<f64>) -> bool {
    let vertices = &ring.0;
    if vertex_count(ring) < 3 {
        return false;
    }

    let n = vertices.len();
    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = (vertices[i].x, vertices[i].y);
        let (xj, yj) = (vertices[j].x, vertices[j].y);

        if (yi > point.y) != (yj > point.y) {
            let x_intersect = (xj - xi) * (point.y - yi) / (yj - yi) + xi;
            if x_intersect < point.x {
                inside = !inside;
            }
        }

        j = i;
    }

    inside
}

/// Distinct vertices, not counting a closing repeat of the first one
fn vertex_count(ring: &LineString<f64>) -> usize {
    let n = ring.0.len();
    if n > 1 && ring.0.first() == ring.0.last() {
        n - 1
    } else {
        n
    }
}

/// Containment against outer rings only; holes are not subtracted.
pub fn feature_contains(
    feature: &CountryFeature,
    point: Coord<f64>,
) -> Result<bool, FeatureGeometryError> {
    let polygons = feature.geometry.polygons();
    if polygons.is_empty() {
        return Err(FeatureGeometryError::NoRings {
            ordinal: feature.ordinal,
            code: feature.code.clone(),
        });
    }

    let mut has_coordinates = false;
    for polygon in polygons {
        let exterior = polygon.exterior();
        if exterior.0.is_empty() {
            continue;
        }
        has_coordinates = true;
        if ring_contains(exterior, point) {
            return Ok(true);
        }
    }

    if has_coordinates {
        Ok(false)
    } else {
        Err(FeatureGeometryError::NoCoordinates {
            ordinal: feature.ordinal,
            code: feature.code.clone(),
        })
    }
}

/// Axis-aligned bounds over every coordinate of every ring
pub fn bounding_rect(geometry: &BorderGeometry) -> Option<Rect<f64>> {
    let mut coords = geometry.polygons().iter().flat_map(|p| p.coords_iter());
    let first = coords.next()?;

    let (min, max) = coords.fold((first, first), |(min, max), c| {
        (
            Coord {
                x: min.x.min(c.x),
                y: min.y.min(c.y),
            },
            Coord {
                x: max.x.max(c.x),
                y: max.y.max(c.y),
            },
        )
    });

    Some(Rect::new(min, max))
}

/// `(maxLat - minLat) * (maxLng - minLng)`
pub fn bbox_area(rect: &Rect<f64>) -> f64 {
    rect.height() * rect.width()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, MultiPolygon, Polygon};

    fn square(min: f64, max: f64) -> Polygon<f64> {
        polygon![
            (x: min, y: min),
            (x: min, y: max),
            (x: max, y: max),
            (x: max, y: min),
            (x: min, y: min),
        ]
    }

    fn feature(geometry: BorderGeometry) -> CountryFeature {
        CountryFeature {
            ordinal: 0,
            code: "XX".to_string(),
            name: "Test".to_string(),
            geometry,
        }
    }

    #[test]
    fn test_point_inside_square() {
        let ring = square(0.0, 10.0).exterior().clone();
        assert!(ring_contains(&ring, Coord { x: 5.0, y: 5.0 }));
        assert!(ring_contains(&ring, Coord { x: 0.5, y: 9.5 }));
    }

    #[test]
    fn test_point_outside_square() {
        let ring = square(0.0, 10.0).exterior().clone();
        assert!(!ring_contains(&ring, Coord { x: -1.0, y: -1.0 }));
        assert!(!ring_contains(&ring, Coord { x: 11.0, y: 5.0 }));
        assert!(!ring_contains(&ring, Coord { x: 5.0, y: 10.5 }));
    }

    #[test]
    fn test_vertical_edges_left_out_right_in() {
        let ring = square(0.0, 10.0).exterior().clone();
        assert!(!ring_contains(&ring, Coord { x: 0.0, y: 5.0 }));
        assert!(ring_contains(&ring, Coord { x: 10.0, y: 5.0 }));
    }

    #[test]
    fn test_unclosed_ring_wraps() {
        let ring = LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        assert!(ring_contains(&ring, Coord { x: 2.0, y: 2.0 }));
        assert!(!ring_contains(&ring, Coord { x: 8.0, y: 8.0 }));
    }

    #[test]
    fn test_concave_ring() {
        // U shape opening upwards
        let ring = LineString::from(vec![
            (0.0, 0.0),
            (6.0, 0.0),
            (6.0, 6.0),
            (4.0, 6.0),
            (4.0, 2.0),
            (2.0, 2.0),
            (2.0, 6.0),
            (0.0, 6.0),
        ]);
        assert!(ring_contains(&ring, Coord { x: 1.0, y: 4.0 }));
        assert!(!ring_contains(&ring, Coord { x: 3.0, y: 4.0 }));
    }

    #[test]
    fn test_degenerate_rings_never_match() {
        let empty = LineString::new(vec![]);
        let segment = LineString::from(vec![(0.0, 0.0), (10.0, 10.0), (0.0, 0.0)]);
        assert!(!ring_contains(&empty, Coord { x: 0.0, y: 0.0 }));
        assert!(!ring_contains(&segment, Coord { x: 1.0, y: 5.0 }));
    }

    #[test]
    fn test_holes_not_subtracted() {
        let hole = square(4.0, 6.0).exterior().clone();
        let polygon = Polygon::new(square(0.0, 10.0).exterior().clone(), vec![hole]);
        let f = feature(BorderGeometry::Polygon(polygon));
        assert_eq!(feature_contains(&f, Coord { x: 5.0, y: 5.0 }), Ok(true));
    }

    #[test]
    fn test_multipolygon_any_part() {
        let parts = MultiPolygon::new(vec![square(0.0, 1.0), square(5.0, 6.0)]);
        let f = feature(BorderGeometry::MultiPolygon(parts));
        assert_eq!(feature_contains(&f, Coord { x: 5.5, y: 5.5 }), Ok(true));
        assert_eq!(feature_contains(&f, Coord { x: 0.5, y: 0.5 }), Ok(true));
        assert_eq!(feature_contains(&f, Coord { x: 3.0, y: 3.0 }), Ok(false));
    }

    #[test]
    fn test_malformed_geometry_errors() {
        let no_parts = feature(BorderGeometry::MultiPolygon(MultiPolygon::new(vec![])));
        assert!(matches!(
            feature_contains(&no_parts, Coord { x: 0.0, y: 0.0 }),
            Err(FeatureGeometryError::NoRings { .. })
        ));

        let empty_ring = feature(BorderGeometry::Polygon(Polygon::new(
            LineString::new(vec![]),
            vec![],
        )));
        assert!(matches!(
            feature_contains(&empty_ring, Coord { x: 0.0, y: 0.0 }),
            Err(FeatureGeometryError::NoCoordinates { .. })
        ));
    }

    #[test]
    fn test_bbox_area_spans_all_parts() {
        let parts = MultiPolygon::new(vec![square(0.0, 1.0), square(5.0, 6.0)]);
        let rect = bounding_rect(&BorderGeometry::MultiPolygon(parts)).unwrap();
        assert_eq!(rect.min(), Coord { x: 0.0, y: 0.0 });
        assert_eq!(rect.max(), Coord { x: 6.0, y: 6.0 });
        assert_eq!(bbox_area(&rect), 36.0);
    }

    #[test]
    fn test_bbox_of_empty_geometry() {
        let empty = BorderGeometry::Polygon(Polygon::new(LineString::new(vec![]), vec![]));
        assert!(bounding_rect(&empty).is_none());
    }
}
