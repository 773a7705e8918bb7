//! Country border features and query coordinates.

use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Placeholder ISO code used for disputed or unassigned territory.
pub const SENTINEL_CODE: &str = "-99";

/// Geographic coordinate in degrees.
///
/// Values outside [-180,180]/[-90,90] are accepted as-is, the same way the map
/// library hands them over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(c: Coordinate) -> Self {
        Coord { x: c.lng, y: c.lat }
    }
}

/// Border geometry of a single feature. `x` is longitude, `y` latitude.
#[derive(Debug, Clone, PartialEq)]
pub enum BorderGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl BorderGeometry {
    /// Constituent polygons (one for `Polygon`)
    pub fn polygons(&self) -> &[Polygon<f64>] {
        match self {
            BorderGeometry::Polygon(p) => std::slice::from_ref(p),
            BorderGeometry::MultiPolygon(mp) => &mp.0,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            BorderGeometry::Polygon(_) => "Polygon",
            BorderGeometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// GeoJSON geometry object with `[lng, lat]` positions
    pub fn to_geojson(&self) -> Value {
        let coordinates = match self {
            BorderGeometry::Polygon(p) => polygon_positions(p),
            BorderGeometry::MultiPolygon(mp) => {
                Value::Array(mp.0.iter().map(polygon_positions).collect())
            }
        };
        json!({ "type": self.type_name(), "coordinates": coordinates })
    }
}

fn polygon_positions(polygon: &Polygon<f64>) -> Value {
    let rings = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring_positions)
        .collect();
    Value::Array(rings)
}

fn ring_positions(ring: &LineString<f64>) -> Value {
    Value::Array(ring.0.iter().map(|c| json!([c.x, c.y])).collect())
}

/// A country border feature from the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryFeature {
    /// Position in the source document, used as a stable tie-break
    pub ordinal: usize,

    /// ISO 3166-1 alpha-2 code after overrides; may be the sentinel or empty
    pub code: String,

    pub name: String,

    pub geometry: BorderGeometry,
}

impl CountryFeature {
    /// Whether this feature carries a real country code and can be matched
    pub fn is_assigned(&self) -> bool {
        is_assigned_code(&self.code)
    }

    pub fn summary(&self) -> CountrySummary {
        CountrySummary {
            code: self.code.clone(),
            name: self.name.clone(),
        }
    }

    /// GeoJSON `Feature` for map highlighting
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "properties": { "iso_a2": self.code, "name": self.name },
            "geometry": self.geometry.to_geojson(),
        })
    }
}

/// `false` for the sentinel code and for blank codes
pub fn is_assigned_code(code: &str) -> bool {
    let code = code.trim();
    !code.is_empty() && code != SENTINEL_CODE
}

/// Country entry for the selection list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySummary {
    pub code: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::polygon;

    fn square() -> Polygon<f64> {
        polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 1.0, y: 1.0), (x: 1.0, y: 0.0)]
    }

    #[test]
    fn test_sentinel_codes_unassigned() {
        assert!(!is_assigned_code("-99"));
        assert!(!is_assigned_code(""));
        assert!(!is_assigned_code("  "));
        assert!(is_assigned_code("FR"));
    }

    #[test]
    fn test_polygon_exposes_single_part() {
        let geometry = BorderGeometry::Polygon(square());
        assert_eq!(geometry.polygons().len(), 1);
    }

    #[test]
    fn test_geojson_positions_are_lng_lat() {
        let feature = CountryFeature {
            ordinal: 0,
            code: "FR".to_string(),
            name: "France".to_string(),
            geometry: BorderGeometry::MultiPolygon(MultiPolygon::new(vec![square()])),
        };
        let value = feature.to_geojson();
        assert_eq!(value["geometry"]["type"], "MultiPolygon");
        assert_eq!(value["geometry"]["coordinates"][0][0][1], json!([0.0, 1.0]));
        assert_eq!(value["properties"]["iso_a2"], "FR");
    }

    #[test]
    fn test_coordinate_maps_to_xy() {
        let coord: Coord<f64> = Coordinate::new(4.5, 45.0).into();
        assert_eq!(coord.x, 4.5);
        assert_eq!(coord.y, 45.0);
    }
}
