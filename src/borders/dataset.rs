//! Border dataset parsed from a GeoJSON feature collection.

use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use hashbrown::HashSet;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::CodeOverrides;
use crate::error::UnavailableCause;
use crate::models::{is_assigned_code, BorderGeometry, CountryFeature, CountrySummary};

/// Property keys that may carry the ISO 3166-1 alpha-2 code, in priority order
const CODE_KEYS: &[&str] = &[
    "iso_a2",
    "ISO_A2",
    "iso_a2_eh",
    "ISO_A2_EH",
    "ISO3166-1-Alpha-2",
    "iso2",
    "ISO2",
];

/// Property keys that may carry the display name, in priority order
const NAME_KEYS: &[&str] = &["name", "NAME", "admin", "ADMIN", "name_long", "NAME_LONG"];

#[derive(Debug, Deserialize)]
struct RawDocument {
    features: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    #[serde(other)]
    Unsupported,
}

/// Immutable, ordered collection of country features.
#[derive(Debug, Clone, Default)]
pub struct BorderDataset {
    features: Vec<CountryFeature>,
    skipped: usize,
}

impl BorderDataset {
    /// Build a dataset from already-decoded features.
    ///
    /// Ordinals are reassigned to match vector positions.
    pub fn from_features(mut features: Vec<CountryFeature>) -> Self {
        for (position, feature) in features.iter_mut().enumerate() {
            feature.ordinal = position;
        }

        Self {
            features,
            skipped: 0,
        }
    }

    /// Parse a GeoJSON document, applying code overrides.
    ///
    /// Only a missing `features` collection or invalid JSON fail the whole
    /// document; undecodable features are skipped and counted.
    pub fn parse(bytes: &[u8], overrides: &CodeOverrides) -> Result<Self, UnavailableCause> {
        let document: RawDocument = serde_json::from_slice(bytes)?;
        let raw_features = document.features.ok_or(UnavailableCause::MissingFeatures)?;

        let mut features = Vec::with_capacity(raw_features.len());
        let mut skipped = 0;

        for (position, value) in raw_features.into_iter().enumerate() {
            match decode_feature(features.len(), value, overrides) {
                Some(feature) => features.push(feature),
                None => {
                    debug!("Skipping undecodable border feature at position {}", position);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!("Skipped {} border features without usable geometry", skipped);
        }

        let dataset = Self { features, skipped };
        info!(
            "Parsed border dataset with {} features ({} assigned)",
            dataset.len(),
            dataset.iter().filter(|f| f.is_assigned()).count()
        );

        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of source features dropped while parsing
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryFeature> {
        self.features.iter()
    }

    pub fn features(&self) -> &[CountryFeature] {
        &self.features
    }

    pub fn get(&self, ordinal: usize) -> Option<&CountryFeature> {
        self.features.get(ordinal)
    }

    /// First assigned feature with the given code (case-insensitive)
    pub fn find_by_code(&self, code: &str) -> Option<&CountryFeature> {
        let code = code.trim();
        if !is_assigned_code(code) {
            return None;
        }
        self.features
            .iter()
            .find(|f| f.code.eq_ignore_ascii_case(code))
    }

    /// Assigned countries sorted by name, one entry per code
    pub fn countries(&self) -> Vec<CountrySummary> {
        let mut seen = HashSet::new();
        let mut countries: Vec<CountrySummary> = self
            .features
            .iter()
            .filter(|f| f.is_assigned())
            .filter(|f| seen.insert(f.code.as_str()))
            .map(CountryFeature::summary)
            .collect();

        countries.sort_by(|a, b| a.name.cmp(&b.name));
        countries
    }
}

fn decode_feature(
    ordinal: usize,
    value: Value,
    overrides: &CodeOverrides,
) -> Option<CountryFeature> {
    let raw: RawFeature = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Border feature could not be decoded: {}", e);
            return None;
        }
    };

    let properties = raw.properties.unwrap_or_default();
    let raw_code = code_property(&properties);
    let name = first_string(&properties, NAME_KEYS).unwrap_or_default();

    let geometry = match raw.geometry? {
        RawGeometry::Polygon { coordinates } => BorderGeometry::Polygon(to_polygon(coordinates)),
        RawGeometry::MultiPolygon { coordinates } => BorderGeometry::MultiPolygon(
            MultiPolygon::new(coordinates.into_iter().map(to_polygon).collect()),
        ),
        RawGeometry::Unsupported => {
            debug!("Feature '{}' has unsupported geometry type", name);
            return None;
        }
    };

    let code = if overrides.is_empty() {
        raw_code.trim().to_string()
    } else {
        overrides.canonical(&raw_code, &name)
    };

    if code != raw_code {
        debug!("Code override for '{}': '{}' -> '{}'", name, raw_code, code);
    }

    Some(CountryFeature {
        ordinal,
        code,
        name,
        geometry,
    })
}

/// First assigned code among the known keys, else the first present value
fn code_property(properties: &Map<String, Value>) -> String {
    let present: Vec<&str> = CODE_KEYS
        .iter()
        .filter_map(|key| properties.get(*key).and_then(Value::as_str))
        .collect();

    present
        .iter()
        .find(|code| is_assigned_code(code))
        .or_else(|| present.first())
        .map(|code| code.to_string())
        .unwrap_or_default()
}

fn first_string(properties: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| properties.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(String::from)
}

fn to_polygon(rings: Vec<Vec<Vec<f64>>>) -> Polygon<f64> {
    let mut rings = rings.into_iter().map(to_ring);
    let exterior = rings.next().unwrap_or_else(|| LineString::new(vec![]));
    Polygon::new(exterior, rings.collect())
}

/// Positions are `[lng, lat, ...]`; short positions are dropped
fn to_ring(positions: Vec<Vec<f64>>) -> LineString<f64> {
    positions
        .into_iter()
        .filter_map(|p| match p.as_slice() {
            [lng, lat, ..] => Some(Coord { x: *lng, y: *lat }),
            _ => None,
        })
        .collect()
}
