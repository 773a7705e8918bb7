//! Core data models for border lookups.

pub mod country;

pub use country::{
    is_assigned_code, BorderGeometry, Coordinate, CountryFeature, CountrySummary, SENTINEL_CODE,
};
