//! Error types for border loading and per-feature geometry checks.

use thiserror::Error;

/// Errors surfaced to callers of the border index.
#[derive(Debug, Error)]
pub enum BorderError {
    /// The dataset could not be fetched or is not a feature collection.
    ///
    /// Resolution stays disabled until the dataset is reloaded.
    #[error("border dataset unavailable from {origin}")]
    DataUnavailable {
        /// File path or URL the dataset was requested from.
        origin: String,
        #[source]
        cause: UnavailableCause,
    },
}

impl BorderError {
    pub fn unavailable(origin: impl Into<String>, cause: impl Into<UnavailableCause>) -> Self {
        BorderError::DataUnavailable {
            origin: origin.into(),
            cause: cause.into(),
        }
    }
}

/// Underlying reason a dataset is unavailable.
#[derive(Debug, Error)]
pub enum UnavailableCause {
    #[error("failed to read dataset file")]
    Io(#[from] std::io::Error),

    #[error("dataset request failed")]
    Http(#[from] reqwest::Error),

    #[error("dataset is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("document has no `features` collection")]
    MissingFeatures,

    #[error("background load task failed: {0}")]
    Task(String),
}

/// A single feature whose geometry cannot be tested.
///
/// Recovered locally: the feature is skipped and resolution continues.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeatureGeometryError {
    #[error("feature {ordinal} ({code}) has no rings")]
    NoRings { ordinal: usize, code: String },

    #[error("feature {ordinal} ({code}) has no coordinates")]
    NoCoordinates { ordinal: usize, code: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unavailable_keeps_cause() {
        let err = BorderError::unavailable("borders.geo.json", UnavailableCause::MissingFeatures);
        assert_eq!(
            err.to_string(),
            "border dataset unavailable from borders.geo.json"
        );
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("document has no `features` collection")
        );
    }
}
