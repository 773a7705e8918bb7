//! HTTP handlers for border lookups.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use gazetteer::pip::{error_chain, resolve, BorderState};
use gazetteer::{Coordinate, CountrySummary, Resolution};

use crate::AppState;

#[derive(Deserialize)]
pub struct ResolveParams {
    /// Latitude of the click
    pub lat: f64,
    /// Longitude of the click
    #[serde(alias = "lon")]
    pub lng: f64,
}

/// Body of `/v1/resolve`
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolveResponse {
    Match { country: CountrySummary },
    NoMatch,
    NotReady,
    Unavailable { error: String },
}

impl ResolveResponse {
    fn status_code(&self) -> StatusCode {
        match self {
            ResolveResponse::Match { .. } => StatusCode::OK,
            ResolveResponse::NoMatch => StatusCode::NOT_FOUND,
            ResolveResponse::NotReady | ResolveResponse::Unavailable { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    dataset: &'static str,
    features: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl HealthResponse {
    fn from_state(state: &BorderState) -> Self {
        let (features, error) = match state {
            BorderState::Ready(resolver) => (resolver.dataset().len(), None),
            BorderState::Unavailable(message) => (0, Some(message.clone())),
            BorderState::Loading => (0, None),
        };

        Self {
            status: if matches!(state, BorderState::Ready(_)) {
                "ok"
            } else {
                "degraded"
            },
            dataset: state.name(),
            features,
            error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    status: &'static str,
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn not_ready(state: &BorderState) -> ApiError {
    let error = match state {
        BorderState::Unavailable(message) => message.clone(),
        _ => "border dataset is still loading".to_string(),
    };
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorBody {
            status: state.name(),
            error,
        }),
    )
}

/// Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::from_state(&state.borders.state().await))
}

/// Resolve a clicked coordinate to its country
pub async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveParams>,
) -> (StatusCode, Json<ResolveResponse>) {
    let coord = Coordinate::new(params.lng, params.lat);

    let border_state = state.borders.state().await;
    let response = match &border_state {
        BorderState::Unavailable(message) => ResolveResponse::Unavailable {
            error: message.clone(),
        },
        BorderState::Ready(resolver) => to_response(resolve(Some(resolver.as_ref()), coord)),
        BorderState::Loading => to_response(resolve(None, coord)),
    };

    (response.status_code(), Json(response))
}

fn to_response(resolution: Resolution<'_>) -> ResolveResponse {
    match resolution {
        Resolution::Match(feature) => ResolveResponse::Match {
            country: feature.summary(),
        },
        Resolution::NoMatch => ResolveResponse::NoMatch,
        Resolution::NotReady => ResolveResponse::NotReady,
    }
}

/// Country list for the selection drop-down
pub async fn countries_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CountrySummary>>, ApiError> {
    let border_state = state.borders.state().await;
    match &border_state {
        BorderState::Ready(resolver) => Ok(Json(resolver.dataset().countries())),
        _ => Err(not_ready(&border_state)),
    }
}

/// Border geometry of one country as a GeoJSON feature
pub async fn border_handler(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let border_state = state.borders.state().await;
    let BorderState::Ready(resolver) = &border_state else {
        return Err(not_ready(&border_state));
    };

    resolver
        .dataset()
        .find_by_code(&code)
        .map(|feature| Json(feature.to_geojson()))
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    status: "not_found",
                    error: format!("no border for country code '{}'", code),
                }),
            )
        })
}

/// Manual reload after a failed or stale load
pub async fn reload_handler(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let status = match state.borders.reload(&state.source, &state.overrides).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            error!("Border reload failed: {}", error_chain(&e));
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (
        status,
        Json(HealthResponse::from_state(&state.borders.state().await)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazetteer::{BorderDataset, BorderHandle, CodeOverrides, DatasetSource, PointResolver};

    const DOC: &str = r#"{"features": [
        { "properties": { "name": "France", "iso_a2": "-99" },
          "geometry": { "type": "Polygon", "coordinates": [[[0,0],[0,10],[10,10],[10,0],[0,0]]] } },
        { "properties": { "name": "Monaco", "iso_a2": "MC" },
          "geometry": { "type": "Polygon", "coordinates": [[[4,4],[4,5],[5,5],[5,4],[4,4]]] } }
    ]}"#;

    fn app_state(borders: BorderHandle) -> Arc<AppState> {
        Arc::new(AppState {
            borders,
            source: DatasetSource::parse("/nonexistent/borders.geo.json"),
            overrides: CodeOverrides::natural_earth(),
        })
    }

    fn ready_state() -> Arc<AppState> {
        let dataset = BorderDataset::parse(DOC.as_bytes(), &CodeOverrides::natural_earth()).unwrap();
        let resolver = PointResolver::new(Arc::new(dataset));
        app_state(BorderHandle::ready(resolver))
    }

    async fn resolve_at(state: Arc<AppState>, lng: f64, lat: f64) -> (StatusCode, ResolveResponse) {
        let (status, Json(body)) =
            resolve_handler(State(state), Query(ResolveParams { lat, lng })).await;
        (status, body)
    }

    #[tokio::test]
    async fn test_resolve_match_and_no_match() {
        let (status, body) = resolve_at(ready_state(), 4.5, 4.5).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            ResolveResponse::Match {
                country: CountrySummary {
                    code: "MC".to_string(),
                    name: "Monaco".to_string()
                }
            }
        );

        let (status, body) = resolve_at(ready_state(), 1.0, 1.0).await;
        assert_eq!(status, StatusCode::OK);
        assert!(matches!(body, ResolveResponse::Match { ref country } if country.code == "FR"));

        let (status, body) = resolve_at(ready_state(), -1.0, -1.0).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, ResolveResponse::NoMatch);
    }

    #[tokio::test]
    async fn test_resolve_while_loading() {
        let (status, body) = resolve_at(app_state(BorderHandle::new()), 1.0, 1.0).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, ResolveResponse::NotReady);
    }

    #[tokio::test]
    async fn test_reload_failure_is_reported() {
        let state = app_state(BorderHandle::new());
        let (status, Json(health)) = reload_handler(State(Arc::clone(&state))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(health.dataset, "unavailable");

        let (status, body) = resolve_at(state, 1.0, 1.0).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(matches!(body, ResolveResponse::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_countries_and_border() {
        let state = ready_state();
        let Json(countries) = countries_handler(State(Arc::clone(&state))).await.unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].code, "FR");

        let Json(feature) = border_handler(State(Arc::clone(&state)), Path("mc".to_string()))
            .await
            .unwrap();
        assert_eq!(feature["properties"]["name"], "Monaco");

        let missing = border_handler(State(state), Path("ZZ".to_string())).await;
        assert_eq!(missing.unwrap_err().0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_response_shape() {
        let body = serde_json::to_value(ResolveResponse::NoMatch).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "no_match" }));
    }
}
