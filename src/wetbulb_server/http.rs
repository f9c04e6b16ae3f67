// wetbulb_server - Wet-bulb temperature logger and JSON API for Weather Underground
//
// Copyright 2026 The wetbulb_server Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use crate::client::{ClientError, StationClient};
use crate::extract::{self, HistoryEntry};
use crate::store::{LogRecord, LogStore};
use crate::wetbulb;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use prometheus_client::encoding::text::encode;
use prometheus_client::registry::Registry;
use serde::{Deserialize, Serialize};
use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// State shared by all request handlers: the upstream HTTP client, the CSV
/// log, and the metric registry for the text exposition route.
pub struct RequestContext {
    client: StationClient,
    store: LogStore,
    registry: Registry,
}

impl RequestContext {
    pub fn new(client: StationClient, store: LogStore, registry: Registry) -> Self {
        RequestContext {
            client,
            store,
            registry,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    MissingParameter(&'static str),
    Upstream(ClientError),
    Store(io::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter(name) => write!(f, "Missing '{}' query parameter.", name),
            Self::Upstream(e) => write!(f, "{}", e),
            Self::Store(e) => write!(f, "{}", e),
        }
    }
}

impl error::Error for ApiError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::MissingParameter(_) => None,
            Self::Upstream(e) => Some(e),
            Self::Store(e) => Some(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct LinkQuery {
    link: Option<String>,
}

#[derive(Debug, Serialize)]
struct CurrentWeather {
    temperature: Option<f64>,
    humidity: Option<f64>,
    wet_bulb: Option<f64>,
}

/// Build the application router: the three JSON routes, the metrics route,
/// request tracing, and CORS open to all origins.
pub fn router(context: Arc<RequestContext>) -> Router {
    Router::new()
        .route("/get_temperature_history", get(get_temperature_history))
        .route("/get_current_weather", get(get_current_weather))
        .route("/get_logged_data", get(get_logged_data))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(context)
}

async fn get_temperature_history(
    State(context): State<Arc<RequestContext>>,
    Query(query): Query<LinkQuery>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let link = query.link.ok_or(ApiError::MissingParameter("link"))?;
    let html = context.client.fetch(&link).await.map_err(ApiError::Upstream)?;

    Ok(Json(extract::history(&html)))
}

async fn get_current_weather(
    State(context): State<Arc<RequestContext>>,
    Query(query): Query<LinkQuery>,
) -> Result<Json<CurrentWeather>, ApiError> {
    let link = query.link.ok_or(ApiError::MissingParameter("link"))?;
    let html = context.client.fetch(&link).await.map_err(ApiError::Upstream)?;

    let conditions = extract::current(&html);
    let wet_bulb = match (conditions.temperature, conditions.humidity) {
        (Some(temp), Some(humidity)) => wetbulb::wet_bulb(temp, humidity),
        _ => None,
    };

    Ok(Json(CurrentWeather {
        temperature: conditions.temperature,
        humidity: conditions.humidity,
        wet_bulb,
    }))
}

async fn get_logged_data(
    State(context): State<Arc<RequestContext>>,
) -> Result<Json<Vec<LogRecord>>, ApiError> {
    let records = context.store.read_all().map_err(ApiError::Store)?;
    Ok(Json(records))
}

async fn metrics(State(context): State<Arc<RequestContext>>) -> Response {
    let mut buf = String::new();
    match encode(&mut buf, &context.registry) {
        Ok(()) => ([(header::CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)], buf).into_response(),
        Err(e) => {
            tracing::error!(message = "error encoding metrics", error = %e);
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::StationMetrics;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router(store: LogStore) -> Router {
        let mut registry = Registry::with_prefix("wetbulb");
        StationMetrics::new(&mut registry);
        let context = RequestContext::new(
            StationClient::new(reqwest::Client::new()),
            store,
            registry,
        );
        router(Arc::new(context))
    }

    async fn get_response(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_current_weather_missing_link() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(LogStore::new(dir.path().join("wetbulb.csv")));

        let (status, body) = get_response(app, "/get_current_weather").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Missing 'link' query parameter.");
    }

    #[tokio::test]
    async fn test_temperature_history_missing_link() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(LogStore::new(dir.path().join("wetbulb.csv")));

        let (status, _) = get_response(app, "/get_temperature_history").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_logged_data_returns_appended_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path().join("wetbulb.csv"));
        store.init().unwrap();
        store
            .append(&LogRecord {
                time: "2026-08-07 10:00".to_string(),
                temp: 71.3,
                humidity: 54.0,
                wetbulb: 17.23,
            })
            .unwrap();

        let (status, body) = get_response(test_router(store), "/get_logged_data").await;
        assert_eq!(status, StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["time"], "2026-08-07 10:00");
        assert_eq!(body[0]["temp"], 71.3);
        assert_eq!(body[0]["humidity"], 54.0);
        assert_eq!(body[0]["wetbulb"], 17.23);
    }

    #[tokio::test]
    async fn test_logged_data_io_failure_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        // Store never initialized: the backing file does not exist
        let app = test_router(LogStore::new(dir.path().join("wetbulb.csv")));

        let (status, body) = get_response(app, "/get_logged_data").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_metrics_exposition() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(LogStore::new(dir.path().join("wetbulb.csv")));

        let (status, body) = get_response(app, "/metrics").await;
        assert_eq!(status, StatusCode::OK);

        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("wetbulb_polls"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(LogStore::new(dir.path().join("wetbulb.csv")));

        let (status, _) = get_response(app, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
